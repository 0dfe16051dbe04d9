use serde::{Deserialize, Serialize};

use crate::validation::{require, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    In,
}

/// Household member using the personal pantry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub country: String,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelProfile {
    pub name: String,
    pub location: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBankProfile {
    pub name: String,
    pub location: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// NGO registration id on the Darpan portal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darpan_id: Option<String>,
}

/// Signed-in party. The variant decides which dashboards and actions apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "profile", rename_all = "kebab-case")]
pub enum Profile {
    Public(UserProfile),
    Hotel(HotelProfile),
    FoodBank(FoodBankProfile),
}

impl Profile {
    pub fn name(&self) -> &str {
        match self {
            Profile::Public(profile) => &profile.name,
            Profile::Hotel(profile) => &profile.name,
            Profile::FoodBank(profile) => &profile.name,
        }
    }

    pub const fn role_label(&self) -> &'static str {
        match self {
            Profile::Public(_) => "public",
            Profile::Hotel(_) => "hotel",
            Profile::FoodBank(_) => "food-bank",
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Profile::Public(profile) => {
                require(&profile.name, "name")?;
                require(&profile.email, "email")
            }
            Profile::Hotel(profile) => {
                require(&profile.name, "name")?;
                require(&profile.email, "email")?;
                require(&profile.location, "location")
            }
            Profile::FoodBank(profile) => {
                require(&profile.name, "name")?;
                require(&profile.email, "email")?;
                require(&profile.location, "location")
            }
        }
    }

    /// Stored coordinates, when the profile type carries them and they are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            Profile::Public(_) => None,
            Profile::Hotel(profile) => profile.latitude.zip(profile.longitude),
            Profile::FoodBank(profile) => profile.latitude.zip(profile.longitude),
        }
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        match self {
            Profile::Public(_) => {}
            Profile::Hotel(profile) => {
                profile.latitude = Some(latitude);
                profile.longitude = Some(longitude);
            }
            Profile::FoodBank(profile) => {
                profile.latitude = Some(latitude);
                profile.longitude = Some(longitude);
            }
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Profile::Public(profile) => Some(profile.country.as_str()),
            Profile::Hotel(profile) => Some(profile.location.as_str()),
            Profile::FoodBank(profile) => Some(profile.location.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(location: &str) -> Profile {
        Profile::Hotel(HotelProfile {
            name: "The Grand Eatery".to_string(),
            location: location.to_string(),
            email: "kitchen@grand.example".to_string(),
            cuisine_type: None,
            contact_number: None,
            latitude: None,
            longitude: None,
        })
    }

    #[test]
    fn hotel_requires_location() {
        assert_eq!(
            hotel("  ").validate(),
            Err(ValidationError::MissingField("location"))
        );
        assert!(hotel("New York, USA").validate().is_ok());
    }

    #[test]
    fn serializes_with_role_tag() {
        let value = serde_json::to_value(hotel("Miami, USA")).expect("serializes");
        assert_eq!(value["role"], "hotel");
        assert_eq!(value["profile"]["location"], "Miami, USA");
        assert!(value["profile"].get("latitude").is_none());
    }

    #[test]
    fn coordinates_are_only_kept_for_organisations() {
        let mut profile = hotel("Denver, USA");
        assert_eq!(profile.coordinates(), None);
        profile.set_coordinates(39.7392, -104.9903);
        assert_eq!(profile.coordinates(), Some((39.7392, -104.9903)));
    }
}
