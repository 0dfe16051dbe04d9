use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::{deserialize_optional_date, deserialize_optional_date_time};
use crate::validation::{require, ValidationError};
use crate::workflows::inventory::InventoryItem;

/// Identifier wrapper for donation requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationRequestId(pub String);

impl fmt::Display for DonationRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl DonationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    #[default]
    Pickup,
    Dropoff,
}

/// Food-bank actions that advance a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationAction {
    Accept,
    Decline,
    Complete,
}

impl DonationAction {
    /// The only state this action may be applied from.
    pub const fn source(self) -> DonationStatus {
        match self {
            Self::Accept | Self::Decline => DonationStatus::Pending,
            Self::Complete => DonationStatus::Accepted,
        }
    }

    pub const fn target(self) -> DonationStatus {
        match self {
            Self::Accept => DonationStatus::Accepted,
            Self::Decline => DonationStatus::Declined,
            Self::Complete => DonationStatus::Completed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for DonationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A restaurant's offer of surplus items to a food bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub id: DonationRequestId,
    pub restaurant_name: String,
    pub location: String,
    /// Owned copies of the donated inventory rows.
    pub items: Vec<InventoryItem>,
    pub status: DonationStatus,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub ngo_name: String,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    #[serde(default, deserialize_with = "deserialize_optional_date_time")]
    pub pickup_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Everything a hotel submits when offering items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationDraft {
    pub restaurant_name: String,
    pub location: String,
    pub items: Vec<InventoryItem>,
    pub ngo_name: String,
    pub delivery_type: DeliveryType,
    pub pickup_date_time: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl DonationDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.restaurant_name, "restaurant name")?;
        if self.items.is_empty() {
            return Err(ValidationError::NoItemsSelected);
        }
        if self.ngo_name.trim().is_empty() {
            return Err(ValidationError::NoNgoSelected);
        }
        Ok(())
    }

    pub(crate) fn into_request(self, id: DonationRequestId) -> DonationRequest {
        // Pickup windows only make sense when the food bank collects.
        let pickup_date_time = match self.delivery_type {
            DeliveryType::Pickup => self.pickup_date_time,
            DeliveryType::Dropoff => None,
        };

        DonationRequest {
            id,
            restaurant_name: self.restaurant_name,
            location: self.location,
            items: self.items,
            status: DonationStatus::Pending,
            donation_date: None,
            ngo_name: self.ngo_name,
            delivery_type: self.delivery_type,
            pickup_date_time,
            notes: self.notes.filter(|note| !note.trim().is_empty()),
        }
    }
}
