//! Food-bank broadcasts asking partner hotels for specific items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::profile::FoodBankProfile;
use crate::validation::{require, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRequest {
    pub id: String,
    pub food_bank_name: String,
    pub food_bank_location: String,
    pub requested_items: Vec<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// What a food bank asks for; the sender is taken from its profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDraft {
    pub requested_items: Vec<String>,
    #[serde(default)]
    pub message: String,
}

/// Broadcast board, newest request first.
#[derive(Debug, Default)]
pub struct RequirementBoard {
    requests: Vec<RequirementRequest>,
    next_sequence: u64,
}

impl RequirementBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broadcast(
        &mut self,
        food_bank: &FoodBankProfile,
        draft: RequirementDraft,
        now: DateTime<Utc>,
    ) -> Result<RequirementRequest, ValidationError> {
        require(&food_bank.name, "food bank name")?;
        let requested_items: Vec<String> = draft
            .requested_items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if requested_items.is_empty() {
            return Err(ValidationError::MissingField("requested items"));
        }

        self.next_sequence += 1;
        let request = RequirementRequest {
            id: format!("req-{:06}", self.next_sequence),
            food_bank_name: food_bank.name.clone(),
            food_bank_location: food_bank.location.clone(),
            requested_items,
            message: draft.message,
            timestamp: now,
        };

        info!(request_id = %request.id, food_bank = %request.food_bank_name, "requirement broadcast");
        self.requests.insert(0, request.clone());
        Ok(request)
    }

    pub fn requests(&self) -> &[RequirementRequest] {
        &self.requests
    }
}
