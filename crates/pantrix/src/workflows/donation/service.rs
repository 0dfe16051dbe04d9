use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::aggregates::DonationAggregates;
use super::domain::{
    DonationAction, DonationDraft, DonationRequest, DonationRequestId, DonationStatus,
};
use super::repository::{DonationRepository, RepositoryError};
use crate::validation::ValidationError;

/// How the workflow answers a transition requested from the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Silently keep the current state. Suits a single trusted writer.
    #[default]
    Lenient,
    /// Reject with a typed error.
    Strict,
}

/// Result of a lenient or successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "request", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Applied(DonationRequest),
    Ignored(DonationRequest),
    Missing,
}

impl TransitionOutcome {
    pub fn request(&self) -> Option<&DonationRequest> {
        match self {
            Self::Applied(request) | Self::Ignored(request) => Some(request),
            Self::Missing => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Error raised by the donation workflow.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot {action} donation {id} while it is {from}")]
    InvalidTransition {
        id: DonationRequestId,
        from: DonationStatus,
        action: DonationAction,
    },
    #[error("donation {0} not found")]
    NotFound(DonationRequestId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Lifecycle state machine over the donation history.
///
/// `pending -> accepted -> completed` and `pending -> declined`; nothing leaves
/// `completed` or `declined`.
pub struct DonationWorkflow<R> {
    repository: Arc<R>,
    policy: TransitionPolicy,
    donor_counts: BTreeMap<String, u32>,
    next_sequence: u64,
}

impl<R> DonationWorkflow<R>
where
    R: DonationRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: TransitionPolicy) -> Self {
        Self {
            repository,
            policy,
            donor_counts: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    fn next_id(&mut self) -> DonationRequestId {
        self.next_sequence += 1;
        DonationRequestId(format!("don-{:06}", self.next_sequence))
    }

    /// Store a pending request and bump the donor's running counter.
    ///
    /// The counter moves on creation, not completion, so a donor sees credit
    /// as soon as they offer food.
    pub fn create(&mut self, draft: DonationDraft) -> Result<DonationRequest, DonationError> {
        draft.validate()?;

        let mut id = self.next_id();
        while self.repository.fetch(&id)?.is_some() {
            id = self.next_id();
        }

        let request = draft.into_request(id);
        let stored = self.repository.insert(request)?;

        let counter = self
            .donor_counts
            .entry(stored.restaurant_name.clone())
            .or_insert(0);
        *counter = counter.saturating_add(1);

        info!(
            donation_id = %stored.id,
            restaurant = %stored.restaurant_name,
            ngo = %stored.ngo_name,
            items = stored.items.len(),
            donor_count = *counter,
            "donation request created"
        );

        Ok(stored)
    }

    /// Load existing history (e.g. demo data) without touching donor counters.
    pub fn import_history(
        &self,
        requests: impl IntoIterator<Item = DonationRequest>,
    ) -> Result<usize, DonationError> {
        let mut imported = 0;
        for request in requests {
            self.repository.insert(request)?;
            imported += 1;
        }
        Ok(imported)
    }

    pub fn accept(&self, id: &DonationRequestId) -> Result<TransitionOutcome, DonationError> {
        self.transition(id, DonationAction::Accept, None)
    }

    pub fn decline(&self, id: &DonationRequestId) -> Result<TransitionOutcome, DonationError> {
        self.transition(id, DonationAction::Decline, None)
    }

    /// Mark an accepted request as received, stamping `completed_on`.
    pub fn complete(
        &self,
        id: &DonationRequestId,
        completed_on: NaiveDate,
    ) -> Result<TransitionOutcome, DonationError> {
        self.transition(id, DonationAction::Complete, Some(completed_on))
    }

    pub fn apply(
        &self,
        id: &DonationRequestId,
        action: DonationAction,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, DonationError> {
        match action {
            DonationAction::Accept => self.accept(id),
            DonationAction::Decline => self.decline(id),
            DonationAction::Complete => self.complete(id, today),
        }
    }

    fn transition(
        &self,
        id: &DonationRequestId,
        action: DonationAction,
        completed_on: Option<NaiveDate>,
    ) -> Result<TransitionOutcome, DonationError> {
        let Some(mut record) = self.repository.fetch(id)? else {
            return match self.policy {
                TransitionPolicy::Strict => Err(DonationError::NotFound(id.clone())),
                TransitionPolicy::Lenient => {
                    debug!(donation_id = %id, %action, "ignoring transition for unknown donation");
                    Ok(TransitionOutcome::Missing)
                }
            };
        };

        if record.status != action.source() {
            return match self.policy {
                TransitionPolicy::Strict => Err(DonationError::InvalidTransition {
                    id: id.clone(),
                    from: record.status,
                    action,
                }),
                TransitionPolicy::Lenient => {
                    debug!(donation_id = %id, %action, status = %record.status, "ignoring invalid transition");
                    Ok(TransitionOutcome::Ignored(record))
                }
            };
        }

        record.status = action.target();
        if action == DonationAction::Complete {
            record.donation_date = completed_on;
        }
        self.repository.update(record.clone())?;

        info!(donation_id = %id, status = %record.status, "donation request advanced");
        Ok(TransitionOutcome::Applied(record))
    }

    pub fn get(&self, id: &DonationRequestId) -> Result<Option<DonationRequest>, DonationError> {
        Ok(self.repository.fetch(id)?)
    }

    /// Full history, newest first.
    pub fn requests(&self) -> Result<Vec<DonationRequest>, DonationError> {
        Ok(self.repository.all()?)
    }

    pub fn aggregates(&self) -> Result<DonationAggregates, DonationError> {
        Ok(DonationAggregates::new(self.requests()?))
    }

    /// Running number of donations offered by `restaurant`, counted at creation.
    pub fn donor_count(&self, restaurant: &str) -> u32 {
        self.donor_counts.get(restaurant).copied().unwrap_or(0)
    }

    /// Set a donor's counter, e.g. when a returning hotel signs in.
    pub fn seed_donor_count(&mut self, restaurant: impl Into<String>, count: u32) {
        self.donor_counts.insert(restaurant.into(), count);
    }

    pub fn reset_donor_counts(&mut self) {
        self.donor_counts.clear();
    }
}
