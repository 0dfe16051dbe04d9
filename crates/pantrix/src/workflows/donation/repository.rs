use std::sync::{Arc, Mutex};

use super::domain::{DonationRequest, DonationRequestId};

/// Storage abstraction so the workflow can be exercised in isolation.
pub trait DonationRepository: Send + Sync {
    fn insert(&self, record: DonationRequest) -> Result<DonationRequest, RepositoryError>;
    fn update(&self, record: DonationRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DonationRequestId) -> Result<Option<DonationRequest>, RepositoryError>;
    /// Full history, newest first.
    fn all(&self) -> Result<Vec<DonationRequest>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local history. Requests are never deleted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDonationRepository {
    records: Arc<Mutex<Vec<DonationRequest>>>,
}

impl InMemoryDonationRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<DonationRequest>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("donation store poisoned".to_string()))
    }
}

impl DonationRepository for InMemoryDonationRepository {
    fn insert(&self, record: DonationRequest) -> Result<DonationRequest, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, record.clone());
        Ok(record)
    }

    fn update(&self, record: DonationRequest) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch(&self, id: &DonationRequestId) -> Result<Option<DonationRequest>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<DonationRequest>, RepositoryError> {
        Ok(self.lock()?.clone())
    }
}
