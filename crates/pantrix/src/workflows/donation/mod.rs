//! Surplus donation lifecycle and donor recognition.

mod aggregates;
pub mod domain;
mod membership;
pub mod repository;
mod service;

pub use aggregates::{DonationAggregates, PartnerInfo, PartnerSummary};
pub use domain::{
    DeliveryType, DonationAction, DonationDraft, DonationRequest, DonationRequestId,
    DonationStatus,
};
pub use membership::{
    MembershipTier, DIAMOND_MIN_DONATIONS, GOLD_MIN_DONATIONS, SILVER_MIN_DONATIONS,
};
pub use repository::{DonationRepository, InMemoryDonationRepository, RepositoryError};
pub use service::{DonationError, DonationWorkflow, TransitionOutcome, TransitionPolicy};
