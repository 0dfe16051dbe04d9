use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{DonationRequest, DonationStatus};
use super::membership::MembershipTier;

/// A restaurant that has appeared in the donation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerInfo {
    pub name: String,
    pub location: String,
}

/// Partner row for the food-bank dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerSummary {
    pub name: String,
    pub location: String,
    pub completed_donations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MembershipTier>,
}

/// Read-only views recomputed from the full request history.
#[derive(Debug, Clone, Default)]
pub struct DonationAggregates {
    requests: Vec<DonationRequest>,
}

impl DonationAggregates {
    pub fn new(requests: Vec<DonationRequest>) -> Self {
        Self { requests }
    }

    pub fn requests(&self) -> &[DonationRequest] {
        &self.requests
    }

    /// Distinct restaurants keyed by name, in first-seen order. The first
    /// location recorded for a name wins.
    pub fn partners(&self) -> Vec<PartnerInfo> {
        let mut partners: Vec<PartnerInfo> = Vec::new();
        for request in &self.requests {
            if !partners
                .iter()
                .any(|partner| partner.name == request.restaurant_name)
            {
                partners.push(PartnerInfo {
                    name: request.restaurant_name.clone(),
                    location: request.location.clone(),
                });
            }
        }
        partners
    }

    /// Completed requests per restaurant. Partners with none report zero.
    pub fn completed_count_by_partner(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for request in &self.requests {
            let entry = counts.entry(request.restaurant_name.clone()).or_insert(0);
            if request.status == DonationStatus::Completed {
                *entry += 1;
            }
        }
        counts
    }

    pub fn completed_count(&self, partner: &str) -> u32 {
        self.requests
            .iter()
            .filter(|request| {
                request.restaurant_name == partner && request.status == DonationStatus::Completed
            })
            .count() as u32
    }

    pub fn membership_tier(&self, partner: &str) -> Option<MembershipTier> {
        MembershipTier::for_count(self.completed_count(partner))
    }

    pub fn partner_summaries(&self) -> Vec<PartnerSummary> {
        let counts = self.completed_count_by_partner();
        self.partners()
            .into_iter()
            .map(|partner| {
                let completed = counts.get(&partner.name).copied().unwrap_or(0);
                PartnerSummary {
                    name: partner.name,
                    location: partner.location,
                    completed_donations: completed,
                    tier: MembershipTier::for_count(completed),
                }
            })
            .collect()
    }

    /// Completed donations from `partner`, most recent first.
    pub fn partner_history(&self, partner: &str) -> Vec<DonationRequest> {
        let mut history: Vec<DonationRequest> = self
            .requests
            .iter()
            .filter(|request| {
                request.restaurant_name == partner && request.status == DonationStatus::Completed
            })
            .cloned()
            .collect();
        history.sort_by(|a, b| b.donation_date.cmp(&a.donation_date));
        history
    }

    pub fn pending(&self) -> Vec<DonationRequest> {
        self.with_status(|status| status == DonationStatus::Pending)
    }

    /// Accepted or completed requests, i.e. shipments the food bank has taken on.
    pub fn active_shipments(&self) -> Vec<DonationRequest> {
        self.with_status(|status| {
            matches!(status, DonationStatus::Accepted | DonationStatus::Completed)
        })
    }

    fn with_status(&self, keep: impl Fn(DonationStatus) -> bool) -> Vec<DonationRequest> {
        self.requests
            .iter()
            .filter(|request| keep(request.status))
            .cloned()
            .collect()
    }
}
