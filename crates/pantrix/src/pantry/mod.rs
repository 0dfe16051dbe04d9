//! Application state root tying the inventory, the donation workflow and the
//! signed-in profile together.

pub mod router;

pub use router::{pantry_router, PantryCollaborators, PantryState};

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collaborators::CollaboratorError;
use crate::profile::{FoodBankProfile, HotelProfile, Profile};
use crate::validation::ValidationError;
use crate::workflows::donation::{
    DeliveryType, DonationAction, DonationDraft, DonationError, DonationRepository,
    DonationRequest, DonationRequestId, DonationWorkflow, MembershipTier, PartnerSummary,
    TransitionOutcome, TransitionPolicy,
};
use crate::workflows::inventory::{
    ExpiryClassification, ExpirySummary, InventoryEngine, InventoryItem, InventoryItemId,
    NewInventoryItem,
};
use crate::workflows::requirements::{RequirementBoard, RequirementDraft, RequirementRequest};
use crate::workflows::shopping::ShoppingList;

/// Handle shared by HTTP handlers. Locks are never held across an `.await`.
pub type SharedPantry<R> = Arc<Mutex<Pantry<R>>>;

#[derive(Debug, thiserror::Error)]
pub enum PantryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Donation(#[from] DonationError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error("no profile is signed in")]
    NotSignedIn,
    #[error("this action requires a {expected} profile, signed in as {actual}")]
    WrongRole {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("pantry state unavailable")]
    Poisoned,
}

/// A hotel's selection of inventory rows to hand over to a food bank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSelection {
    pub item_ids: Vec<InventoryItemId>,
    #[serde(default)]
    pub ngo_name: String,
    #[serde(default)]
    pub delivery_type: DeliveryType,
    #[serde(
        default,
        deserialize_with = "crate::dates::deserialize_optional_date_time"
    )]
    pub pickup_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Slices of the donation history served to the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationView {
    #[default]
    All,
    /// Requests still waiting on a food bank.
    Pending,
    /// Accepted or completed shipments.
    Active,
    /// The signed-in hotel's own requests.
    Mine,
}

/// Donor standing shown on the hotel dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub donation_count: u32,
    pub tier: Option<MembershipTier>,
    pub remaining_to_next: Option<u32>,
}

pub struct Pantry<R> {
    inventory: InventoryEngine,
    donations: DonationWorkflow<R>,
    profile: Option<Profile>,
    shopping: ShoppingList,
    requirements: RequirementBoard,
}

impl<R> Pantry<R>
where
    R: DonationRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: TransitionPolicy) -> Self {
        Self::with_inventory(repository, policy, InventoryEngine::new())
    }

    pub fn with_inventory(
        repository: Arc<R>,
        policy: TransitionPolicy,
        inventory: InventoryEngine,
    ) -> Self {
        Self {
            inventory,
            donations: DonationWorkflow::new(repository, policy),
            profile: None,
            shopping: ShoppingList::new(),
            requirements: RequirementBoard::new(),
        }
    }

    pub fn into_shared(self) -> SharedPantry<R> {
        Arc::new(Mutex::new(self))
    }

    /// Validate and activate `profile`. Hotels carry their prior donation count
    /// over into the running counter.
    pub fn sign_in(&mut self, profile: Profile, prior_donations: u32) -> Result<&Profile, PantryError> {
        profile.validate()?;
        if let Profile::Hotel(hotel) = &profile {
            self.donations
                .seed_donor_count(hotel.name.clone(), prior_donations);
        }
        info!(role = profile.role_label(), name = %profile.name(), "profile signed in");
        Ok(self.profile.insert(profile))
    }

    /// Drop the session along with per-session state. History and stock survive.
    pub fn sign_out(&mut self) {
        if let Some(profile) = self.profile.take() {
            info!(role = profile.role_label(), name = %profile.name(), "profile signed out");
        }
        self.shopping.clear();
        self.donations.reset_donor_counts();
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    fn hotel(&self) -> Result<&HotelProfile, PantryError> {
        match &self.profile {
            Some(Profile::Hotel(hotel)) => Ok(hotel),
            Some(other) => Err(PantryError::WrongRole {
                expected: "hotel",
                actual: other.role_label(),
            }),
            None => Err(PantryError::NotSignedIn),
        }
    }

    fn food_bank(&self) -> Result<&FoodBankProfile, PantryError> {
        match &self.profile {
            Some(Profile::FoodBank(food_bank)) => Ok(food_bank),
            Some(other) => Err(PantryError::WrongRole {
                expected: "food-bank",
                actual: other.role_label(),
            }),
            None => Err(PantryError::NotSignedIn),
        }
    }

    pub fn inventory(&self) -> &InventoryEngine {
        &self.inventory
    }

    pub fn add_item(&mut self, item: NewInventoryItem) -> InventoryItem {
        self.inventory.add(item)
    }

    pub fn add_items(&mut self, items: Vec<NewInventoryItem>) -> Vec<InventoryItem> {
        self.inventory.add_batch(items)
    }

    pub fn remove_item(&mut self, id: &InventoryItemId) -> Option<InventoryItem> {
        self.inventory.remove(id)
    }

    pub fn classify(&self, today: NaiveDate) -> ExpiryClassification {
        self.inventory.classify(today)
    }

    pub fn summary(&self, today: NaiveDate) -> ExpirySummary {
        self.inventory.summary(today)
    }

    /// Offer the selected inventory rows to a food bank on behalf of the
    /// signed-in hotel.
    ///
    /// Validation runs first; on success the request is stored, the donor
    /// counter moves and the items leave the inventory. Unknown ids are skipped.
    pub fn donate(&mut self, selection: DonationSelection) -> Result<DonationRequest, PantryError> {
        let hotel = self.hotel()?;
        let restaurant_name = hotel.name.clone();
        let location = hotel.location.clone();

        let items: Vec<InventoryItem> = selection
            .item_ids
            .iter()
            .filter_map(|id| self.inventory.get(id).cloned())
            .collect();
        if items.len() < selection.item_ids.len() {
            warn!(
                requested = selection.item_ids.len(),
                found = items.len(),
                "donation selection referenced unknown items"
            );
        }
        let item_ids: Vec<InventoryItemId> = items.iter().map(|item| item.id.clone()).collect();

        let request = self.donations.create(DonationDraft {
            restaurant_name,
            location,
            items,
            ngo_name: selection.ngo_name,
            delivery_type: selection.delivery_type,
            pickup_date_time: selection.pickup_date_time,
            notes: selection.notes,
        })?;

        self.inventory.remove_many(&item_ids);
        Ok(request)
    }

    pub fn accept(&self, id: &DonationRequestId) -> Result<TransitionOutcome, PantryError> {
        Ok(self.donations.accept(id)?)
    }

    pub fn decline(&self, id: &DonationRequestId) -> Result<TransitionOutcome, PantryError> {
        Ok(self.donations.decline(id)?)
    }

    pub fn complete(
        &self,
        id: &DonationRequestId,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, PantryError> {
        Ok(self.donations.complete(id, today)?)
    }

    pub fn transition(
        &self,
        id: &DonationRequestId,
        action: DonationAction,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, PantryError> {
        Ok(self.donations.apply(id, action, today)?)
    }

    pub fn donation_requests(&self) -> Result<Vec<DonationRequest>, PantryError> {
        Ok(self.donations.requests()?)
    }

    /// Requests offered by the signed-in hotel, newest first.
    pub fn donation_history(&self) -> Result<Vec<DonationRequest>, PantryError> {
        let hotel = self.hotel()?;
        Ok(self
            .donations
            .requests()?
            .into_iter()
            .filter(|request| request.restaurant_name == hotel.name)
            .collect())
    }

    pub fn donations_in_view(&self, view: DonationView) -> Result<Vec<DonationRequest>, PantryError> {
        match view {
            DonationView::All => self.donation_requests(),
            DonationView::Pending => Ok(self.donations.aggregates()?.pending()),
            DonationView::Active => Ok(self.donations.aggregates()?.active_shipments()),
            DonationView::Mine => self.donation_history(),
        }
    }

    pub fn partner_summaries(&self) -> Result<Vec<PartnerSummary>, PantryError> {
        Ok(self.donations.aggregates()?.partner_summaries())
    }

    /// Completed donations received from one partner restaurant.
    pub fn partner_history(&self, partner: &str) -> Result<Vec<DonationRequest>, PantryError> {
        Ok(self.donations.aggregates()?.partner_history(partner))
    }

    pub fn donations(&self) -> &DonationWorkflow<R> {
        &self.donations
    }

    /// Standing of the signed-in hotel; `None` for any other session.
    pub fn membership(&self) -> Option<MembershipStatus> {
        let hotel = self.hotel().ok()?;
        let donation_count = self.donations.donor_count(&hotel.name);
        Some(MembershipStatus {
            donation_count,
            tier: MembershipTier::for_count(donation_count),
            remaining_to_next: MembershipTier::remaining_to_next(donation_count),
        })
    }

    pub fn membership_tier(&self) -> Option<MembershipTier> {
        self.membership().and_then(|status| status.tier)
    }

    pub fn shopping(&self) -> &ShoppingList {
        &self.shopping
    }

    pub fn shopping_mut(&mut self) -> &mut ShoppingList {
        &mut self.shopping
    }

    /// Publish a requirement under the signed-in food bank's own name.
    pub fn broadcast_requirement(
        &mut self,
        draft: RequirementDraft,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<RequirementRequest, PantryError> {
        let food_bank = self.food_bank()?.clone();
        Ok(self.requirements.broadcast(&food_bank, draft, now)?)
    }

    pub fn requirements(&self) -> &[RequirementRequest] {
        self.requirements.requests()
    }
}
