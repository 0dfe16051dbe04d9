use serde::{Deserialize, Serialize};

pub const SILVER_MIN_DONATIONS: u32 = 1;
pub const GOLD_MIN_DONATIONS: u32 = 10;
pub const DIAMOND_MIN_DONATIONS: u32 = 25;

/// Donor recognition level. Always derived from a count, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipTier {
    Silver,
    Gold,
    Diamond,
}

impl MembershipTier {
    pub const fn for_count(donations: u32) -> Option<Self> {
        if donations >= DIAMOND_MIN_DONATIONS {
            Some(Self::Diamond)
        } else if donations >= GOLD_MIN_DONATIONS {
            Some(Self::Gold)
        } else if donations >= SILVER_MIN_DONATIONS {
            Some(Self::Silver)
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
        }
    }

    /// Donations still needed to reach the next tier, if there is one.
    pub const fn remaining_to_next(donations: u32) -> Option<u32> {
        let next = if donations < SILVER_MIN_DONATIONS {
            SILVER_MIN_DONATIONS
        } else if donations < GOLD_MIN_DONATIONS {
            GOLD_MIN_DONATIONS
        } else if donations < DIAMOND_MIN_DONATIONS {
            DIAMOND_MIN_DONATIONS
        } else {
            return None;
        };
        Some(next - donations)
    }
}
