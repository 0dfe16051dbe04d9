pub mod donation;
pub mod hotspots;
pub mod inventory;
pub mod requirements;
pub mod shopping;
