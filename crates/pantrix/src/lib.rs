pub mod collaborators;
pub mod config;
pub mod dates;
pub mod error;
pub mod pantry;
pub mod profile;
pub mod telemetry;
pub mod validation;
pub mod workflows;
