/// Form-level validation failures. Raised before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("select at least one item to donate")]
    NoItemsSelected,
    #[error("select an NGO to donate to")]
    NoNgoSelected,
}

/// Fails with `MissingField(field)` when `value` is blank.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}
