//! Parse errors shared by the domain enums.

use thiserror::Error;

/// A string did not name any variant of a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {field}: '{value}'")]
pub struct UnknownVariant {
    /// Name of the enum being parsed (e.g. `asset type`).
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
