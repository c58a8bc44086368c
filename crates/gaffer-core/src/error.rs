//! Error types for the operation model.

/// Result type alias for operation model conversions.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building operations from untyped input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A group entry was neither a group name nor a view group.
    #[error("Invalid group entry {0}: needs to be a group name or a view group")]
    InvalidGroup(String),

    /// A group selection was neither a list of groups nor null.
    #[error("Invalid group selection {0}: needs to be a list of groups or null")]
    InvalidGroups(String),
}

impl Error {
    /// Create an invalid group error describing the rejected value.
    pub fn invalid_group(value: &serde_json::Value) -> Self {
        Self::InvalidGroup(value.to_string())
    }

    /// Create an invalid selection error describing the rejected value.
    pub fn invalid_groups(value: &serde_json::Value) -> Self {
        Self::InvalidGroups(value.to_string())
    }
}
