//! Error types for category validation.

use thiserror::Error;

/// Errors returned while constructing category values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryDomainError {
    /// The name is empty after trimming.
    #[error("category name must not be empty")]
    EmptyName,

    /// The name exceeds the storage limit.
    #[error("category name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// The description exceeds the storage limit.
    #[error("category description exceeds 2000 character limit")]
    DescriptionTooLong,
}
