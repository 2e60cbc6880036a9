//! Error types for team domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing team domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The team name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyTeamName,

    /// The team name exceeds the 100-character storage limit.
    #[error("team name exceeds 100 character limit: {0}")]
    TeamNameTooLong(String),

    /// The team description exceeds the 2000-character storage limit.
    #[error("team description exceeds 2000 character limit")]
    DescriptionTooLong,

    /// The showcase link is not an `http://` or `https://` URL.
    #[error("showcase URL '{0}' must start with 'http://' or 'https://'")]
    InvalidShowcaseUrl(String),

    /// An invitation request carried no email addresses.
    #[error("at least one email address is required")]
    EmptyEmailList,

    /// An email address is not well formed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A membership status update carried an unsupported value.
    #[error("unsupported membership status '{0}', expected 'accept' or 'reject'")]
    InvalidStatusUpdate(String),
}

/// Error returned while parsing membership status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership status: {0}")]
pub struct ParseMembershipStatusError(pub String);

/// Error returned when a membership status change is not permitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid membership transition: {from} -> {to}")]
pub struct MembershipTransitionError {
    /// Current status in canonical string form.
    pub from: String,
    /// Requested status in canonical string form.
    pub to: String,
}
