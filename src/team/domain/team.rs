//! Team aggregate and its validated descriptive fields.

use super::{EventId, TeamDomainError, TeamId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TEAM_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Validated team name, unique (case-insensitively) within an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated team name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyTeamName`] when the trimmed value is
    /// empty or [`TeamDomainError::TeamNameTooLong`] when it exceeds 100
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyTeamName);
        }
        if trimmed.chars().count() > MAX_TEAM_NAME_CHARS {
            return Err(TeamDomainError::TeamNameTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased form used for uniqueness comparisons.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for TeamName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The mutable descriptive fields of a team.
///
/// Used both when a team is created and for the explicit update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDetails {
    name: TeamName,
    description: String,
    showcase_url: String,
}

impl TeamDetails {
    /// Validates and bundles team details.
    ///
    /// An empty showcase URL is allowed and means "not published yet".
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError`] when the name, description length, or
    /// showcase URL is invalid.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        showcase_url: impl Into<String>,
    ) -> Result<Self, TeamDomainError> {
        let team_name = TeamName::new(name)?;
        let description_value = description.into().trim().to_owned();
        if description_value.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(TeamDomainError::DescriptionTooLong);
        }
        let url = showcase_url.into().trim().to_owned();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TeamDomainError::InvalidShowcaseUrl(url));
        }
        Ok(Self {
            name: team_name,
            description: description_value,
            showcase_url: url,
        })
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the showcase link.
    #[must_use]
    pub fn showcase_url(&self) -> &str {
        &self.showcase_url
    }
}

/// Team aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    event_id: EventId,
    creator_id: UserId,
    name: TeamName,
    description: String,
    showcase_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Persisted team identifier.
    pub id: TeamId,
    /// Owning event.
    pub event_id: EventId,
    /// Creator of the team.
    pub creator_id: UserId,
    /// Persisted name.
    pub name: TeamName,
    /// Persisted description.
    pub description: String,
    /// Persisted showcase link.
    pub showcase_url: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team for `creator_id` within `event_id`.
    #[must_use]
    pub fn new(
        event_id: EventId,
        creator_id: UserId,
        details: TeamDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let TeamDetails {
            name,
            description,
            showcase_url,
        } = details;
        Self {
            id: TeamId::new(),
            event_id,
            creator_id,
            name,
            description,
            showcase_url,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            id: data.id,
            event_id: data.event_id,
            creator_id: data.creator_id,
            name: data.name,
            description: data.description,
            showcase_url: data.showcase_url,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the owning event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the team name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the showcase link.
    #[must_use]
    pub fn showcase_url(&self) -> &str {
        &self.showcase_url
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user_id` created this team.
    #[must_use]
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.creator_id == user_id
    }

    /// Replaces the descriptive fields and refreshes `updated_at`.
    pub fn apply_details(&mut self, details: TeamDetails, updated_at: DateTime<Utc>) {
        self.name = details.name;
        self.description = details.description;
        self.showcase_url = details.showcase_url;
        self.updated_at = updated_at;
    }
}
