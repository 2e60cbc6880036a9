//! Service-level error taxonomy shared by team and membership operations.

use crate::context::ContextError;
use crate::error::ErrorKind;
use crate::team::{
    domain::{EventId, MembershipTransitionError, TeamDomainError, TeamId, TeamMemberId, UserId},
    ports::TeamStoreError,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by team and membership services.
#[derive(Debug, Clone, Error)]
pub enum TeamServiceError {
    /// Request validation failed.
    #[error(transparent)]
    Validation(#[from] TeamDomainError),

    /// The team does not exist (or not within the requested event).
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The membership does not exist (or not on the requested team).
    #[error("team member not found: {0}")]
    TeamMemberNotFound(TeamMemberId),

    /// The event does not exist.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// The caller has no accepted membership on the team.
    #[error("user {user_id} is not authorized to invite members to team {team_id}")]
    NotAuthorizedToInvite {
        /// Team the invitation targeted.
        team_id: TeamId,
        /// Caller.
        user_id: UserId,
    },

    /// The caller is not a party allowed to answer this invitation.
    #[error("user {user_id} is not authorized to update team member {team_member_id}")]
    NotAuthorizedToRespond {
        /// Membership the caller tried to update.
        team_member_id: TeamMemberId,
        /// Caller.
        user_id: UserId,
    },

    /// Only the creator may change a team's details.
    #[error("user {user_id} is not the creator of team {team_id}")]
    NotTeamCreator {
        /// Team.
        team_id: TeamId,
        /// Caller.
        user_id: UserId,
    },

    /// The event already has a team with this name.
    #[error("team name '{name}' is already taken in event {event_id}")]
    DuplicateTeamName {
        /// Event.
        event_id: EventId,
        /// Conflicting name.
        name: String,
    },

    /// The team already holds its maximum number of accepted members.
    #[error("team {team_id} is complete ({limit} accepted members)")]
    TeamComplete {
        /// Team.
        team_id: TeamId,
        /// Configured capacity.
        limit: usize,
    },

    /// The membership is not in a state that allows the requested change.
    #[error(transparent)]
    InvalidTransition(#[from] MembershipTransitionError),

    /// The membership kept changing underneath the update.
    #[error("team member {0} was modified concurrently")]
    ConcurrentUpdate(TeamMemberId),

    /// The team has no membership records in the event.
    #[error("no team members for team {team_id} in event {event_id}")]
    NoTeamMembers {
        /// Team.
        team_id: TeamId,
        /// Event.
        event_id: EventId,
    },

    /// The request context ended.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The store failed.
    #[error(transparent)]
    Store(TeamStoreError),
}

impl TeamServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::TeamNotFound(_)
            | Self::TeamMemberNotFound(_)
            | Self::EventNotFound(_)
            | Self::NoTeamMembers { .. } => ErrorKind::NotFound,
            Self::NotAuthorizedToInvite { .. }
            | Self::NotAuthorizedToRespond { .. }
            | Self::NotTeamCreator { .. } => ErrorKind::NotAuthorized,
            Self::DuplicateTeamName { .. }
            | Self::TeamComplete { .. }
            | Self::InvalidTransition(_)
            | Self::ConcurrentUpdate(_) => ErrorKind::Conflict,
            Self::Context(_) => ErrorKind::Cancelled,
            Self::Store(err) => match err {
                TeamStoreError::TeamNotFound(_)
                | TeamStoreError::TeamMemberNotFound(_)
                | TeamStoreError::EventNotFound(_) => ErrorKind::NotFound,
                TeamStoreError::DuplicateTeam(_)
                | TeamStoreError::DuplicateTeamName { .. }
                | TeamStoreError::DuplicateMembership { .. }
                | TeamStoreError::Conflict(_) => ErrorKind::Conflict,
                TeamStoreError::InvalidPersistedData(_) | TeamStoreError::Persistence(_) => {
                    ErrorKind::Store
                }
            },
        }
    }
}

impl From<TeamStoreError> for TeamServiceError {
    fn from(err: TeamStoreError) -> Self {
        match err {
            TeamStoreError::TeamNotFound(id) => Self::TeamNotFound(id),
            TeamStoreError::TeamMemberNotFound(id) => Self::TeamMemberNotFound(id),
            TeamStoreError::EventNotFound(id) => Self::EventNotFound(id),
            TeamStoreError::DuplicateTeamName { event_id, name } => {
                Self::DuplicateTeamName { event_id, name }
            }
            other => Self::Store(other),
        }
    }
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

/// Logs a failed operation at a level matching its kind.
///
/// Store failures are errors; everything else is a caller-visible
/// short-circuit and is logged as a warning.
pub(crate) fn log_failure(operation: &'static str, err: &TeamServiceError) {
    match err.kind() {
        ErrorKind::Store => error!(operation, error = %err, "team operation failed"),
        kind => warn!(operation, ?kind, error = %err, "team operation rejected"),
    }
}
