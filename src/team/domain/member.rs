//! Team membership records and the invitation state machine.

use super::{
    EventId, MembershipTransitionError, ParseMembershipStatusError, Team, TeamDomainError, TeamId,
    TeamMemberId, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership status of one user on one team.
///
/// Only `Accepted` counts toward team capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    /// The user has been invited and has not answered yet.
    Invited,
    /// The user is a member of the team.
    Accepted,
    /// The invitation was declined or withdrawn.
    Rejected,
}

impl MembershipStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invited => "Invited",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Invited, Self::Accepted | Self::Rejected)
        )
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MembershipStatus {
    type Error = ParseMembershipStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "invited" => Ok(Self::Invited),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseMembershipStatusError(value.to_owned())),
        }
    }
}

/// The response an invitee (or inviter) gives to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusUpdate {
    /// Join the team.
    Accept,
    /// Decline, or withdraw when sent by the inviter.
    Reject,
}

impl StatusUpdate {
    /// Parses the status string carried by an update request.
    ///
    /// Accepts `accept`/`accepted` and `reject`/`rejected`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::InvalidStatusUpdate`] for any other value.
    pub fn parse(value: &str) -> Result<Self, TeamDomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" => Ok(Self::Accept),
            "reject" | "rejected" => Ok(Self::Reject),
            _ => Err(TeamDomainError::InvalidStatusUpdate(value.to_owned())),
        }
    }

    /// Returns the membership status this response moves the record to.
    #[must_use]
    pub const fn target_status(self) -> MembershipStatus {
        match self {
            Self::Accept => MembershipStatus::Accepted,
            Self::Reject => MembershipStatus::Rejected,
        }
    }
}

/// Membership record linking one invitee to one team within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    id: TeamMemberId,
    team_id: TeamId,
    event_id: EventId,
    inviter_id: UserId,
    invitee_id: UserId,
    status: MembershipStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamMemberData {
    /// Persisted membership identifier.
    pub id: TeamMemberId,
    /// Team the membership belongs to.
    pub team_id: TeamId,
    /// Event the team belongs to.
    pub event_id: EventId,
    /// User who sent the invitation.
    pub inviter_id: UserId,
    /// User who was invited.
    pub invitee_id: UserId,
    /// Persisted status.
    pub status: MembershipStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TeamMember {
    /// Creates a pending invitation.
    #[must_use]
    pub fn invite(
        team: &Team,
        inviter_id: UserId,
        invitee_id: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TeamMemberId::new(),
            team_id: team.id(),
            event_id: team.event_id(),
            inviter_id,
            invitee_id,
            status: MembershipStatus::Invited,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates the creator's own membership, accepted from the start.
    #[must_use]
    pub fn creator_of(team: &Team) -> Self {
        Self {
            id: TeamMemberId::new(),
            team_id: team.id(),
            event_id: team.event_id(),
            inviter_id: team.creator_id(),
            invitee_id: team.creator_id(),
            status: MembershipStatus::Accepted,
            created_at: team.created_at(),
            updated_at: team.created_at(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamMemberData) -> Self {
        Self {
            id: data.id,
            team_id: data.team_id,
            event_id: data.event_id,
            inviter_id: data.inviter_id,
            invitee_id: data.invitee_id,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> TeamMemberId {
        self.id
    }

    /// Returns the team.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the inviter.
    #[must_use]
    pub const fn inviter_id(&self) -> UserId {
        self.inviter_id
    }

    /// Returns the invitee.
    #[must_use]
    pub const fn invitee_id(&self) -> UserId {
        self.invitee_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> MembershipStatus {
        self.status
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

    /// Returns whether this record belongs to `team_id` within `event_id`.
    #[must_use]
    pub fn belongs_to(&self, team_id: TeamId, event_id: EventId) -> bool {
        self.team_id == team_id && self.event_id == event_id
    }

    /// Validates that the record may move to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipTransitionError`] when the current status does not
    /// allow the transition.
    pub fn ensure_can_transition(
        &self,
        target: MembershipStatus,
    ) -> Result<(), MembershipTransitionError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(MembershipTransitionError {
            from: self.status.as_str().to_owned(),
            to: target.as_str().to_owned(),
        })
    }

    /// Moves the record to `target`, validating the transition first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipTransitionError`] when the transition is invalid.
    pub fn transition_to(
        &mut self,
        target: MembershipStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MembershipTransitionError> {
        self.ensure_can_transition(target)?;
        self.status = target;
        self.updated_at = updated_at;
        Ok(())
    }
}
