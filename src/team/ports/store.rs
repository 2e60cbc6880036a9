//! Persistence port for users, events, teams, and team memberships.
//!
//! Implementations treat each record kind as its own collection. All
//! team-member queries take the owning event whenever one is known so a
//! lookup can never leak records from another event.

use crate::team::domain::{
    EmailAddress, Event, EventId, MembershipStatus, Team, TeamDetails, TeamId, TeamInfo,
    TeamMember, TeamMemberId, TeamMemberInfo, TeamName, User, UserId, UserInfo,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team store operations.
pub type TeamStoreResult<T> = Result<T, TeamStoreError>;

/// Conditional status write applied atomically by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Membership to update.
    pub member_id: TeamMemberId,
    /// Status the caller observed; the write only applies if it still holds.
    pub expected: MembershipStatus,
    /// Status to write.
    pub target: MembershipStatus,
    /// When set, the write only applies while the team's accepted count is
    /// below this limit.
    pub capacity: Option<usize>,
    /// Timestamp recorded as the membership's `updated_at`.
    pub updated_at: DateTime<Utc>,
}

/// Result of a conditional status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The write was committed.
    Applied(TeamMember),
    /// The team had already reached capacity; nothing was written.
    TeamComplete {
        /// Accepted members counted at the time of the check.
        accepted: usize,
    },
    /// The stored status no longer matched the expected one; nothing was
    /// written.
    StatusChanged {
        /// Status found in the store.
        current: MembershipStatus,
    },
}

/// A record skipped while building a best-effort listing.
#[derive(Debug, Clone)]
pub struct ListingFailure {
    /// Identifier of the record that could not be assembled.
    pub record_id: String,
    /// Why it was skipped.
    pub error: TeamStoreError,
}

/// Teams of one event, plus the records that could not be assembled.
#[derive(Debug, Clone, Default)]
pub struct TeamListing {
    /// Fully resolved teams.
    pub teams: Vec<TeamInfo>,
    /// Records skipped during decoding or resolution.
    pub failures: Vec<ListingFailure>,
}

/// Team and membership persistence contract.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user_by_id(&self, id: UserId) -> TeamStoreResult<Option<User>>;

    /// Finds a user by email address (case-insensitive).
    async fn find_user_by_email(&self, email: &EmailAddress) -> TeamStoreResult<Option<User>>;

    /// Finds an event by identifier.
    async fn find_event_by_id(&self, id: EventId) -> TeamStoreResult<Option<Event>>;

    /// Stores a new team together with the creator's accepted membership and
    /// returns the resolved aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::EventNotFound`] when the owning event does
    /// not exist, [`TeamStoreError::DuplicateTeamName`] when the event already
    /// has a team with that name, or [`TeamStoreError::DuplicateTeam`] when
    /// the identifier is taken.
    async fn create_team(&self, team: &Team) -> TeamStoreResult<TeamInfo>;

    /// Returns the teams of an event. Records that cannot be decoded are
    /// reported in the second element instead of failing the scan.
    async fn scan_teams_by_event(
        &self,
        event_id: EventId,
    ) -> TeamStoreResult<(Vec<Team>, Vec<ListingFailure>)>;

    /// Finds a team by identifier.
    async fn find_team_by_id(&self, id: TeamId) -> TeamStoreResult<Option<Team>>;

    /// Finds a team by event and name (case-insensitive).
    async fn find_team_by_event_id_and_name(
        &self,
        event_id: EventId,
        name: &TeamName,
    ) -> TeamStoreResult<Option<Team>>;

    /// Replaces a team's descriptive fields and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::TeamNotFound`] when the team does not exist
    /// or [`TeamStoreError::DuplicateTeamName`] when the new name is taken.
    async fn update_team(
        &self,
        id: TeamId,
        details: &TeamDetails,
        updated_at: DateTime<Utc>,
    ) -> TeamStoreResult<Team>;

    /// Stores a new membership record.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::DuplicateMembership`] when the invitee
    /// already has a record on the team.
    async fn create_team_member(&self, member: &TeamMember) -> TeamStoreResult<()>;

    /// Finds a membership by identifier.
    async fn find_team_member_by_id(&self, id: TeamMemberId)
    -> TeamStoreResult<Option<TeamMember>>;

    /// Finds the membership of `invitee_id` on `team_id`.
    async fn find_team_member_by_invitee(
        &self,
        team_id: TeamId,
        invitee_id: UserId,
    ) -> TeamStoreResult<Option<TeamMember>>;

    /// Returns every membership `invitee_id` holds within `event_id`.
    async fn find_team_members_by_invitee_and_event(
        &self,
        invitee_id: UserId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>>;

    /// Returns the memberships of a team within an event, oldest first.
    async fn find_team_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>>;

    /// Applies a conditional status write as one atomic operation.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::TeamMemberNotFound`] when the membership does
    /// not exist or [`TeamStoreError::Conflict`] when the store aborted the
    /// write because of a concurrent update.
    async fn transition_team_member(
        &self,
        request: &TransitionRequest,
    ) -> TeamStoreResult<TransitionOutcome>;

    /// Deletes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::TeamMemberNotFound`] when it does not exist.
    async fn delete_team_member(&self, id: TeamMemberId) -> TeamStoreResult<()>;

    /// Counts accepted memberships of a team within an event.
    async fn count_accepted_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<usize>;

    /// Returns whether the team has reached `limit` accepted members.
    async fn is_team_complete(
        &self,
        team_id: TeamId,
        event_id: EventId,
        limit: usize,
    ) -> TeamStoreResult<bool> {
        Ok(self.count_accepted_members(team_id, event_id).await? >= limit)
    }

    /// Joins a membership with its invitee and inviter projections.
    async fn resolve_team_member_info(
        &self,
        member: &TeamMember,
    ) -> TeamStoreResult<TeamMemberInfo> {
        let invitee = self
            .find_user_by_id(member.invitee_id())
            .await?
            .map(|user| user.info());
        let inviter = self
            .find_user_by_id(member.inviter_id())
            .await?
            .map(|user| user.info());
        Ok(TeamMemberInfo::new(member, invitee, inviter))
    }

    /// Returns the resolved memberships of a team within an event.
    async fn list_team_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMemberInfo>> {
        let members = self.find_team_members(team_id, event_id).await?;
        let mut resolved = Vec::with_capacity(members.len());
        for member in &members {
            resolved.push(self.resolve_team_member_info(member).await?);
        }
        Ok(resolved)
    }

    /// Joins a team with its creator projection and member list.
    async fn resolve_team_info(&self, team: Team) -> TeamStoreResult<TeamInfo> {
        let created_by = self
            .find_user_by_id(team.creator_id())
            .await?
            .map(|user| user.info());
        let members = self.list_team_members(team.id(), team.event_id()).await?;
        Ok(TeamInfo {
            team,
            created_by,
            members,
        })
    }

    /// Returns every team of an event, resolved. A team that cannot be
    /// resolved is reported in [`TeamListing::failures`] and skipped.
    async fn list_teams(&self, event_id: EventId) -> TeamStoreResult<TeamListing> {
        let (teams, mut failures) = self.scan_teams_by_event(event_id).await?;
        let mut resolved = Vec::with_capacity(teams.len());
        for team in teams {
            let team_id = team.id();
            match self.resolve_team_info(team).await {
                Ok(info) => resolved.push(info),
                Err(error) => failures.push(ListingFailure {
                    record_id: team_id.to_string(),
                    error,
                }),
            }
        }
        Ok(TeamListing {
            teams: resolved,
            failures,
        })
    }

    /// Returns the distinct users with a pending invitation to `invitee_id`
    /// within `event_id`.
    async fn list_inviters(
        &self,
        invitee_id: UserId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<UserInfo>> {
        let memberships = self
            .find_team_members_by_invitee_and_event(invitee_id, event_id)
            .await?;
        let mut seen = HashSet::new();
        let mut inviters = Vec::new();
        for membership in memberships {
            let inviter_id = membership.inviter_id();
            let is_pending = membership.status() == MembershipStatus::Invited;
            if !is_pending || inviter_id == invitee_id || !seen.insert(inviter_id) {
                continue;
            }
            if let Some(user) = self.find_user_by_id(inviter_id).await? {
                inviters.push(user.info());
            }
        }
        Ok(inviters)
    }
}

/// Errors returned by team store implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamStoreError {
    /// The team was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The membership was not found.
    #[error("team member not found: {0}")]
    TeamMemberNotFound(TeamMemberId),

    /// The event was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// The event already has a team with this name.
    #[error("duplicate team name '{name}' in event {event_id}")]
    DuplicateTeamName {
        /// Owning event.
        event_id: EventId,
        /// Conflicting name.
        name: String,
    },

    /// The invitee already has a membership record on the team.
    #[error("user {invitee_id} already has a membership on team {team_id}")]
    DuplicateMembership {
        /// Team identifier.
        team_id: TeamId,
        /// Invitee identifier.
        invitee_id: UserId,
    },

    /// The store aborted a write because of a concurrent update.
    #[error("concurrent update conflict: {0}")]
    Conflict(Arc<dyn std::error::Error + Send + Sync>),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamStoreError {
    /// Wraps a concurrent-update failure.
    pub fn conflict(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Conflict(Arc::new(err))
    }

    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
