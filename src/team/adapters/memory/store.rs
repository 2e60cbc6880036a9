//! In-memory team store used by tests and local runs.

use crate::team::{
    domain::{
        EmailAddress, Event, EventId, MembershipStatus, Team, TeamDetails, TeamId, TeamInfo,
        TeamMember, TeamMemberId, TeamName, User, UserId,
    },
    ports::{
        ListingFailure, TeamStore, TeamStoreError, TeamStoreResult, TransitionOutcome,
        TransitionRequest,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory team store.
///
/// A single write lock covers every mutation, so the conditional status
/// write in [`TeamStore::transition_team_member`] is atomic with respect to
/// concurrent accepts on the same team.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamStore {
    state: Arc<RwLock<InMemoryTeamState>>,
}

#[derive(Debug, Default)]
struct InMemoryTeamState {
    users: HashMap<UserId, User>,
    email_index: HashMap<String, UserId>,
    events: HashMap<EventId, Event>,
    teams: HashMap<TeamId, Team>,
    team_order: Vec<TeamId>,
    team_name_index: HashMap<(EventId, String), TeamId>,
    members: HashMap<TeamMemberId, TeamMember>,
    member_order: Vec<TeamMemberId>,
    invitee_index: HashMap<(TeamId, UserId), TeamMemberId>,
}

impl InMemoryTeamState {
    fn accepted_count(&self, team_id: TeamId, event_id: EventId) -> usize {
        self.members
            .values()
            .filter(|member| {
                member.belongs_to(team_id, event_id)
                    && member.status() == MembershipStatus::Accepted
            })
            .count()
    }

    fn insert_member(&mut self, member: &TeamMember) -> TeamStoreResult<()> {
        let key = (member.team_id(), member.invitee_id());
        if self.invitee_index.contains_key(&key) {
            return Err(TeamStoreError::DuplicateMembership {
                team_id: member.team_id(),
                invitee_id: member.invitee_id(),
            });
        }
        self.invitee_index.insert(key, member.id());
        self.member_order.push(member.id());
        self.members.insert(member.id(), member.clone());
        Ok(())
    }
}

impl InMemoryTeamStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so it can be found by identifier and email.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::Persistence`] if the lock is poisoned.
    pub fn insert_user(&self, user: User) -> TeamStoreResult<()> {
        let mut state = self.write_state()?;
        state
            .email_index
            .insert(user.email().as_str().to_owned(), user.id());
        state.users.insert(user.id(), user);
        Ok(())
    }

    /// Registers an event so teams can be created in it.
    ///
    /// # Errors
    ///
    /// Returns [`TeamStoreError::Persistence`] if the lock is poisoned.
    pub fn insert_event(&self, event: Event) -> TeamStoreResult<()> {
        let mut state = self.write_state()?;
        state.events.insert(event.id(), event);
        Ok(())
    }

    fn read_state(&self) -> TeamStoreResult<RwLockReadGuard<'_, InMemoryTeamState>> {
        self.state
            .read()
            .map_err(|err| TeamStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> TeamStoreResult<RwLockWriteGuard<'_, InMemoryTeamState>> {
        self.state
            .write()
            .map_err(|err| TeamStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn find_user_by_id(&self, id: UserId) -> TeamStoreResult<Option<User>> {
        let state = self.read_state()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> TeamStoreResult<Option<User>> {
        let state = self.read_state()?;
        Ok(state
            .email_index
            .get(email.as_str())
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_event_by_id(&self, id: EventId) -> TeamStoreResult<Option<Event>> {
        let state = self.read_state()?;
        Ok(state.events.get(&id).cloned())
    }

    async fn create_team(&self, team: &Team) -> TeamStoreResult<TeamInfo> {
        {
            let mut state = self.write_state()?;
            if !state.events.contains_key(&team.event_id()) {
                return Err(TeamStoreError::EventNotFound(team.event_id()));
            }
            if state.teams.contains_key(&team.id()) {
                return Err(TeamStoreError::DuplicateTeam(team.id()));
            }
            let name_key = (team.event_id(), team.name().normalized());
            if state.team_name_index.contains_key(&name_key) {
                return Err(TeamStoreError::DuplicateTeamName {
                    event_id: team.event_id(),
                    name: team.name().as_str().to_owned(),
                });
            }

            state.insert_member(&TeamMember::creator_of(team))?;
            state.team_name_index.insert(name_key, team.id());
            state.team_order.push(team.id());
            state.teams.insert(team.id(), team.clone());
        }
        self.resolve_team_info(team.clone()).await
    }

    async fn scan_teams_by_event(
        &self,
        event_id: EventId,
    ) -> TeamStoreResult<(Vec<Team>, Vec<ListingFailure>)> {
        let state = self.read_state()?;
        let teams = state
            .team_order
            .iter()
            .filter_map(|id| state.teams.get(id))
            .filter(|team| team.event_id() == event_id)
            .cloned()
            .collect();
        Ok((teams, Vec::new()))
    }

    async fn find_team_by_id(&self, id: TeamId) -> TeamStoreResult<Option<Team>> {
        let state = self.read_state()?;
        Ok(state.teams.get(&id).cloned())
    }

    async fn find_team_by_event_id_and_name(
        &self,
        event_id: EventId,
        name: &TeamName,
    ) -> TeamStoreResult<Option<Team>> {
        let state = self.read_state()?;
        Ok(state
            .team_name_index
            .get(&(event_id, name.normalized()))
            .and_then(|id| state.teams.get(id))
            .cloned())
    }

    async fn update_team(
        &self,
        id: TeamId,
        details: &TeamDetails,
        updated_at: DateTime<Utc>,
    ) -> TeamStoreResult<Team> {
        let mut state = self.write_state()?;
        let stored = state
            .teams
            .get(&id)
            .ok_or(TeamStoreError::TeamNotFound(id))?
            .clone();

        let old_key = (stored.event_id(), stored.name().normalized());
        let new_key = (stored.event_id(), details.name().normalized());
        if old_key != new_key {
            if let Some(&indexed_id) = state.team_name_index.get(&new_key)
                && indexed_id != id
            {
                return Err(TeamStoreError::DuplicateTeamName {
                    event_id: stored.event_id(),
                    name: details.name().as_str().to_owned(),
                });
            }
            state.team_name_index.remove(&old_key);
            state.team_name_index.insert(new_key, id);
        }

        let mut updated = stored;
        updated.apply_details(details.clone(), updated_at);
        state.teams.insert(id, updated.clone());
        Ok(updated)
    }

    async fn create_team_member(&self, member: &TeamMember) -> TeamStoreResult<()> {
        let mut state = self.write_state()?;
        if !state.teams.contains_key(&member.team_id()) {
            return Err(TeamStoreError::TeamNotFound(member.team_id()));
        }
        state.insert_member(member)
    }

    async fn find_team_member_by_id(
        &self,
        id: TeamMemberId,
    ) -> TeamStoreResult<Option<TeamMember>> {
        let state = self.read_state()?;
        Ok(state.members.get(&id).cloned())
    }

    async fn find_team_member_by_invitee(
        &self,
        team_id: TeamId,
        invitee_id: UserId,
    ) -> TeamStoreResult<Option<TeamMember>> {
        let state = self.read_state()?;
        Ok(state
            .invitee_index
            .get(&(team_id, invitee_id))
            .and_then(|id| state.members.get(id))
            .cloned())
    }

    async fn find_team_members_by_invitee_and_event(
        &self,
        invitee_id: UserId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>> {
        let state = self.read_state()?;
        Ok(state
            .member_order
            .iter()
            .filter_map(|id| state.members.get(id))
            .filter(|member| member.invitee_id() == invitee_id && member.event_id() == event_id)
            .cloned()
            .collect())
    }

    async fn find_team_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<Vec<TeamMember>> {
        let state = self.read_state()?;
        Ok(state
            .member_order
            .iter()
            .filter_map(|id| state.members.get(id))
            .filter(|member| member.belongs_to(team_id, event_id))
            .cloned()
            .collect())
    }

    async fn transition_team_member(
        &self,
        request: &TransitionRequest,
    ) -> TeamStoreResult<TransitionOutcome> {
        let mut state = self.write_state()?;
        let stored = state
            .members
            .get(&request.member_id)
            .ok_or(TeamStoreError::TeamMemberNotFound(request.member_id))?
            .clone();

        if stored.status() != request.expected {
            return Ok(TransitionOutcome::StatusChanged {
                current: stored.status(),
            });
        }

        if let Some(limit) = request.capacity {
            let accepted = state.accepted_count(stored.team_id(), stored.event_id());
            if accepted >= limit {
                return Ok(TransitionOutcome::TeamComplete { accepted });
            }
        }

        let mut updated = stored;
        updated
            .transition_to(request.target, request.updated_at)
            .map_err(TeamStoreError::conflict)?;
        state.members.insert(updated.id(), updated.clone());
        Ok(TransitionOutcome::Applied(updated))
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> TeamStoreResult<()> {
        let mut state = self.write_state()?;
        let removed = state
            .members
            .remove(&id)
            .ok_or(TeamStoreError::TeamMemberNotFound(id))?;
        state
            .invitee_index
            .remove(&(removed.team_id(), removed.invitee_id()));
        state.member_order.retain(|member_id| *member_id != id);
        Ok(())
    }

    async fn count_accepted_members(
        &self,
        team_id: TeamId,
        event_id: EventId,
    ) -> TeamStoreResult<usize> {
        let state = self.read_state()?;
        Ok(state.accepted_count(team_id, event_id))
    }
}
