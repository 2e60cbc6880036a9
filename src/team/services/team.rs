//! Team creation, lookup, listing, and update.

use super::error::{TeamServiceError, TeamServiceResult, log_failure};
use crate::context::RequestContext;
use crate::team::{
    domain::{EventId, Team, TeamDetails, TeamId, TeamInfo},
    ports::TeamStore,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    name: String,
    description: String,
    showcase_url: String,
}

impl CreateTeamRequest {
    /// Creates a request with the team name only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            showcase_url: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the showcase link.
    #[must_use]
    pub fn with_showcase_url(mut self, showcase_url: impl Into<String>) -> Self {
        self.showcase_url = showcase_url.into();
        self
    }

    fn into_details(self) -> Result<TeamDetails, TeamServiceError> {
        Ok(TeamDetails::new(
            self.name,
            self.description,
            self.showcase_url,
        )?)
    }
}

/// Request payload replacing a team's descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTeamRequest {
    name: String,
    description: String,
    showcase_url: String,
}

impl UpdateTeamRequest {
    /// Creates a request with every field.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        showcase_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            showcase_url: showcase_url.into(),
        }
    }

    fn into_details(self) -> Result<TeamDetails, TeamServiceError> {
        Ok(TeamDetails::new(
            self.name,
            self.description,
            self.showcase_url,
        )?)
    }
}

/// Team orchestration service.
#[derive(Clone)]
pub struct TeamService<S, C>
where
    S: TeamStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TeamService<S, C>
where
    S: TeamStore,
    C: Clock + Send + Sync,
{
    /// Creates a new team service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a team owned by the caller, who becomes its first accepted
    /// member.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Validation`] for invalid details,
    /// [`TeamServiceError::EventNotFound`] when the event is missing, or
    /// [`TeamServiceError::DuplicateTeamName`] when the name is taken.
    #[instrument(skip(self, ctx, request), fields(user_id = %ctx.identity().user_id()))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateTeamRequest,
        event_id: EventId,
    ) -> TeamServiceResult<TeamInfo> {
        self.create_team(ctx, request, event_id)
            .await
            .inspect_err(|err| log_failure("team.create", err))
    }

    async fn create_team(
        &self,
        ctx: &RequestContext,
        request: CreateTeamRequest,
        event_id: EventId,
    ) -> TeamServiceResult<TeamInfo> {
        let details = request.into_details()?;

        ctx.guard(self.store.find_event_by_id(event_id))
            .await??
            .ok_or(TeamServiceError::EventNotFound(event_id))?;

        let existing = ctx
            .guard(
                self.store
                    .find_team_by_event_id_and_name(event_id, details.name()),
            )
            .await??;
        if existing.is_some() {
            return Err(TeamServiceError::DuplicateTeamName {
                event_id,
                name: details.name().as_str().to_owned(),
            });
        }

        let team = Team::new(event_id, ctx.identity().user_id(), details, &*self.clock);
        let created = ctx.guard(self.store.create_team(&team)).await??;
        info!(team_id = %team.id(), name = %team.name(), "team created");
        Ok(created)
    }

    /// Lists every team of an event.
    ///
    /// Teams that cannot be assembled are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError`] when the listing itself fails.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> TeamServiceResult<Vec<TeamInfo>> {
        let listing = ctx
            .guard(self.store.list_teams(event_id))
            .await?
            .map_err(TeamServiceError::from)
            .inspect_err(|err| log_failure("team.list", err))?;
        for failure in &listing.failures {
            warn!(
                record_id = %failure.record_id,
                error = %failure.error,
                "skipped team while listing"
            );
        }
        Ok(listing.teams)
    }

    /// Returns one team with its creator and members.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamNotFound`] when the team is missing.
    #[instrument(skip(self, ctx))]
    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TeamServiceResult<TeamInfo> {
        self.find_team_info(ctx, team_id)
            .await
            .inspect_err(|err| log_failure("team.find_by_id", err))
    }

    async fn find_team_info(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TeamServiceResult<TeamInfo> {
        let team = self.find_team_or_error(ctx, team_id).await?;
        Ok(ctx.guard(self.store.resolve_team_info(team)).await??)
    }

    /// Replaces a team's name, description, and showcase link.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::NotTeamCreator`] unless the caller created
    /// the team, plus the validation and lookup errors of
    /// [`Self::create`].
    #[instrument(skip(self, ctx, request), fields(user_id = %ctx.identity().user_id()))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        request: UpdateTeamRequest,
    ) -> TeamServiceResult<TeamInfo> {
        self.update_team(ctx, team_id, request)
            .await
            .inspect_err(|err| log_failure("team.update", err))
    }

    async fn update_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        request: UpdateTeamRequest,
    ) -> TeamServiceResult<TeamInfo> {
        let details = request.into_details()?;
        let team = self.find_team_or_error(ctx, team_id).await?;
        let user_id = ctx.identity().user_id();
        if !team.is_created_by(user_id) {
            return Err(TeamServiceError::NotTeamCreator { team_id, user_id });
        }

        let updated = ctx
            .guard(self.store.update_team(team_id, &details, self.clock.utc()))
            .await??;
        info!(team_id = %team_id, "team updated");
        Ok(ctx.guard(self.store.resolve_team_info(updated)).await??)
    }

    async fn find_team_or_error(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TeamServiceResult<Team> {
        ctx.guard(self.store.find_team_by_id(team_id))
            .await??
            .ok_or(TeamServiceError::TeamNotFound(team_id))
    }
}
