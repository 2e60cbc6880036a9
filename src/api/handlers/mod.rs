//! Route handlers grouped by resource.

pub(super) mod categories;
pub(super) mod members;
pub(super) mod teams;

use super::{ApiError, AppState, Backend};
use crate::context::RequestContext;
use crate::team::{
    domain::{EventId, TeamId, TeamInfo},
    services::TeamServiceError,
};

/// Loads a team addressed under an event path, treating a team from another
/// event as missing.
async fn team_in_event<B: Backend>(
    state: &AppState<B>,
    ctx: &RequestContext,
    event_id: EventId,
    team_id: TeamId,
) -> Result<TeamInfo, ApiError> {
    let team = state.teams().find_by_id(ctx, team_id).await?;
    if team.team.event_id() != event_id {
        return Err(TeamServiceError::TeamNotFound(team_id).into());
    }
    Ok(team)
}
