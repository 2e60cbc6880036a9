//! Team routes.

use super::team_in_event;
use crate::api::{ApiError, AppState, Backend, TeamBody};
use crate::context::RequestIdentity;
use crate::team::domain::{EventId, TeamId, TeamInfo};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use validator::Validate;

pub(in crate::api) async fn create<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(event_id): Path<EventId>,
    Json(body): Json<TeamBody>,
) -> Result<(StatusCode, Json<TeamInfo>), ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    let team = state
        .teams()
        .create(&ctx, body.into_create(), event_id)
        .await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub(in crate::api) async fn list<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Vec<TeamInfo>>, ApiError> {
    let ctx = state.context(identity);
    Ok(Json(state.teams().list(&ctx, event_id).await?))
}

pub(in crate::api) async fn find_by_id<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path((event_id, team_id)): Path<(EventId, TeamId)>,
) -> Result<Json<TeamInfo>, ApiError> {
    let ctx = state.context(identity);
    Ok(Json(team_in_event(&state, &ctx, event_id, team_id).await?))
}

pub(in crate::api) async fn update<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path((event_id, team_id)): Path<(EventId, TeamId)>,
    Json(body): Json<TeamBody>,
) -> Result<Json<TeamInfo>, ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    team_in_event(&state, &ctx, event_id, team_id).await?;
    Ok(Json(
        state
            .teams()
            .update(&ctx, team_id, body.into_update())
            .await?,
    ))
}
