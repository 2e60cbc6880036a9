//! Membership and invitation routes.

use crate::api::{
    ApiError, AppState, Backend, InviteBody, InvitersResponse, RespondBody, TeamMemberResponse,
    TeamMembersResponse,
};
use super::team_in_event;
use crate::context::RequestIdentity;
use crate::team::{
    domain::{EventId, TeamId, TeamMemberId, TeamMemberInfo},
    services::CreateTeamMembersResponse,
};
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
    Path((event_id, team_id)): Path<(EventId, TeamId)>,
    Json(body): Json<InviteBody>,
) -> Result<(StatusCode, Json<CreateTeamMembersResponse>), ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    team_in_event(&state, &ctx, event_id, team_id).await?;
    let response = state.members().create(&ctx, body.into(), team_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub(in crate::api) async fn list<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path((event_id, team_id)): Path<(EventId, TeamId)>,
) -> Result<Json<TeamMembersResponse>, ApiError> {
    let ctx = state.context(identity);
    let team_members = state.members().list(&ctx, team_id, event_id).await?;
    Ok(Json(TeamMembersResponse { team_members }))
}

pub(in crate::api) async fn update<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path((event_id, team_id, team_member_id)): Path<(EventId, TeamId, TeamMemberId)>,
    Json(body): Json<RespondBody>,
) -> Result<Json<TeamMemberResponse>, ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    let team_member = state
        .members()
        .update(&ctx, body.into(), team_member_id, team_id, event_id)
        .await?;
    Ok(Json(TeamMemberResponse { team_member }))
}

pub(in crate::api) async fn find_by_id<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(team_member_id): Path<TeamMemberId>,
) -> Result<Json<TeamMemberInfo>, ApiError> {
    let ctx = state.context(identity);
    Ok(Json(state.members().find_by_id(&ctx, team_member_id).await?))
}

pub(in crate::api) async fn delete_by_id<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(team_member_id): Path<TeamMemberId>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.context(identity);
    state.members().delete_by_id(&ctx, team_member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(in crate::api) async fn list_inviters<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(event_id): Path<EventId>,
) -> Result<Json<InvitersResponse>, ApiError> {
    let ctx = state.context(identity);
    let inviters_info = state.members().find_list_of_inviters(&ctx, event_id).await?;
    Ok(Json(InvitersResponse { inviters_info }))
}
