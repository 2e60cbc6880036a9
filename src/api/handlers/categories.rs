//! Category routes.

use crate::api::{ApiError, AppState, Backend, CategoryBody};
use crate::category::domain::{Category, CategoryId};
use crate::context::RequestIdentity;
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
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    let category = state.categories().create(&ctx, body.into()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub(in crate::api) async fn list<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let ctx = state.context(identity);
    Ok(Json(state.categories().list(&ctx).await?))
}

pub(in crate::api) async fn find_by_id<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, ApiError> {
    let ctx = state.context(identity);
    Ok(Json(state.categories().find_by_id(&ctx, category_id).await?))
}

pub(in crate::api) async fn update<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(category_id): Path<CategoryId>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<Category>, ApiError> {
    body.validate()?;
    let ctx = state.context(identity);
    Ok(Json(
        state
            .categories()
            .update(&ctx, category_id, body.into())
            .await?,
    ))
}

pub(in crate::api) async fn delete_by_id<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.context(identity);
    state.categories().delete_by_id(&ctx, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
