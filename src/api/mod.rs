//! HTTP surface: routes, bearer authentication, and error mapping.
//!
//! Every route except `GET /ping` sits behind [`auth::authenticate`], which
//! resolves the caller once and hands handlers a [`RequestIdentity`]
//! extension. Handlers wrap it in a [`RequestContext`] carrying the
//! configured request deadline before calling into the services.
//!
//! [`RequestIdentity`]: crate::context::RequestIdentity
//! [`RequestContext`]: crate::context::RequestContext

pub mod auth;
mod dto;
mod error;
mod handlers;
mod state;

pub use dto::{
    CategoryBody, InviteBody, InvitersResponse, RespondBody, TeamBody, TeamMemberResponse,
    TeamMembersResponse,
};
pub use error::{ApiError, ErrorBody};
pub use state::{AppState, Backend, InMemoryBackend, PostgresBackend};

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use handlers::{categories, members, teams};
use std::sync::Arc;

/// Builds the application router over `state`.
pub fn router<B: Backend>(state: Arc<AppState<B>>) -> Router {
    let protected = Router::new()
        .route(
            "/events/{event_id}/teams",
            post(teams::create::<B>).get(teams::list::<B>),
        )
        .route(
            "/events/{event_id}/teams/{team_id}",
            get(teams::find_by_id::<B>).put(teams::update::<B>),
        )
        .route(
            "/events/{event_id}/teams/{team_id}/members",
            post(members::create::<B>).get(members::list::<B>),
        )
        .route(
            "/events/{event_id}/teams/{team_id}/members/{team_member_id}",
            put(members::update::<B>),
        )
        .route(
            "/team_members/{team_member_id}",
            get(members::find_by_id::<B>).delete(members::delete_by_id::<B>),
        )
        .route(
            "/events/{event_id}/inviters",
            get(members::list_inviters::<B>),
        )
        .route(
            "/categories",
            post(categories::create::<B>).get(categories::list::<B>),
        )
        .route(
            "/categories/{category_id}",
            get(categories::find_by_id::<B>)
                .put(categories::update::<B>)
                .delete(categories::delete_by_id::<B>),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::authenticate::<B>,
        ));

    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .merge(protected)
        .with_state(state)
}
