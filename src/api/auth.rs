//! Bearer token issuing, verification, and the authentication middleware.

use super::{ApiError, AppState, Backend};
use crate::context::RequestIdentity;
use crate::team::{domain::UserId, ports::TeamStore, services::TeamServiceError};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user identifier.
    pub sub: Uuid,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
}

/// Signs a token for `user_id` valid for `ttl`.
///
/// # Errors
///
/// Returns [`ApiError::Token`] when signing fails.
pub fn issue_token(
    user_id: UserId,
    secret: &str,
    ttl: chrono::Duration,
    clock: &impl Clock,
) -> Result<String, ApiError> {
    let now = clock.utc();
    let claims = Claims {
        sub: user_id.into_inner(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verifies a token's signature and expiry.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] for any invalid token.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        ApiError::Unauthenticated("invalid bearer token")
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the caller from the bearer token and attaches a
/// [`RequestIdentity`] extension.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] when the token is missing or
/// invalid or the user no longer exists.
pub async fn authenticate<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        warn!(path = %request.uri().path(), "request without bearer token");
        return Err(ApiError::Unauthenticated("missing bearer token"));
    };
    let claims = verify_token(token, state.jwt_secret())?;

    let user_id = UserId::from_uuid(claims.sub);
    let user = state
        .users()
        .find_user_by_id(user_id)
        .await
        .map_err(TeamServiceError::from)?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token names an unknown user");
            ApiError::Unauthenticated("unknown user")
        })?;

    request.extensions_mut().insert(RequestIdentity::new(user));
    Ok(next.run(request).await)
}
