//! Mapping of service failures onto HTTP responses.

use crate::category::services::CategoryServiceError;
use crate::error::ErrorKind;
use crate::team::services::TeamServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by handlers and the authentication middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token is missing, malformed, expired, or names an unknown
    /// user.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// The request body failed field validation.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] validator::ValidationErrors),

    /// A token could not be signed.
    #[error("token could not be issued: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A team or membership operation failed.
    #[error(transparent)]
    Team(#[from] TeamServiceError),

    /// A category operation failed.
    #[error(transparent)]
    Category(#[from] CategoryServiceError),
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short classification message.
    pub error: String,
    /// Human-readable cause, omitted for internal failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Team(err) => status_for(err.kind()),
            Self::Category(err) => status_for(err.kind()),
        }
    }

    const fn message(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthorized",
            Self::InvalidBody(_) => "validation error",
            Self::Token(_) => "internal server error",
            Self::Team(err) => message_for(err.kind()),
            Self::Category(err) => message_for(err.kind()),
        }
    }
}

const fn message_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "validation error",
        ErrorKind::NotFound => "not found",
        ErrorKind::NotAuthorized => "forbidden",
        ErrorKind::Conflict => "conflict",
        ErrorKind::Store => "internal server error",
        ErrorKind::Cancelled => "service unavailable",
    }
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = (!status.is_server_error() || status == StatusCode::SERVICE_UNAVAILABLE)
            .then(|| self.to_string());
        let body = ErrorBody {
            error: self.message().to_owned(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use crate::team::domain::{TeamDomainError, TeamId};
    use crate::team::ports::TeamStoreError;
    use rstest::rstest;

    #[rstest]
    #[case(TeamServiceError::Validation(TeamDomainError::EmptyTeamName), StatusCode::BAD_REQUEST)]
    #[case(TeamServiceError::TeamNotFound(TeamId::new()), StatusCode::NOT_FOUND)]
    #[case(
        TeamServiceError::NoTeamMembers { team_id: TeamId::new(), event_id: crate::team::domain::EventId::new() },
        StatusCode::NOT_FOUND
    )]
    #[case(TeamServiceError::TeamComplete { team_id: TeamId::new(), limit: 4 }, StatusCode::CONFLICT)]
    #[case(TeamServiceError::Context(ContextError::DeadlineExceeded), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(
        TeamServiceError::Store(TeamStoreError::persistence(std::io::Error::other("down"))),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn team_errors_map_to_status(#[case] err: TeamServiceError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status(), expected);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn internal_failures_hide_details() {
        let err = ApiError::from(TeamServiceError::Store(TeamStoreError::persistence(
            std::io::Error::other("connection refused"),
        )));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body: ErrorBody = serde_json::from_slice(&bytes).expect("body should be JSON");
        assert_eq!(body.error, "internal server error");
        assert_eq!(body.details, None);
    }

    #[rstest]
    fn authorization_failures_are_forbidden() {
        let err = ApiError::from(TeamServiceError::NotTeamCreator {
            team_id: TeamId::new(),
            user_id: crate::team::domain::UserId::new(),
        });

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "forbidden");
    }
}
