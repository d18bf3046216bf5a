use crate::services::{AuthServiceError, JobServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Authentication required")]
    MissingIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    /// `message` is what the client sees; `source` is only logged.
    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            message,
            source: source.into(),
        }
    }
}

/// Attaches the route's client-facing failure message to service errors.
pub trait Context<T> {
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T> Context<T> for std::result::Result<T, JobServiceError> {
    fn context(self, message: &'static str) -> Result<T> {
        self.map_err(|e| AppError::internal(message, e))
    }
}

impl<T> Context<T> for std::result::Result<T, AuthServiceError> {
    fn context(self, message: &'static str) -> Result<T> {
        self.map_err(|e| match e {
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::Forbidden => AppError::Forbidden,
            AuthServiceError::Repository(e) => AppError::internal(message, e),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, *msg),
            AppError::MissingIdentity => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            AppError::Internal { message, source } => {
                tracing::error!("{}: {:#}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, *message)
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::RepositoryError;

    #[test]
    fn statuses() {
        let cases = [
            (AppError::Validation("jobId and jobData are required"), StatusCode::BAD_REQUEST),
            (AppError::MissingIdentity, StatusCode::UNAUTHORIZED),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (
                AppError::internal("Failed to load jobs data", anyhow::anyhow!("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn auth_errors_keep_their_meaning() {
        let denied = Err::<(), _>(AuthServiceError::Forbidden).context("unused");
        assert!(matches!(denied, Err(AppError::Forbidden)));

        let failed = Err::<(), _>(AuthServiceError::Repository(RepositoryError::Database(
            sqlx::Error::PoolClosed,
        )))
        .context("Failed to load analytics");
        assert!(matches!(
            failed,
            Err(AppError::Internal {
                message: "Failed to load analytics",
                ..
            })
        ));
    }
}
