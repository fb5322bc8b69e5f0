//! Application error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

/// Body returned for every 500; the real cause only goes to the log.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { .. } => {
                AppError::Conflict("Username or email already in use".to_string())
            }
            StoreError::Db(e) => AppError::Db(e),
            StoreError::Other(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::Auth(msg) => {
                msg.clone()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                INTERNAL_MESSAGE.to_string()
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_json(AppError::Validation("bad".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad");

        let (status, _) = body_json(AppError::Conflict("dup".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = body_json(AppError::Auth("no".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn internal_errors_hide_the_cause() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused to 10.0.0.5"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_MESSAGE);

        let (status, body) = body_json(AppError::Db(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_MESSAGE);
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: AppError = StoreError::UniqueViolation {
            constraint: Some("users_email_key".into()),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = StoreError::Db(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
