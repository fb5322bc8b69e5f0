//! Auth HTTP handlers: register, login.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::BCRYPT_MAX_PASSWORD_BYTES;
use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub id: i64,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(body) = payload.map_err(invalid_body)?;
    body.validate()
        .map_err(|e| missing_fields(&e, &["username", "email", "password"]))?;
    let (Some(username), Some(email), Some(password)) = (body.username, body.email, body.password)
    else {
        return Err(AppError::Validation(
            "Missing required fields: username, email, password".to_string(),
        ));
    };
    check_password_length(&password)?;

    let user = state.auth().register(&username, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(body) = payload.map_err(invalid_body)?;
    body.validate()
        .map_err(|e| missing_fields(&e, &["email", "password"]))?;
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::Validation(
            "Missing required fields: email, password".to_string(),
        ));
    };

    let session = state.auth().login(&email, &password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: session.token,
        id: session.user_id,
    }))
}

/// Bytes, not chars: bcrypt ignores everything past its input limit.
fn check_password_length(password: &str) -> AppResult<()> {
    if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
        return Err(AppError::Validation(format!(
            "Password must be at most {} bytes",
            BCRYPT_MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Names the failing fields in declaration order.
fn missing_fields(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let failed = errors.field_errors();
    let names: Vec<&str> = order
        .iter()
        .copied()
        .filter(|name| failed.contains_key(*name))
        .collect();
    AppError::Validation(format!("Missing required fields: {}", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_fields_fail_validation() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username":"","email":"a@b.co"}"#).unwrap();
        let err = req.validate().unwrap_err();
        match missing_fields(&err, &["username", "email", "password"]) {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Missing required fields: username, password")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn password_length_is_counted_in_bytes() {
        assert!(check_password_length(&"a".repeat(72)).is_ok());
        assert!(check_password_length(&"a".repeat(73)).is_err());
        // 36 two-byte chars fit; 37 do not.
        assert!(check_password_length(&"é".repeat(36)).is_ok());
        assert!(matches!(
            check_password_length(&"é".repeat(37)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn null_counts_as_missing() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":null,"password":"pw"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn complete_request_validates() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"pw"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
