//! HTTP state and health probe.

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::{AuthService, PasswordHasher, TokenIssuer};
use crate::config::Config;
use crate::db::UserStore;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            auth: AuthService::new(store, hasher, tokens),
        }
    }

    /// Wire hasher and token issuer from `config` around an already-open store.
    pub fn from_config(config: &Config, store: Arc<dyn UserStore>) -> Self {
        let hasher = PasswordHasher::new(config.password_scheme, config.hash_cost);
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
        Self::new(store, hasher, tokens)
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "credgate" })),
    )
}
