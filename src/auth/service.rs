//! Credential flow: register (hash + insert) and login (lookup + verify + token).

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::db::{NewUser, UserRow, UserStore};
use crate::error::{AppError, AppResult};

/// Same message for unknown email and wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Inputs are expected to be validated (non-empty) by the caller.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<UserRow> {
        let password_hash = self.hasher.hash(password.to_string()).await?;
        let user = self
            .store
            .insert_user(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let Some(user) = self.store.find_by_email(email).await? else {
            debug!("login rejected");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .hasher
            .verify(password.to_string(), user.password_hash.clone())
            .await?
        {
            debug!("login rejected");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");
        Ok(Session {
            user_id: user.id,
            token,
        })
    }
}
