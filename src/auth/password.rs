//! Password hashing and verification (bcrypt with configurable cost, or Argon2id).

use std::fmt;
use std::str::FromStr;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};
use tracing::warn;

use crate::error::{AppError, AppResult};

pub const DEFAULT_HASH_COST: u32 = 10;
/// Costs below this are accepted but considered weak.
pub const MIN_RECOMMENDED_COST: u32 = 10;
/// Lowest cost bcrypt will run; smaller values are raised to it.
pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;
/// bcrypt only reads this many bytes of the password.
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

const ARGON2_PREFIX: &str = "$argon2";

/// Algorithm used when producing new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    Bcrypt,
    Argon2,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2" | "argon2id" => Ok(Self::Argon2),
            other => Err(format!("unknown password scheme: {other}")),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bcrypt => f.write_str("bcrypt"),
            Self::Argon2 => f.write_str("argon2"),
        }
    }
}

/// Salted one-way hasher. Verification follows the stored hash's format, so
/// switching `scheme` never locks out existing users.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    scheme: PasswordScheme,
    cost: u32,
}

impl PasswordHasher {
    pub fn new(scheme: PasswordScheme, cost: u32) -> Self {
        let cost = if cost < BCRYPT_MIN_COST {
            if scheme == PasswordScheme::Bcrypt {
                warn!(cost, raised_to = BCRYPT_MIN_COST, "bcrypt cost raised to its floor");
            }
            BCRYPT_MIN_COST
        } else {
            cost
        };
        if scheme == PasswordScheme::Bcrypt && cost < MIN_RECOMMENDED_COST {
            warn!(
                cost,
                recommended = MIN_RECOMMENDED_COST,
                "bcrypt cost is below the recommended minimum"
            );
        }
        Self { scheme, cost }
    }

    pub fn scheme(&self) -> PasswordScheme {
        self.scheme
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash on the blocking pool.
    pub async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))?
    }

    /// Verify on the blocking pool.
    pub async fn verify(&self, password: String, hash: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || Self::verify_blocking(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))?
    }

    pub fn hash_blocking(&self, password: &str) -> AppResult<String> {
        match self.scheme {
            PasswordScheme::Bcrypt => bcrypt::hash(password, self.cost)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("bcrypt hash: {}", e))),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("argon2 hash: {}", e)))?
                    .to_string();
                Ok(hash)
            }
        }
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify_blocking(password: &str, hash: &str) -> AppResult<bool> {
        if hash.starts_with(ARGON2_PREFIX) {
            let parsed = PasswordHash::new(hash)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
            if parsed.hash.is_none() {
                return Err(AppError::Internal(anyhow::anyhow!("parse hash: missing output")));
            }
            return match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AppError::Internal(anyhow::anyhow!("argon2 verify: {}", e))),
            };
        }
        // Anything past the 72nd byte would be ignored, so it can never be the
        // password that was stored.
        if password.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bcrypt verify: {}", e)))
    }
}
