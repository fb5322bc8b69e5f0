//! Authentication: register, login, password hashing, JWT.

mod handlers;
mod jwt;
mod password;
mod service;

pub use handlers::{login, register, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use jwt::{Claims, TokenIssuer};
pub use password::{
    PasswordHasher, PasswordScheme, BCRYPT_MAX_COST, BCRYPT_MAX_PASSWORD_BYTES, BCRYPT_MIN_COST,
    DEFAULT_HASH_COST, MIN_RECOMMENDED_COST,
};
pub use service::{AuthService, Session, INVALID_CREDENTIALS};
