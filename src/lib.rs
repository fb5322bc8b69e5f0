//! Minimal credential gate: user registration and login against PostgreSQL,
//! with salted password hashing and JWT issuance.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use handlers::http;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router (auth, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/api/auth", auth_routes)
        .with_state(state)
}

/// CORS: any origin unless `origins` is non-empty.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    let allow_origin = if parsed.is_empty() {
        if !origins.is_empty() {
            tracing::warn!("CORS_ORIGINS contains no valid origins, allowing any");
        }
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

/// `create_app` plus the CORS and request-tracing layers used in production.
pub fn create_service(state: AppState, config: &Config) -> axum::Router {
    create_app(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}
