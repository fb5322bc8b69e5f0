//! Entry point: load config, open the store, and run the server.

use std::sync::Arc;

use credgate::config::Config;
use credgate::db::{self, PgUserStore};
use credgate::{create_service, AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_jwt_secret() {
        warn!("JWT_SECRET not set, using the built-in development secret");
    }

    let db_pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::check_connection(&db_pool).await?;
    info!("database connection established");
    if config.run_migrations {
        db::run_migrations(&db_pool).await?;
        info!("migrations applied");
    }

    let store = Arc::new(PgUserStore::new(db_pool.clone()));
    let state = AppState::from_config(&config, store);
    let app = create_service(state, &config);

    info!(
        addr = %config.server_addr,
        scheme = %config.password_scheme,
        cost = config.hash_cost,
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
