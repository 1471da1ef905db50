//! # Scoped Authorization Server
//!
//! HTTP front for the scoped authorization guard.
//!
//! ## Endpoints
//!
//! - `POST /v1/evaluate` - Evaluate a principal against a scope
//! - `GET /v1/sections/:section_id/access` - Guarded section route
//! - `GET /v1/courses/:course_id/access` - Guarded course route
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Configuration
//!
//! Environment variables:
//! - `HOST` / `PORT` - bind address (default: 0.0.0.0:8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `DATABASE_URL` - PostgreSQL store; in-memory store when unset
//! - `AUTHZ_HIERARCHY_THRESHOLD`, `AUTHZ_SUPERUSER_ROLE`, `AUTHZ_OPERATOR_ROLE`

use anyhow::Context;
use axum::serve;
use scoped_authz::{
    http::{create_router, AppState},
    AssignmentStore, AuthorizationGuard, InMemoryAssignmentStore, ServerConfig,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

async fn build_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn AssignmentStore>> {
    match &config.database_url {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let store = scoped_authz::PostgresAssignmentStore::new(url)
                .await
                .context("connecting to assignment database")?;
            store.run_migrations().await.context("running migrations")?;
            info!("Using PostgreSQL assignment store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            anyhow::bail!("DATABASE_URL is set but the server was built without the postgres feature")
        }
        None => {
            warn!("DATABASE_URL not set, using an empty in-memory assignment store");
            Ok(Arc::new(InMemoryAssignmentStore::new()))
        }
    }
}

/// Main server entrypoint
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("loading configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scoped Authorization Server v{}", scoped_authz::VERSION);
    info!("Configuration:");
    info!("  Bind: {}", config.bind_address());
    info!("  Hierarchy threshold: {}", config.guard.hierarchy_threshold);
    info!("  Superuser role: {}", config.guard.superuser_role);
    info!("  Operator role: {}", config.guard.operator_role);

    let store = build_store(&config).await?;
    let guard = AuthorizationGuard::with_config(store, config.guard.clone())
        .context("invalid guard configuration")?;
    let app = create_router(AppState::new(guard));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding HTTP server to {}", addr))?;

    info!("Starting HTTP server on {}", addr);

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down gracefully");
    Ok(())
}
