//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors go through
//! `kernel::error::AppError`.

mod dto;
mod handlers;
mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, AuthState, SessionStore};
use board::{
    BoardRepository, JsonDatabase, PgBoardRepository, StorageBackend, StorageConfig,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,board=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage_config = StorageConfig::from_env()?;
    let auth_config = AuthConfig::from_env();

    // Backend selection happens once, here; everything downstream only
    // sees the BoardRepository trait.
    match storage_config.backend {
        StorageBackend::Json => {
            let db = JsonDatabase::connect(
                &storage_config.data_dir,
                &storage_config.snapshot_file,
                storage_config.save_interval,
            )
            .await?;
            tracing::info!(
                path = %db.snapshot_path().display(),
                interval_secs = storage_config.save_interval.as_secs(),
                "connected to json storage"
            );
            serve(db, auth_config).await
        }
        StorageBackend::Postgres => {
            let url = storage_config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres backend"))?;
            let db = PgBoardRepository::connect(url).await?;
            tracing::info!("connected to postgres storage");
            serve(db, auth_config).await
        }
    }
}

async fn serve<R>(repo: R, auth_config: AuthConfig) -> anyhow::Result<()>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let state = AuthState {
        repo: Arc::new(repo),
        sessions: SessionStore::new(),
        config: Arc::new(auth_config),
    };
    let app = router::app_router(state.clone());

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Releases the backend; the file store writes its final snapshot here.
    tracing::info!("disconnecting storage");
    state.repo.disconnect().await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
