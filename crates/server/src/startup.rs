use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use mockable::DefaultClock;
use service::branch::{
    repo::{json_file::JsonFileBranchRepository, seaorm::SeaOrmBranchRepository},
    BranchRepository,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured repository backend and wire the branch service.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let repo: Arc<dyn BranchRepository> = match cfg.storage.backend {
        StorageBackend::File => {
            common::env::ensure_data_dir(&cfg.storage.path).await?;
            let repo = JsonFileBranchRepository::open(&cfg.storage.path).await?;
            info!(path = %cfg.storage.path, "using file document store");
            Arc::new(repo)
        }
        StorageBackend::Postgres => {
            cfg.database
                .validate()
                .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Migration(e.to_string()))?;
            info!("using postgres document table");
            Arc::new(SeaOrmBranchRepository { db })
        }
    };
    Ok(ServerState::new(repo, Arc::new(DefaultClock)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: build the app from `cfg` and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, backend = ?cfg.storage.backend, "starting branch holidays server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
