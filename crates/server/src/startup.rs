use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::auth::{password::Argon2Hasher, repo::seaorm::SeaOrmAuthRepository, repository::AuthRepository};

/// Resolve the listener address from server config
fn load_bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Connect the database, apply migrations when enabled, and assemble state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        models::db::migrate(&db).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }
    let repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db });
    let hasher = Argon2Hasher::from_config(&cfg.auth)?;
    Ok(AppState::new(repo, hasher, cfg.environment))
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(event = "signal_error", error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, environment = %cfg.environment, "starting auth service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let server = ServerConfig { host: "0.0.0.0".into(), port: 5501, worker_threads: None };
        assert_eq!(load_bind_addr(&server).unwrap().to_string(), "0.0.0.0:5501");
    }

    #[test]
    fn bad_host_is_an_error() {
        let server = ServerConfig { host: "not a host".into(), port: 5501, worker_threads: None };
        assert!(load_bind_addr(&server).is_err());
    }

    #[tokio::test]
    async fn builds_app_against_sqlite() -> anyhow::Result<()> {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        cfg.database.max_connections = 1;
        cfg.database.min_connections = 1;
        cfg.auth = configs::AuthConfig { hash_memory_kib: 1024, hash_iterations: 1, hash_parallelism: 1 };
        let _app = build_app(&cfg).await?;
        Ok(())
    }
}
