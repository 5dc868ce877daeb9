use std::process::ExitCode;

use common::utils::logging::{init_logging, init_logging_default, LogFormat, SERVICE_NAME};
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env first so RUST_LOG, APP_ENV and DATABASE_URL are visible
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging_default();
            error!(service = SERVICE_NAME, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    init_logging(LogFormat::for_production(cfg.environment.is_production()));
    info!(service = SERVICE_NAME, event = "logger_init", environment = %cfg.environment, "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = SERVICE_NAME,
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE_NAME, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE_NAME,
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "auth service starting"
    );

    // server::run drains in-flight requests on Ctrl+C before returning
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = SERVICE_NAME, event = "stop", %service_id, pid, "auth service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = SERVICE_NAME, event = "run_failed", error = %e, "auth service exited with error");
            ExitCode::FAILURE
        }
    }
}
