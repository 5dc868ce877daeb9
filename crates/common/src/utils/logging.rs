use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

/// Value of the `service` field on lifecycle events and request spans.
pub const SERVICE_NAME: &str = "auth-service";

/// Output shape of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// JSON lines in production, human-readable output everywhere else.
    pub fn for_production(production: bool) -> Self {
        if production { LogFormat::Json } else { LogFormat::Compact }
    }
}

/// Initialize the global subscriber with the given format.
/// - Respects `RUST_LOG` if set
/// - Writes to stdout
/// - A second call is a no-op, so tests may call it freely
pub fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
}

/// Initialize tracing subscriber with compact, human-readable output.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output, one object per
/// line, for log shippers.
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_current_span(true)
        .with_writer(io::stdout)
        .try_init();
}
