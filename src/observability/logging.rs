//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level at runtime, once the config is loaded
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` always wins over the configured level

use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
    util::TryInitError, EnvFilter, Registry,
};

use crate::config::ObservabilityConfig;

/// Filter used until the config has been read.
const DEFAULT_DIRECTIVE: &str = "app_bootstrap=info,tower_http=info,sqlx=warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("cannot reload log filter: {0}")]
    Reload(#[from] reload::Error),

    #[error("cannot install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Handle for adjusting the log filter after startup.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Apply the configured log level unless `RUST_LOG` was set.
    pub fn apply(&self, config: &ObservabilityConfig) -> Result<(), LoggingError> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(directive(&config.log_level))?;
        self.filter.reload(filter)?;
        tracing::debug!(log_level = %config.log_level, "Log level applied");
        Ok(())
    }
}

/// Install the global subscriber.
pub fn init_logging(format: LogFormat) -> Result<LogHandle, LoggingError> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::try_new(DEFAULT_DIRECTIVE)?, false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init()?;

    Ok(LogHandle {
        filter: handle,
        from_env,
    })
}

/// Expand a bare level into a directive for this crate and its HTTP stack.
fn directive(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("app_bootstrap={0},tower_http={0},sqlx=warn", level)
    }
}
