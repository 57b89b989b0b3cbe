//! Logging infrastructure for the promptd CLI.
//!
//! Initializes the tracing subscriber used by every component. Logs go to
//! stderr so stdout stays clean for rendered prompt output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Initialize structured logging from the resolved application config.
///
/// Filtering follows `config.log_level` when set, otherwise `RUST_LOG`,
/// otherwise `info`. ANSI colors are suppressed when `config.no_color` is set
/// (the `NO_COLOR` environment variable feeds into that flag during config
/// loading).
///
/// # Example
/// ```no_run
/// use promptd_core::{config::AppConfig, logging};
///
/// let config = AppConfig::default();
/// logging::init(&config).expect("Failed to initialize logging");
/// ```
pub fn init(config: &AppConfig) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = config.log_level.as_deref().unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!config.no_color);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}
