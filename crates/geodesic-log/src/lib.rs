//! Structured logging for the geodesic crates.
//!
//! Console output with uptime and module targets, plus a JSON log file in
//! debug builds. The level comes from `RUST_LOG` if set, otherwise from
//! `config.debug.log_level`. Records emitted through the `log` facade (the
//! config crate) are forwarded into the same subscriber.

use std::path::{Path, PathBuf};

use geodesic_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "geodesic.log";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter directives for `config`, falling back to the default when the
/// configured level is empty.
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

/// Install the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether to write the JSON log file
/// * `config` - source of the default log level
///
/// Returns the path of the JSON log file if one was opened. Calling this
/// more than once leaves the first subscriber in place.
///
/// ```no_run
/// use geodesic_config::Config;
/// use geodesic_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// tracing::info!("ready");
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber
            .with(file_layer)
            .try_init()
            .ok()
            .map(|()| log_dir.join(LOG_FILE_NAME));
    }

    let _ = subscriber.try_init();
    None
}

/// Create an `EnvFilter` with the default directives.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES)
}
