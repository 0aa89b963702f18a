//! Structured logging setup
//!
//! Logs are written to stderr so that reports on stdout stay machine readable.
//! The level comes from `DOTNET_DEPLOY_LOG_LEVEL` or the command line, and
//! `RUST_LOG` directives are layered on top when set.
//!
//! ```no_run
//! use dotnet_deploy::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(build_dir = "/tmp/app", "Resolving frameworks");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "DOTNET_DEPLOY_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "DOTNET_DEPLOY_LOG_JSON";

pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,

    /// Emit one JSON object per event instead of human readable lines
    pub use_json: bool,

    /// Include the module path of the event
    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON lines with targets and source locations, for staging logs
    pub fn structured(level: Level) -> Self {
        Self {
            level,
            use_json: true,
            include_target: true,
            include_location: true,
        }
    }
}

/// Parse a level name, case-insensitively
pub fn try_parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Like [`try_parse_level`] but falls back to INFO with a warning on stderr
pub fn parse_level(level_str: &str) -> Level {
    try_parse_level(level_str).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}', defaulting to info. Valid levels: {}",
            level_str,
            VALID_LEVELS.join(", ")
        );
        Level::INFO
    })
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    match format!("dotnet_deploy={}", level).parse() {
        Ok(directive) if env::var("RUST_LOG").is_err() => filter.add_directive(directive),
        _ => filter,
    }
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        if config.use_json {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init();
        } else {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
    });
}

/// Read `DOTNET_DEPLOY_LOG_LEVEL` and `DOTNET_DEPLOY_LOG_JSON`
pub fn config_from_env() -> LoggingConfig {
    let level = env::var(LOG_LEVEL_ENV)
        .map(|l| parse_level(&l))
        .unwrap_or(Level::INFO);

    let use_json = env::var(LOG_JSON_ENV)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    if use_json {
        LoggingConfig::structured(level)
    } else {
        LoggingConfig::with_level(level)
    }
}

pub fn init_from_env() {
    init_logging(config_from_env());
}
