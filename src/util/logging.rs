//! Structured logging setup for influxdb-builder
//!
//! Logging uses the `tracing` ecosystem with output on stderr, so the build
//! summary printed on stdout stays clean.
//!
//! # Features
//!
//! - Console output with pretty formatting (default)
//! - Optional JSON output (`INFLUXDB_BUILDER_LOG_JSON=true`)
//! - `RUST_LOG` takes precedence over the configured level
//! - Thread-safe, can only be initialized once
//!
//! # Example
//!
//! ```no_run
//! use influxdb_builder::util::{init_logging, LoggingConfig};
//! use tracing::Level;
//!
//! init_logging(LoggingConfig::with_level(Level::DEBUG));
//! tracing::info!("Application started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., influxdb_builder::build) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    /// INFO level, pretty console output, targets shown, no locations
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
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

    /// Applies `INFLUXDB_BUILDER_LOG_JSON`; debug and trace levels also show source locations
    pub fn from_env(level: Level) -> Self {
        let use_json = env::var("INFLUXDB_BUILDER_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            include_location: level >= Level::DEBUG,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Accepts the usual tracing names plus `warning` and `critical`, which map to
/// WARN and ERROR. Unknown names fall back to INFO with a notice on stderr.
///
/// # Example
///
/// ```
/// use influxdb_builder::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("CRITICAL"), Level::ERROR);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warning, error, critical",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the logging system; subsequent calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("influxdb_builder={}", config.level))
        };

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}
