//! Logger initialisation.
//!
//! Library crates only talk to the `log` facade. Binaries call
//! [`init_logging`] once, early in `main`, to install `env_logger`.

use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "`tessel_core=debug`").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit filter; falls back to `RUST_LOG`, then to `default_level`.
    pub env_filter: Option<String>,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    /// Whether to colorize output.
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Config whose default level is raised by `verbosity` steps above `Info`.
    #[must_use]
    pub fn with_verbosity(verbosity: u8) -> Self {
        let default_level = match verbosity {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        Self {
            default_level,
            ..Self::default()
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            let _ = builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            let _ = builder.parse_filters(&filter);
        } else {
            let _ = builder.filter_level(config.default_level);
        }

        let _ = builder.write_style(config.write_style);

        // A second logger may already be installed by an embedding binary.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
