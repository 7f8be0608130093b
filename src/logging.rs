//! Structured logging setup.

use anyhow::Context;
use tracing::Span;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logging settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Recorded as the `app` field on every event.
    pub app_name: String,
    pub debug: bool,
}

impl LoggingConfig {
    pub fn new(app_name: impl Into<String>, debug: bool) -> Self {
        Self {
            app_name: app_name.into(),
            debug,
        }
    }

    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "error"
        }
    }

    /// `RUST_LOG` when set and valid, otherwise the level implied by `--debug`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global JSON subscriber writing to stdout.
///
/// Returns the root span; instrument the top-level future with it so every
/// event carries the `app` field. Source file and line are included in
/// debug mode.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Span> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stdout)
        .with_current_span(true)
        .with_file(config.debug)
        .with_line_number(config.debug);

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(tracing::error_span!("faker", app = %config.app_name))
}
