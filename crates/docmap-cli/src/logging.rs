//! Logging initialization for the CLI.
//!
//! Logging is owned by the CLI crate to keep library crates lightweight.
//! Uses tracing with structured JSON output for machine-readable logs.

use docmap_core::LogLevel;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// # Arguments
/// * `level` - level for docmap's own crates; other crates stay at WARN
/// * `json` - If true, output stable JSON lines to stderr
///
/// `RUST_LOG` replaces the computed filter entirely when set.
///
/// JSON output format (stable contract):
/// ```json
/// {"timestamp":"...","level":"WARN","fields":{"code":"not_dts_file","message":"..."},"target":"docmap_cli::commands"}
/// ```
///
/// # Panics
/// Panics if the subscriber cannot be initialized (e.g., called twice).
pub fn init(level: LogLevel, json: bool) {
    let level = level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,docmap_core={level},docmap_cli={level}"))
    });

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
