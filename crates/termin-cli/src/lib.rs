//! Command-line front end for the TerminFinder client toolkit.
//!
//! Runs voice commands against page fixtures, scores practice profiles and
//! plays a recorded question through the full voice turn.

pub mod commands;
pub mod config;
pub mod devices;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
