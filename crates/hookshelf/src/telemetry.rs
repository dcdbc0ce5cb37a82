//! Tracing subscriber setup.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig, ENV_LOG};
use crate::errors::Error;

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;

/// Install the global tracing subscriber.
///
/// Filter directives come from `HOOKSHELF_LOG` when it is set, otherwise from
/// `config.filter`.
///
/// # Errors
///
/// Returns `Error::Telemetry` if the directives are invalid or a global
/// subscriber has already been installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Error> {
    let filter = build_filter(config)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    result.map_err(|e| Error::Telemetry(format!("Failed to install tracing subscriber: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, Error> {
    let directives = env::var(ENV_LOG)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.filter.clone());

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Telemetry(format!("Invalid log filter '{}': {}", directives, e)))
}
