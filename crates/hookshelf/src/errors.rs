use std::io;

use hookshelf_core::HookshelfError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while assembling or driving the application.
///
/// Domain failures from the core crate are wrapped in [`Error::Core`]; the
/// other variants cover configuration, file access and logging setup.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or validating configuration.
    ///
    /// Returned for a missing configuration file or an invalid value, such as
    /// an unknown storage backend in an environment override.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to load a file from the filesystem.
    ///
    /// Wraps the I/O error raised while reading an import file.
    #[error("Failed to load file.")]
    LoadFile(io::Error),

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse TOML configuration file.")]
    ParseConfig(toml::de::Error),

    /// The tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// A file could not be written.
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error(transparent)]
    Core(#[from] HookshelfError),
}
