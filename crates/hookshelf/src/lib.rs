//! # Hookshelf
//!
//! Composition root for managing a personal list of outgoing webhooks.
//!
//! This crate assembles the pieces from `hookshelf_core` and
//! `hookshelf_storage` into a ready-to-use [`App`]:
//! - [`config::AppConfig`] loads TOML configuration with environment overrides
//! - [`telemetry::init_tracing`] installs the tracing subscriber
//! - [`App`] opens the configured store, applies the secret policy, reads
//!   import files and writes exports through [`DirectoryEmitter`]
//!
//! ## Examples
//!
//! ```rust,no_run
//! use hookshelf::{config::AppConfig, telemetry, App};
//! use hookshelf_core::WebhookFields;
//!
//! # async fn example() -> Result<(), hookshelf::Error> {
//! let mut config = AppConfig::default();
//! config.apply_env_overrides()?;
//! telemetry::init_tracing(&config.logging)?;
//!
//! let app = App::from_config(config);
//! app.service()
//!     .create(WebhookFields::new("CI", "https://ci.example.com/hook", ""))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod errors;
pub mod telemetry;

pub use app::{App, DirectoryEmitter};
pub use errors::Error;
