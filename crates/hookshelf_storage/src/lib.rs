//! Persistence adapters for Hookshelf.
//!
//! This crate provides implementations of [`hookshelf_core::WebhookStore`]:
//! - [`InMemoryWebhookStore`] keeps records for the lifetime of the process
//! - [`JsonFileWebhookStore`] keeps them in a single JSON document on disk
//!
//! [`open_store`] picks one based on a [`StorageConfig`].

pub mod config;
pub mod json_file;
pub mod memory;

pub use config::{open_store, StorageBackend, StorageConfig, DEFAULT_STORAGE_PATH};
pub use json_file::JsonFileWebhookStore;
pub use memory::InMemoryWebhookStore;
