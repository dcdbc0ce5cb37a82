//! Application composition root.
//!
//! [`App`] wires configuration, the selected store, the secret policy and
//! the [`WebhookService`] together, and adds the file handling the core
//! leaves to its host: reading import files and writing export files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use hookshelf_core::{DefaultValidator, ExportError, ExportFile, FileEmitter, StagedImport, WebhookService};
use hookshelf_storage::open_store;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

/// A configured Hookshelf instance.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use hookshelf::App;
///
/// # async fn example() -> Result<(), hookshelf::Error> {
/// let mut app = App::from_config_file(Path::new("hookshelf.toml"))?;
///
/// let staged = app.stage_import_file(Path::new("webhooks.csv")).await?;
/// println!("{} rows staged", staged.len());
///
/// let summary = app.service_mut().commit_import(None).await?;
/// println!("Added {}, skipped {} duplicates", summary.added_count, summary.duplicate_count);
///
/// let written = app.export_to_directory().await?;
/// println!("Exported to {}", written.display());
/// # Ok(())
/// # }
/// ```
pub struct App {
    config: AppConfig,
    service: WebhookService,
}

impl App {
    /// Build an application from an already loaded configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let store = open_store(&config.storage);
        let validator = Arc::new(DefaultValidator::new(config.secrets.secret_policy()));
        let service = WebhookService::new(store, validator)
            .with_export_file_name(config.export.file_name.clone());

        info!(
            backend = %config.storage.backend,
            secret_policy = ?config.secrets.policy,
            "Hookshelf initialised"
        );

        Self { config, service }
    }

    /// Load the configuration at `path`, apply environment overrides and
    /// build the application.
    ///
    /// # Errors
    ///
    /// Any error from [`AppConfig::load`] or [`AppConfig::apply_env_overrides`].
    pub fn from_config_file(path: &Path) -> Result<Self, Error> {
        let mut config = AppConfig::load(path)?;
        config.apply_env_overrides()?;
        Ok(Self::from_config(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn service(&self) -> &WebhookService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut WebhookService {
        &mut self.service
    }

    /// Read the file at `path` and stage its contents for import.
    ///
    /// # Errors
    ///
    /// - `Error::LoadFile` if the file cannot be read
    /// - `Error::Core` for staging failures (empty file, no valid rows,
    ///   commit in progress)
    pub async fn stage_import_file(&mut self, path: &Path) -> Result<StagedImport, Error> {
        debug!("Reading import file {:?}", path);
        let raw = tokio::fs::read(path).await.map_err(Error::LoadFile)?;

        let staged = self.service.stage_import_bytes(&raw)?;
        info!(
            path = %path.display(),
            candidates = staged.len(),
            rejected_rows = staged.rejected_row_count,
            "Import file staged"
        );
        Ok(staged)
    }

    /// Export every webhook into the configured directory.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// `Error::Core` when there is nothing to export, the store cannot be
    /// read or the file cannot be written.
    pub async fn export_to_directory(&self) -> Result<PathBuf, Error> {
        let emitter = DirectoryEmitter::new(self.config.export.directory.clone());
        let file = self.service.export_to(&emitter).await?;
        emitter
            .target_path(&file)
            .map_err(|e| Error::Core(e.into()))
    }
}

/// [`FileEmitter`] writing exports into a directory on disk.
///
/// Only the final component of the export's file name is used, so a
/// configured name can never place the file outside the directory.
#[derive(Debug, Clone)]
pub struct DirectoryEmitter {
    directory: PathBuf,
}

impl DirectoryEmitter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Where `file` will be written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Emit`] if the file name has no usable final
    /// component (empty, `.` or `..`).
    pub fn target_path(&self, file: &ExportFile) -> Result<PathBuf, ExportError> {
        let name = Path::new(&file.file_name)
            .file_name()
            .ok_or_else(|| ExportError::Emit {
                reason: format!("'{}' is not a valid file name", file.file_name),
            })?;
        Ok(self.directory.join(name))
    }
}

#[async_trait]
impl FileEmitter for DirectoryEmitter {
    async fn emit(&self, file: &ExportFile) -> Result<(), ExportError> {
        let target = self.target_path(file)?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| ExportError::Emit {
                reason: format!("failed to create {}: {}", self.directory.display(), e),
            })?;

        tokio::fs::write(&target, file.contents.as_bytes())
            .await
            .map_err(|e| ExportError::Emit {
                reason: format!("failed to write {}: {}", target.display(), e),
            })?;

        info!(path = %target.display(), bytes = file.contents.len(), "Export written");
        Ok(())
    }
}
