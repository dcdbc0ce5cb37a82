use super::*;
use crate::config::SecretPolicyKind;
use hookshelf_core::{HookshelfError, ImportError, ValidationError, WebhookFields};
use hookshelf_storage::StorageBackend;
use std::fs;
use tempfile::TempDir;

fn memory_config(export_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.export.directory = export_dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_import_file_then_export_to_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let import_path = temp_dir.path().join("incoming.csv");
    fs::write(
        &import_path,
        "\u{feff}name,url,secret\r\nCI,https://ci.test/hook,\"to,ken\"\r\nbroken\r\nChat,https://chat.test,\r\n",
    )
    .unwrap();

    let mut app = App::from_config(memory_config(&temp_dir.path().join("out")));

    let staged = app.stage_import_file(&import_path).await.unwrap();
    assert_eq!(staged.len(), 2);
    assert_eq!(staged.rejected_row_count, 1);

    let summary = app.service_mut().commit_import(None).await.unwrap();
    assert_eq!(summary.added_count, 2);

    let written = app.export_to_directory().await.unwrap();
    assert_eq!(written, temp_dir.path().join("out").join("webhooks.csv"));
    assert_eq!(
        fs::read_to_string(&written).unwrap(),
        "\"name\",\"url\",\"secret\"\n\"CI\",\"https://ci.test/hook\",\"to,ken\"\n\"Chat\",\"https://chat.test\",\"\""
    );
}

#[tokio::test]
async fn test_missing_import_file_is_load_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut app = App::from_config(memory_config(temp_dir.path()));

    let result = app
        .stage_import_file(&temp_dir.path().join("missing.csv"))
        .await;

    assert!(matches!(result, Err(Error::LoadFile(_))));
}

#[tokio::test]
async fn test_empty_import_file_is_core_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let import_path = temp_dir.path().join("empty.csv");
    fs::write(&import_path, "").unwrap();
    let mut app = App::from_config(memory_config(temp_dir.path()));

    let result = app.stage_import_file(&import_path).await;

    assert!(matches!(
        result,
        Err(Error::Core(HookshelfError::Import(ImportError::EmptyFile)))
    ));
}

#[tokio::test]
async fn test_export_with_no_webhooks_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("out");
    let app = App::from_config(memory_config(&out_dir));

    let result = app.export_to_directory().await;

    assert!(matches!(result, Err(Error::Core(HookshelfError::Export(_)))));
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_configured_secret_policy_is_enforced() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = memory_config(temp_dir.path());
    config.secrets.policy = SecretPolicyKind::Strong;
    let app = App::from_config(config);

    let err = app
        .service()
        .create(WebhookFields::new("CI", "https://ci.test", "weak"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        HookshelfError::Validation(ValidationError::UnacceptableSecret)
    );

    app.service()
        .create(WebhookFields::new("CI", "https://ci.test", "str0ng-secret"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_json_backend_persists_between_instances() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = AppConfig::default();
    config.storage.path = temp_dir.path().join("data").join("hooks.json");

    let first = App::from_config(config.clone());
    first
        .service()
        .create(WebhookFields::new("CI", "https://ci.test", ""))
        .await
        .unwrap();

    let second = App::from_config(config);
    let records = second.service().list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "CI");
}

#[tokio::test]
async fn test_configured_export_file_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = memory_config(temp_dir.path());
    config.export.file_name = "backup.csv".to_string();
    let app = App::from_config(config);
    app.service()
        .create(WebhookFields::new("CI", "https://ci.test", ""))
        .await
        .unwrap();

    let written = app.export_to_directory().await.unwrap();

    assert_eq!(written, temp_dir.path().join("backup.csv"));
    assert!(written.exists());
}

#[test]
fn test_directory_emitter_keeps_only_final_component() {
    let emitter = DirectoryEmitter::new("/exports");

    let file = ExportFile::named("../../etc/webhooks.csv", String::new());
    assert_eq!(
        emitter.target_path(&file).unwrap(),
        PathBuf::from("/exports/webhooks.csv")
    );

    let file = ExportFile::named("..", String::new());
    assert!(matches!(
        emitter.target_path(&file),
        Err(ExportError::Emit { .. })
    ));
}

#[test]
fn test_from_config_file_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let result = App::from_config_file(&temp_dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::Config(_))));
}
