use super::*;
use std::sync::Arc;

#[tokio::test]
async fn test_insert_assigns_id_and_timestamps() {
    let store = InMemoryWebhookStore::new();

    let record = store
        .insert(WebhookFields::new("CI", "https://ci.test", "s"))
        .await
        .unwrap();

    assert!(!record.id.as_str().is_empty());
    assert_eq!(record.created_at, record.updated_at);
    assert_eq!(store.list().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let store = InMemoryWebhookStore::new();
    for name in ["c", "a", "b"] {
        store
            .insert(WebhookFields::new(name, "https://x.test", ""))
            .await
            .unwrap();
    }

    let names: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_update_keeps_identity() {
    let store = InMemoryWebhookStore::new();
    let original = store
        .insert(WebhookFields::new("CI", "https://ci.test", ""))
        .await
        .unwrap();

    let patch = WebhookPatch {
        url: Some("https://ci.test/v2".to_string()),
        ..Default::default()
    };
    let updated = store.update(&original.id, patch).await.unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.name, "CI");
    assert_eq!(updated.url, "https://ci.test/v2");
    assert!(updated.updated_at >= original.updated_at);
}

#[tokio::test]
async fn test_update_and_remove_missing_record() {
    let store = InMemoryWebhookStore::new();
    let id = WebhookId::from_string("nope");

    assert_eq!(
        store.update(&id, WebhookPatch::default()).await,
        Err(StorageError::NotFound {
            id: "nope".to_string()
        })
    );
    assert_eq!(
        store.remove(&id).await,
        Err(StorageError::NotFound {
            id: "nope".to_string()
        })
    );
}

#[tokio::test]
async fn test_remove_deletes_only_target() {
    let keep = WebhookRecord::create(WebhookFields::new("keep", "https://k.test", ""), Utc::now());
    let gone = WebhookRecord::create(WebhookFields::new("drop", "https://d.test", ""), Utc::now());
    let store = InMemoryWebhookStore::with_records(vec![keep.clone(), gone.clone()]);

    store.remove(&gone.id).await.unwrap();

    assert_eq!(store.list().await.unwrap(), vec![keep]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_are_all_kept() {
    let store = Arc::new(InMemoryWebhookStore::new());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .insert(WebhookFields::new(format!("hook-{i}"), "https://x.test", ""))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.list().await.unwrap().len(), 20);
}
