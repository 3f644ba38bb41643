//! Failure handling across store, list and delete.

use bytes::Bytes;

use s3kup_core::storage::StorageBackend;
use s3kup_core::{Error, Fetcher, StorageError};

use super::helpers::{writer, writer_starting_at, Call, RecordingBackend};

#[tokio::test]
async fn failed_store_never_prunes() {
    let storage = RecordingBackend::new();
    let writer = writer(storage.clone(), 1);
    writer.store("db", Bytes::from("1")).await.unwrap();
    writer.store("db", Bytes::from("2")).await.unwrap();

    storage.fail_puts();
    storage.clear_calls();
    let err = writer.store("db", Bytes::from("3")).await.unwrap_err();

    assert!(matches!(err, Error::Storage(StorageError::Backend(_))));
    assert!(matches!(storage.calls().as_slice(), [Call::Put(_)]));
    assert_eq!(storage.keys("db").await.len(), 1);
}

#[tokio::test]
async fn failed_listing_keeps_new_version() {
    let storage = RecordingBackend::new();
    let writer = writer(storage.clone(), 1);
    let first = writer.store("db", Bytes::from("1")).await.unwrap();

    storage.fail_lists();
    let err = writer.store("db", Bytes::from("2")).await.unwrap_err();

    assert!(matches!(err, Error::Listing { .. }));
    let keys = storage.keys("db").await;
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&first.key));
}

#[tokio::test]
async fn failed_delete_stops_pruning_and_keeps_new_version() {
    let storage = RecordingBackend::new();
    let writer = writer(storage.clone(), 5);

    let mut keys = Vec::new();
    for i in 0..5 {
        keys.push(
            writer
                .store("db", Bytes::from(format!("{}", i)))
                .await
                .unwrap()
                .key,
        );
    }

    // A push with keep=2 wants to delete keys[0..4]; the second delete fails.
    let pruning_writer = writer_starting_at(storage.clone(), 2, 1_800_000_000_000_000_000);
    storage.fail_delete_of(&keys[1]);
    storage.clear_calls();

    let err = pruning_writer
        .store("db", Bytes::from("new"))
        .await
        .unwrap_err();

    match err {
        Error::Deletion { key, deleted, .. } => {
            assert_eq!(key, keys[1]);
            assert_eq!(deleted, 1);
        }
        other => panic!("expected deletion error, got {:?}", other),
    }

    let deletes: Vec<_> = storage
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete(_)))
        .collect();
    assert_eq!(
        deletes,
        vec![Call::Delete(keys[0].clone()), Call::Delete(keys[1].clone())]
    );

    let remaining = storage.keys("db").await;
    assert_eq!(remaining.len(), 5);
    assert!(!remaining.contains(&keys[0]));

    let (_, latest) = Fetcher::new(storage).fetch_latest("db").await.unwrap();
    assert_eq!(latest, Bytes::from("new"));
}

#[tokio::test]
async fn malformed_key_blocks_pruning() {
    let storage = RecordingBackend::new();
    let writer = writer(storage.clone(), 1);
    writer.store("db", Bytes::from("1")).await.unwrap();

    storage
        .put("db/not-a-version", Bytes::from("stray"))
        .await
        .unwrap();

    let err = writer.store("db", Bytes::from("2")).await.unwrap_err();
    match err {
        Error::MalformedKey { key } => assert_eq!(key, "db/not-a-version"),
        other => panic!("expected malformed key, got {:?}", other),
    }
    assert_eq!(storage.keys("db").await.len(), 3);
}
