//! Push, list and pull lifecycle tests.

use bytes::Bytes;
use std::sync::Arc;

use s3kup_core::storage::{MemoryBackend, StorageBackend};
use s3kup_core::{BackupWriter, Error, Fetcher, Lister, VersionToken};

use super::helpers::{options, writer, Call, RecordingBackend};

fn memory() -> Arc<dyn StorageBackend> {
    Arc::new(MemoryBackend::new())
}

// ============================================================================
// Round trip
// ============================================================================

#[tokio::test]
async fn latest_returns_exact_bytes_just_stored() {
    let storage = memory();
    let writer = writer(storage.clone(), 5);
    let fetcher = Fetcher::new(storage);

    let binary: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
    writer
        .store("image.bin", Bytes::from(binary.clone()))
        .await
        .unwrap();

    let (_, content) = fetcher.fetch_latest("image.bin").await.unwrap();
    assert_eq!(content.as_ref(), binary.as_slice());
}

#[tokio::test]
async fn empty_content_round_trips() {
    let storage = memory();
    writer(storage.clone(), 5)
        .store("empty", Bytes::new())
        .await
        .unwrap();

    let (version, content) = Fetcher::new(storage).fetch_latest("empty").await.unwrap();
    assert!(content.is_empty());
    assert_eq!(version.size, 0);
}

// ============================================================================
// Version monotonicity
// ============================================================================

#[tokio::test]
async fn sequential_stores_get_increasing_tokens() {
    let storage = memory();
    let writer = writer(storage, 10);

    let first = writer.store("db", Bytes::from("a")).await.unwrap();
    let second = writer.store("db", Bytes::from("b")).await.unwrap();

    assert!(second.version > first.version);
}

#[tokio::test]
async fn system_clock_tokens_increase_back_to_back() {
    let storage = memory();
    let writer = BackupWriter::new(storage.clone(), &options(10)).unwrap();

    let mut tokens = Vec::new();
    for i in 0..20 {
        let report = writer
            .store("db", Bytes::from(format!("{}", i)))
            .await
            .unwrap();
        tokens.push(report.version);
    }

    assert!(tokens.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(Lister::new(storage).list("db").await.unwrap().len(), 10);
}

// ============================================================================
// Retention
// ============================================================================

#[tokio::test]
async fn version_count_is_min_of_keep_and_total() {
    for keep in 1..=4usize {
        let storage = memory();
        let writer = writer(storage.clone(), keep);
        let lister = Lister::new(storage);

        for total in 1..=6usize {
            writer
                .store("db", Bytes::from(format!("payload {}", total)))
                .await
                .unwrap();
            let count = lister.list("db").await.unwrap().len();
            assert_eq!(count, keep.min(total), "keep={} total={}", keep, total);
        }
    }
}

#[tokio::test]
async fn pruning_removes_lowest_tokens_only() {
    let storage = memory();
    let writer = writer(storage.clone(), 2);

    let mut tokens = Vec::new();
    for i in 0..5 {
        let report = writer
            .store("db", Bytes::from(format!("{}", i)))
            .await
            .unwrap();
        tokens.push(report.version);
    }

    let remaining: Vec<VersionToken> = Lister::new(storage)
        .list("db")
        .await
        .unwrap()
        .iter()
        .map(|v| v.token)
        .collect();
    assert_eq!(remaining, tokens[3..].to_vec());
}

#[tokio::test]
async fn keep_count_three_scenario() {
    let storage = memory();
    let writer = writer(storage.clone(), 3);
    let lister = Lister::new(storage.clone());
    let fetcher = Fetcher::new(storage);

    let first = writer.store("file", Bytes::from("content")).await.unwrap();
    writer.store("file", Bytes::from("content 2")).await.unwrap();
    writer.store("file", Bytes::from("content 3")).await.unwrap();
    writer.store("file", Bytes::from("content 4")).await.unwrap();

    let versions = lister.list("file").await.unwrap();
    assert_eq!(versions.len(), 3);
    assert!(versions.iter().all(|v| v.token != first.version));

    let (_, latest) = fetcher.fetch_latest("file").await.unwrap();
    assert_eq!(latest, Bytes::from("content 4"));
}

#[tokio::test]
async fn retention_is_per_backup_name() {
    let storage = memory();
    let writer = writer(storage.clone(), 1);
    let lister = Lister::new(storage);

    writer.store("a", Bytes::from("a1")).await.unwrap();
    writer.store("ab", Bytes::from("ab1")).await.unwrap();
    writer.store("a", Bytes::from("a2")).await.unwrap();

    assert_eq!(lister.list("a").await.unwrap().len(), 1);
    assert_eq!(lister.list("ab").await.unwrap().len(), 1);
}

#[tokio::test]
async fn names_with_reserved_characters_keep_full_lifecycle() {
    for name in ["db[prod].sql", "backup~", "report#1", "50%.tar", "dir/{a}^b"] {
        let storage = memory();
        let writer = writer(storage.clone(), 1);
        let lister = Lister::new(storage.clone());
        let fetcher = Fetcher::new(storage);

        writer.store(name, Bytes::from("old")).await.unwrap();
        let second = writer.store(name, Bytes::from("new")).await.unwrap();

        assert_eq!(second.pruned.len(), 1, "nothing pruned for {}", name);
        let versions = lister.list(name).await.unwrap();
        assert_eq!(versions.len(), 1, "wrong listing for {}", name);
        assert_eq!(versions[0].token, second.version);
        assert_eq!(versions[0].backup_name, name);

        let (latest, content) = fetcher.fetch_latest(name).await.unwrap();
        assert_eq!(latest.token, second.version);
        assert_eq!(content, Bytes::from("new"));
        assert_eq!(
            fetcher.fetch_version(name, second.version).await.unwrap(),
            Bytes::from("new")
        );
    }
}

// ============================================================================
// Empty state
// ============================================================================

#[tokio::test]
async fn unknown_backup_lists_empty_and_has_no_latest() {
    let storage = memory();

    assert!(Lister::new(storage.clone())
        .list("nothing")
        .await
        .unwrap()
        .is_empty());

    let err = Fetcher::new(storage)
        .fetch_latest("nothing")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("nothing"));
}

// ============================================================================
// Exact version fetch
// ============================================================================

#[tokio::test]
async fn exact_version_fetch_ignores_other_versions() {
    let storage = memory();
    let writer = writer(storage.clone(), 10);
    let fetcher = Fetcher::new(storage);

    let mut reports = Vec::new();
    for i in 0..5 {
        reports.push(
            writer
                .store("db", Bytes::from(format!("payload {}", i)))
                .await
                .unwrap(),
        );
    }

    let content = fetcher.fetch_version("db", reports[2].version).await.unwrap();
    assert_eq!(content, Bytes::from("payload 2"));

    let missing = VersionToken::new(reports[4].version.value() + 1);
    match fetcher.fetch_version("db", missing).await {
        Err(Error::VersionNotFound { version, .. }) => assert_eq!(version, missing.to_string()),
        other => panic!("expected version not found, got {:?}", other),
    }
}

#[tokio::test]
async fn exact_version_fetch_does_not_list() {
    let storage = RecordingBackend::new();
    writer(storage.clone(), 5)
        .store("db", Bytes::from("x"))
        .await
        .unwrap();
    storage.clear_calls();

    let _ = Fetcher::new(storage.clone())
        .fetch_version("db", VersionToken::new(1))
        .await;

    assert_eq!(storage.calls(), vec![Call::Get("db/1".to_string())]);
}

// ============================================================================
// Call ordering
// ============================================================================

#[tokio::test]
async fn store_happens_before_list_before_deletes() {
    let storage = RecordingBackend::new();
    let writer = writer(storage.clone(), 1);

    let first = writer.store("db", Bytes::from("1")).await.unwrap();
    storage.clear_calls();
    let second = writer.store("db", Bytes::from("2")).await.unwrap();

    assert_eq!(
        storage.calls(),
        vec![
            Call::Put(second.key.clone()),
            Call::List("db".to_string()),
            Call::Delete(first.key.clone()),
        ]
    );
    assert_eq!(second.pruned.len(), 1);
    assert_eq!(second.pruned[0].path, first.key);
}
