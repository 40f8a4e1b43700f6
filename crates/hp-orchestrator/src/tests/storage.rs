use super::patch;
use crate::OrchestratorError;
use crate::storage::{InstanceLock, PatchStore, SessionMarker, load_patches};

use std::time::Duration;

#[test]
fn given_no_marker_when_checked_then_fresh_launch_and_marker_written() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");

    // When
    let check = SessionMarker::new(42, "0.1.0").check_and_update(&path).unwrap();

    // Then
    assert!(check.fresh_launch);
    assert!(check.updated_from.is_none());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\n42\n0.1.0\n");
}

#[test]
fn given_same_session_when_checked_then_continuation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");
    SessionMarker::new(42, "0.1.0").write(&path).unwrap();

    let check = SessionMarker::new(42, "0.1.0").check_and_update(&path).unwrap();

    assert!(!check.fresh_launch);
}

#[test]
fn given_new_session_with_new_version_when_checked_then_updated_from_reported() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");
    SessionMarker::new(1, "0.0.9").write(&path).unwrap();

    // When
    let check = SessionMarker::new(2, "0.1.0").check_and_update(&path).unwrap();

    // Then
    assert!(check.fresh_launch);
    assert_eq!(check.updated_from.as_deref(), Some("0.0.9"));
    assert_eq!(
        SessionMarker::read(&path).unwrap(),
        Some(SessionMarker::new(2, "0.1.0"))
    );
}

#[test]
fn given_malformed_marker_when_read_then_error_and_check_treats_as_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");
    std::fs::write(&path, "7\nabc\n").unwrap();

    assert!(matches!(
        SessionMarker::read(&path),
        Err(OrchestratorError::InvalidSessionMarker { .. })
    ));
    assert!(SessionMarker::new(3, "0.1.0").check_and_update(&path).unwrap().fresh_launch);
}

#[test]
fn given_missing_patch_file_when_loaded_then_empty() {
    let dir = tempfile::tempdir().unwrap();

    assert!(load_patches(&dir.path().join("patches.json")).unwrap().is_empty());
}

async fn wait_for(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn given_saves_when_flushed_then_last_batch_on_disk() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patches.json");
    let store = PatchStore::spawn(path.clone());

    // When
    store.save(vec![patch("A()", &[1])]);
    store.save(vec![patch("A()", &[2]), patch("B()", &[3])]);
    store.close().await;

    // Then
    let loaded = load_patches(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].new_implementation, vec![2]);
}

#[tokio::test]
async fn given_save_then_delete_when_settled_then_file_gone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patches.json");
    let store = PatchStore::spawn(path.clone());

    store.save(vec![patch("A()", &[1])]);
    wait_for(|| path.exists()).await;
    store.delete();
    store.close().await;

    assert!(!path.exists());
}

#[test]
fn given_lock_held_by_this_process_when_dropped_then_file_removed() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let lock = InstanceLock::acquire(dir.path(), "0.1.0").unwrap();
    let path = lock.path().to_path_buf();
    assert!(path.exists());

    // When
    drop(lock);

    // Then
    assert!(!path.exists());
}

#[test]
fn given_stale_lock_from_dead_pid_when_acquired_then_reclaimed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("orchestrator.lock"),
        r#"{"pid": 4294967, "version": "0.0.1", "acquired_at": "2020-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    let lock = InstanceLock::acquire(dir.path(), "0.1.0").unwrap();

    assert_eq!(lock.owner().pid, std::process::id());
    assert_eq!(lock.owner().version, "0.1.0");
}

#[test]
fn given_unreadable_lock_file_when_acquired_then_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("orchestrator.lock"), "not json").unwrap();

    let lock = InstanceLock::acquire(dir.path(), "0.1.0");

    assert!(lock.is_ok());
}

#[test]
fn given_lock_released_when_reacquired_then_succeeds() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let mut lock = InstanceLock::acquire(dir.path(), "0.1.0").unwrap();

    // When
    lock.release();

    // Then
    assert!(!lock.path().exists());
    assert!(InstanceLock::acquire(dir.path(), "0.1.0").is_ok());
}
