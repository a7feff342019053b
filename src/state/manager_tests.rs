//! Tests for StateManager

use super::*;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/marvel-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/marvel-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager =
        StateManager::from_json(r#"{"streams": {"comics": {"cursor": "2020-01-01T00:00:00Z"}}}"#)
            .unwrap();
    assert!(manager.is_in_memory());
    assert_eq!(
        manager.get_cursor("comics").await,
        Some("2020-01-01T00:00:00Z".to_string())
    );
    assert!(manager.get_cursor("stories").await.is_none());
}

#[tokio::test]
async fn test_from_json_empty_string() {
    let manager = StateManager::from_json("  ").unwrap();
    assert_eq!(manager.snapshot().await, State::new());
}

#[test]
fn test_from_json_invalid() {
    let err = StateManager::from_json("{not json").unwrap_err();
    assert!(matches!(err, crate::error::Error::State { .. }));
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_get_set_cursor() {
    let manager = StateManager::in_memory();

    assert!(manager.get_cursor("characters").await.is_none());

    manager
        .set_cursor("characters", "2024-01-01T00:00:00Z".to_string())
        .await;

    assert_eq!(
        manager.get_cursor("characters").await,
        Some("2024-01-01T00:00:00Z".to_string())
    );
}

#[tokio::test]
async fn test_advance_cursor_never_regresses() {
    let manager = StateManager::in_memory();

    assert!(
        manager
            .advance_cursor("events", "2014-04-29T14:18:17-0400")
            .await
    );
    assert!(
        !manager
            .advance_cursor("events", "2013-01-01T00:00:00-0500")
            .await
    );
    assert!(!manager.advance_cursor("events", "not-a-date").await);

    assert_eq!(
        manager.get_cursor("events").await,
        Some("2014-04-29T14:18:17-0400".to_string())
    );
}

#[tokio::test]
async fn test_clones_share_state() {
    let manager = StateManager::in_memory();
    let other = manager.clone();

    manager
        .advance_cursor("series", "2020-01-01T00:00:00Z")
        .await;

    assert_eq!(
        other.get_cursor("series").await,
        Some("2020-01-01T00:00:00Z".to_string())
    );
}

#[tokio::test]
async fn test_clear_stream() {
    let manager = StateManager::in_memory();
    manager
        .set_cursor("creators", "2020-01-01T00:00:00Z".to_string())
        .await;
    manager
        .set_cursor("stories", "2020-01-01T00:00:00Z".to_string())
        .await;

    manager.clear_stream("creators").await;

    assert!(manager.get_cursor("creators").await.is_none());
    assert!(manager.get_cursor("stories").await.is_some());
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::new(&path);
    manager
        .advance_cursor("characters", "2014-04-29T14:18:17-0400")
        .await;
    manager.save().await.unwrap();

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_cursor("characters").await,
        Some("2014-04-29T14:18:17-0400".to_string())
    );
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_from_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nonexistent.json");

    let manager = StateManager::from_file(&path).unwrap();

    assert!(manager.get_cursor("characters").await.is_none());
    assert!(!manager.is_in_memory());
}

#[test]
fn test_from_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "[1, 2").unwrap();

    assert!(StateManager::from_file(&path).is_err());
}

#[tokio::test]
async fn test_save_to_explicit_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("exported.json");

    let manager = StateManager::in_memory();
    manager
        .set_cursor("comics", "2020-01-01T00:00:00Z".to_string())
        .await;
    manager.save_to_file(&path).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["streams"]["comics"]["cursor"], "2020-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_save_in_memory_noop() {
    let manager = StateManager::in_memory();
    manager
        .set_cursor("characters", "2020-01-01T00:00:00Z".to_string())
        .await;
    manager.checkpoint().await.unwrap();
}

#[tokio::test]
async fn test_to_json() {
    let manager = StateManager::in_memory();
    manager
        .set_cursor("stories", "2020-01-01T00:00:00Z".to_string())
        .await;

    assert_eq!(
        manager.to_json().await.unwrap(),
        r#"{"streams":{"stories":{"cursor":"2020-01-01T00:00:00Z"}}}"#
    );
}
