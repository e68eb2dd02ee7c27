//! Sessions backed by the JSON preference file, across app restarts

mod common;

use common::{abcd, fast_settings, MockBackend};
use feedkit_core::{Multiplier, SelectionState};
use feedkit_settings::{keys, JsonFileStore, PreferenceStoreExt};
use feedkit_sync::SyncEngine;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

async fn launch(path: &Path, backend: Arc<MockBackend>) -> (Arc<JsonFileStore>, SyncEngine) {
    let store = Arc::new(JsonFileStore::open(path).await.unwrap());
    let engine = SyncEngine::new(store.clone(), backend, &fast_settings());
    engine.start().await.unwrap();
    (store, engine)
}

fn keys_on_disk(path: &Path) -> BTreeMap<String, String> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_remembered_result_and_saved_multiplier_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs").join("preferences.json");

    {
        let (_, engine) = launch(&path, MockBackend::new(0.8)).await;
        engine.set_selection(&abcd()).await.unwrap();

        let screen = engine.open_screen("results");
        screen.on_screen_focused().await.unwrap();
        screen.on_user_adjusts(0.5);
        screen.on_user_saves().await.unwrap();
        screen.on_screen_unmounted().await;
    }

    let backend = MockBackend::new(0.8);
    let (store, engine) = launch(&path, backend.clone()).await;
    let screen = engine.open_screen("results");

    assert_eq!(screen.on_screen_focused().await.unwrap(), None);
    assert_eq!(backend.calls(), 0);
    assert!(screen.view().result().is_some_and(|r| r.is_for(&abcd().key())));
    assert_eq!(screen.view().multiplier(), Multiplier::new(1.3));
    assert_eq!(store.load_selection().await, abcd());
    screen.on_screen_unmounted().await;
}

#[tokio::test]
async fn test_restart_prunes_non_remembered_result_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");

    {
        let (_, engine) = launch(&path, MockBackend::new(0.8)).await;
        engine
            .resolver()
            .resolve(&SelectionState::new("A", "B", "D", "C"))
            .await
            .unwrap();
        let on_disk = keys_on_disk(&path);
        assert!(on_disk.contains_key(keys::RESULT_SNAPSHOT));
        assert_eq!(
            on_disk.get(keys::RESULT_MULTIPLIER).map(String::as_str),
            Some("0.8")
        );
    }

    let backend = MockBackend::new(1.5);
    let (store, engine) = launch(&path, backend).await;

    let on_disk = keys_on_disk(&path);
    assert!(!on_disk.contains_key(keys::RESULT_SNAPSHOT));
    assert!(!on_disk.contains_key(keys::RESULT_MULTIPLIER));

    let outcome = engine
        .resolver()
        .resolve(&SelectionState::new("X", "Y", "Z", "W"))
        .await
        .unwrap();
    assert!(!outcome.kept_local);
    assert_eq!(store.load_multiplier().await, Some(Multiplier::new(1.5)));
}

#[tokio::test]
async fn test_reset_survives_restart_and_resolves_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");

    {
        let (_, engine) = launch(&path, MockBackend::new(1.0)).await;
        engine.set_selection(&abcd()).await.unwrap();
        let results = engine.open_screen("results");
        results.on_screen_focused().await.unwrap();
        results.on_screen_unmounted().await;

        engine
            .open_screen("settings")
            .on_user_requests_reset()
            .await
            .unwrap();
    }

    let backend = MockBackend::new(1.0);
    let (store, engine) = launch(&path, backend.clone()).await;
    assert!(store.load_invalidation_token().await.is_some());
    assert!(!store.load_selection().await.remember_choice);
    assert_eq!(store.load_selection().await.machine_id, "");

    let first = engine.open_screen("results");
    assert!(first.on_screen_focused().await.unwrap().is_some());
    first.on_screen_unmounted().await;
    assert_eq!(backend.calls(), 1);
    assert_eq!(store.load_invalidation_token().await, None);

    let second = engine.open_screen("results");
    assert_eq!(second.on_screen_focused().await.unwrap(), None);
    second.on_screen_unmounted().await;
    assert_eq!(backend.calls(), 1);
}
