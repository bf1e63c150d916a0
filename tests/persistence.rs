use serde_json::json;
use std::fs;
use taghue::storage::{CURRENT_VERSION, StateStore};
use taghue::{Configuration, Engine, FileStore, MemoryStore, TagPath, Theme};

#[test]
fn test_v1_state_migrates_with_single_write() {
    // 1. Version 1 state: no palette field
    let store = MemoryStore::with_raw(json!({
        "version": 1,
        "settings": { "chroma": 16.0, "lightness": 87.0, "seed": 2 },
        "known_tags": { "a": 1, "a/b": 1 }
    }));

    // 2. Load
    let engine = Engine::load(store).unwrap();

    // 3. Assertions
    assert_eq!(engine.config().palette, 16);
    assert_eq!(engine.config().seed, 2);
    assert_eq!(engine.store().writes(), 1, "migration should persist exactly once");
    let saved = engine.store().saved().unwrap();
    assert_eq!(saved.version, 2);
    assert_eq!(saved.settings.palette, 16);
    assert_eq!(saved.known_tags.get("a/b"), Some(1));
}

#[test]
fn test_current_state_loads_without_writing() {
    let store = MemoryStore::with_raw(json!({
        "version": CURRENT_VERSION,
        "settings": { "palette": 9 },
        "known_tags": {}
    }));
    let engine = Engine::load(store).unwrap();
    assert_eq!(engine.config().palette, 9);
    assert_eq!(engine.store().writes(), 0);
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    // 1. First session registers tags
    let mut engine = Engine::load(FileStore::at(&path)).unwrap();
    assert!(engine.ensure_tags_known(["proj/ui", "proj/api", "home"]));
    let tag = TagPath::parse("proj/api").unwrap();
    let first_session = engine.colors_for(&tag, Theme::Dark);
    assert!(path.exists());

    // 2. Second session sees the same slots and colors
    let mut reloaded = Engine::load(FileStore::at(&path)).unwrap();
    assert_eq!(reloaded.registry(), engine.registry());
    assert_eq!(reloaded.colors_for(&tag, Theme::Dark), first_session);
    assert!(!reloaded.ensure_tags_known(["proj/ui", "proj/api", "home"]));
}

#[test]
fn test_file_store_migrates_v1_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r##"{ "settings": { "enable_custom_colors": true, "custom_colors": ["#ff0000", "oops"] }, "known_tags": { "x": 3 } }"##,
    )
    .unwrap();

    let engine = Engine::load(FileStore::at(&path)).unwrap();
    assert_eq!(engine.config().custom_colors, vec!["#ff0000"]);
    assert_eq!(engine.registry().get("x"), Some(3));

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["version"], json!(2));
    assert_eq!(on_disk["settings"]["palette"], json!(16));
}

#[test]
fn test_corrupt_file_starts_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ not json").unwrap();

    let store = FileStore::at(&path);
    assert!(store.load().unwrap().is_none());

    let engine = Engine::load(store).unwrap();
    assert_eq!(engine.config(), &Configuration::default());
    assert!(engine.registry().is_empty());
}

#[test]
fn test_oversized_slot_in_state_does_not_crash_registration() {
    let store = MemoryStore::with_raw(json!({
        "version": CURRENT_VERSION,
        "known_tags": { "a": 4_294_967_295u64 }
    }));
    let mut engine = Engine::load(store).unwrap();

    assert!(engine.ensure_tags_known(["b"]));
    assert_eq!(engine.registry().get("b"), Some(u32::MAX));
    let colors = engine.colors_for(&TagPath::parse("b").unwrap(), Theme::Light);
    assert!(colors.background.starts_with('#'));
}
