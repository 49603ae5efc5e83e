use ai_assistant_shell::{PersistenceError, PreferenceChange, PreferenceRecord, PreferencesStore};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn file_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn first_run_then_existing_file_then_provider_switch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let store = PreferencesStore::initialize(&path).unwrap();
    assert_eq!(
        file_json(&path),
        json!({"theme": "default.css", "streamerMode": false, "selectedProvider": "ChatGPT"})
    );
    drop(store);

    fs::write(
        &path,
        r#"{"theme": "dark.css", "streamerMode": true, "selectedProvider": "Copilot"}"#,
    )
    .unwrap();
    let store = PreferencesStore::initialize(&path).unwrap();
    let loaded = store.get();
    assert_eq!(loaded.theme, "dark.css");
    assert!(loaded.streamer_mode);
    assert_eq!(loaded.selected_provider, "Copilot");

    let updated = store
        .update(&PreferenceChange::selected_provider("MistralAI"))
        .unwrap();
    let expected = json!({"theme": "dark.css", "streamerMode": true, "selectedProvider": "MistralAI"});
    assert_eq!(serde_json::to_value(&updated).unwrap(), expected);
    assert_eq!(file_json(&path), expected);

    // A restart sees what the update wrote.
    let reopened = PreferencesStore::initialize(&path).unwrap();
    assert_eq!(reopened.get(), updated);
}

#[test]
fn unreadable_target_is_a_persistence_error_and_fallback_keeps_running() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::create_dir(&path).unwrap();

    let err = PreferencesStore::initialize(&path)
        .err()
        .expect("a directory is not a preferences file");
    assert!(matches!(err, PersistenceError::Read { .. }));

    let store = PreferencesStore::fallback(&path);
    assert_eq!(store.get(), PreferenceRecord::default());
    assert!(store.update(&PreferenceChange::streamer_mode(true)).is_err());
    assert!(!store.get().streamer_mode);
}
