use content_fs::{ConfigStore, Error, NormalizedPath};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct EditorSettings {
    indent: usize,
    copy_suffix: String,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("settings.toml");
    fs::write(&file_path, "indent = 4\ncopy_suffix = \" - Copy\"").unwrap();

    let settings: EditorSettings = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(settings.indent, 4);
    assert_eq!(settings.copy_suffix, " - Copy");
}

#[test]
fn test_save_then_load_yaml() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("settings.yml"));
    let store = ConfigStore::new();
    let settings = EditorSettings {
        indent: 3,
        copy_suffix: "_copy".into(),
    };

    store.save(&path, &settings).unwrap();
    let loaded: EditorSettings = store.load(&path).unwrap();

    assert_eq!(loaded, settings);
}

#[test]
fn test_load_or_default_when_missing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.json"));

    let settings: EditorSettings = ConfigStore::new().load_or_default(&path).unwrap();

    assert_eq!(settings, EditorSettings::default());
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("settings.ini");
    fs::write(&file_path, "indent=2").unwrap();

    let err = ConfigStore::new()
        .load::<EditorSettings>(&NormalizedPath::new(&file_path))
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("settings.json");
    fs::write(&file_path, "{ not json").unwrap();

    let err = ConfigStore::new()
        .load::<EditorSettings>(&NormalizedPath::new(&file_path))
        .unwrap_err();

    assert!(format!("{err}").contains("JSON"));
}
