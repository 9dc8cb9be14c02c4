//! Integration tests for loading docsmith.toml

use docsmith_core::{ConfigError, DocConfig, CONFIG_FILE};

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(&path, "[references]\nbase-path = \"/docs/\"\n").unwrap();

    let config = DocConfig::from_path(&path).unwrap();
    assert_eq!(config.references.base_path, "/docs/");
    assert!(config.references.include_private);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = DocConfig::from_path(dir.path().join(CONFIG_FILE));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
