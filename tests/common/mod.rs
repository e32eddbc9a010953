//! Shared fixtures for the integration tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use consultdesk::storage::{SledStore, Storage};

#[allow(dead_code)]
pub fn create_temp_storage() -> (Storage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::open(tmp.path().join("store")).expect("failed to open sled store");
    (Storage::new(store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
