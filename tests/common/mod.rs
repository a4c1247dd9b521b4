#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use budget_ledger::{
    storage::{JsonFileStore, Persistence},
    LedgerStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn file_persistence(dir: &Path) -> Persistence {
    Persistence::new(JsonFileStore::new(dir).expect("create json file store"))
}

/// Opens a file-backed ledger in a fresh directory.
pub fn setup_file_ledger() -> (LedgerStore, PathBuf) {
    let dir = test_dir();
    (LedgerStore::open(file_persistence(&dir)), dir)
}
