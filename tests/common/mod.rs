#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use budget_tracker::{
    clock::FixedClock,
    config::ConfigManager,
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    store::{CategoryRegistry, EntryStore},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Fresh directory kept alive until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// In-memory store and registry sharing one backend, pinned to `today`.
pub fn memory_env(today: NaiveDate) -> (Arc<MemoryStore>, EntryStore, CategoryRegistry) {
    let backend = Arc::new(MemoryStore::new());
    let store = EntryStore::new(backend.clone(), Arc::new(FixedClock(today)));
    let registry = CategoryRegistry::load(backend.clone()).expect("load categories");
    (backend, store, registry)
}

/// File-backed store rooted in an isolated temp directory.
pub fn file_env(today: NaiveDate) -> (PathBuf, EntryStore, CategoryRegistry) {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("config manager");
    let backend: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::new(manager.data_dir()).expect("json file store"));
    let store = EntryStore::load(backend.clone(), Arc::new(FixedClock(today))).expect("load store");
    let registry = CategoryRegistry::load(backend).expect("load categories");
    (base, store, registry)
}

/// Re-opens the store persisted under `base`.
pub fn reopen(base: &PathBuf, today: NaiveDate) -> (EntryStore, CategoryRegistry) {
    let manager = ConfigManager::with_base_dir(base.clone()).expect("config manager");
    let backend: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::new(manager.data_dir()).expect("json file store"));
    let store = EntryStore::load(backend.clone(), Arc::new(FixedClock(today))).expect("load store");
    let registry = CategoryRegistry::load(backend).expect("load categories");
    (store, registry)
}
