#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use meterbook_core::{time::FixedClock, Clock};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory to use as `METERBOOK_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Clock pinned to 2024-06-15.
pub fn june_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::on(2024, 6, 15).expect("valid date"))
}

pub fn store_file(home: &Path) -> PathBuf {
    home.join("data").join("store.json")
}
