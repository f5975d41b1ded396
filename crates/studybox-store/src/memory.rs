//! In-memory store doubles for unit and integration testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use studybox_api::LogRow;

use crate::{ActivityLog, CounterStore, StoreError, StoreResult};

/// Counter store kept in memory, with switchable failures
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    committed: Mutex<HashMap<String, u64>>,
    staged: Mutex<HashMap<String, u64>>,

    /// Configure commit to fail
    pub fail_commit: AtomicBool,

    /// Configure get to fail
    pub fail_get: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate committed values
    pub fn with_values(values: &[(&str, u64)]) -> Self {
        let store = Self::new();
        if let Ok(mut committed) = store.committed.lock() {
            for (key, value) in values {
                committed.insert((*key).to_string(), *value);
            }
        }
        store
    }

    pub fn set_fail_commit(&self, fail: bool) {
        self.fail_commit.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".into())
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, key: &str) -> StoreResult<u64> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock read failure".into()));
        }
        let committed = self.committed.lock().map_err(|_| poisoned())?;
        Ok(committed.get(key).copied().unwrap_or(0))
    }

    fn put(&self, key: &str, value: u64) -> StoreResult<()> {
        let mut staged = self.staged.lock().map_err(|_| poisoned())?;
        staged.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&self) -> StoreResult<()> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock commit failure".into()));
        }
        let mut staged = self.staged.lock().map_err(|_| poisoned())?;
        let mut committed = self.committed.lock().map_err(|_| poisoned())?;
        committed.extend(staged.drain());
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !self.fail_commit.load(Ordering::SeqCst)
    }
}

/// Activity log kept in memory, with switchable failures
#[derive(Debug, Clone, Default)]
pub struct MemoryActivityLog {
    rows: Arc<Mutex<Vec<LogRow>>>,

    /// Configure append to fail
    pub fail_append: Arc<AtomicBool>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows appended so far
    pub fn rows(&self) -> Vec<LogRow> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn set_fail_append(&self, fail: bool) {
        self.fail_append.store(fail, Ordering::SeqCst);
    }
}

impl ActivityLog for MemoryActivityLog {
    fn append(&self, row: &LogRow) -> StoreResult<()> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock append failure".into()));
        }
        self.rows.lock().map_err(|_| poisoned())?.push(row.clone());
        Ok(())
    }
}
