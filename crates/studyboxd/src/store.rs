//! Counter store selection at boot

use std::path::Path;
use std::sync::Arc;
use studybox_store::{CounterStore, MemoryCounterStore, SqliteCounterStore};
use studybox_util::{Result, StudyboxError};
use tracing::{info, warn};

/// Open the on-disk counter store
pub fn open_counter_store(path: &Path) -> Result<Arc<dyn CounterStore>> {
    let store = SqliteCounterStore::open(path)
        .map_err(|e| StudyboxError::storage(format!("{}: {}", path.display(), e)))?;
    info!(db_path = %path.display(), "Counter store initialized");
    Ok(Arc::new(store))
}

/// Open the on-disk counter store, or fall back to memory so the device
/// still runs. Totals then do not survive a restart.
pub fn counter_store_or_memory(path: &Path) -> Arc<dyn CounterStore> {
    open_counter_store(path).unwrap_or_else(|e| {
        warn!(error = %e, "Running on in-memory totals");
        Arc::new(MemoryCounterStore::new())
    })
}
