//! Store trait definitions

use studybox_api::LogRow;

use crate::StoreResult;

/// Durable unsigned counters addressed by fixed keys
///
/// Writes are staged by [`put`](CounterStore::put) and become durable only
/// when [`commit`](CounterStore::commit) succeeds. All staged keys are
/// committed together.
pub trait CounterStore: Send + Sync {
    /// Committed value for `key`, zero if it was never written
    fn get(&self, key: &str) -> StoreResult<u64>;

    /// Stage a new value for `key`
    fn put(&self, key: &str, value: u64) -> StoreResult<()>;

    /// Make all staged values durable
    fn commit(&self) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Append-only record of daily rollovers
pub trait ActivityLog: Send + Sync {
    /// Append one row, writing the header first if the log is new or empty
    fn append(&self, row: &LogRow) -> StoreResult<()>;
}
