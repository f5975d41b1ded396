//! SQLite-based counter store

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{CounterStore, StoreError, StoreResult};

/// SQLite-based counter store
pub struct SqliteCounterStore {
    inner: Mutex<Inner>,
}

struct Inner {
    conn: Connection,
    /// Values written by `put` but not yet committed
    staged: BTreeMap<String, u64>,
}

impl SqliteCounterStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS counters (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );
            "#,
        )?;

        debug!("Counter store schema initialized");
        Ok(Self {
            inner: Mutex::new(Inner {
                conn,
                staged: BTreeMap::new(),
            }),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    /// Number of staged, uncommitted writes
    pub fn staged_len(&self) -> usize {
        self.lock().map(|inner| inner.staged.len()).unwrap_or(0)
    }
}

impl CounterStore for SqliteCounterStore {
    fn get(&self, key: &str) -> StoreResult<u64> {
        let inner = self.lock()?;

        let value: Option<i64> = inner
            .conn
            .query_row("SELECT value FROM counters WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value.map(|v| u64::try_from(v).unwrap_or(0)).unwrap_or(0))
    }

    fn put(&self, key: &str, value: u64) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.staged.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&self) -> StoreResult<()> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        if inner.staged.is_empty() {
            return Ok(());
        }

        let tx = inner.conn.transaction()?;
        for (key, value) in &inner.staged {
            tx.execute(
                r#"
                INSERT INTO counters (key, value)
                VALUES (?, ?)
                ON CONFLICT(key)
                DO UPDATE SET value = excluded.value
                "#,
                params![key, i64::try_from(*value).unwrap_or(i64::MAX)],
            )?;
        }
        tx.commit()?;

        debug!(keys = inner.staged.len(), "Counters committed");
        inner.staged.clear();
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.inner.lock() {
            Ok(inner) => inner.conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
