//! Durable per-subject totals

use std::sync::Arc;
use std::time::Duration;
use studybox_api::{Subject, TotalsTable};
use studybox_store::{CounterStore, StoreResult};
use studybox_util::duration_to_millis;
use tracing::{debug, warn};

/// Subject totals persisted as whole milliseconds in a [`CounterStore`]
#[derive(Clone)]
pub struct PersistentAccumulator {
    store: Arc<dyn CounterStore>,
}

impl PersistentAccumulator {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Read all totals. A key that cannot be read counts as zero.
    pub fn load(&self) -> TotalsTable {
        let mut totals = TotalsTable::new();
        for subject in Subject::ALL {
            match self.store.get(subject.storage_key()) {
                Ok(ms) => totals.set(subject, Duration::from_millis(ms)),
                Err(e) => warn!(
                    subject = %subject,
                    key = subject.storage_key(),
                    error = %e,
                    "Failed to read subject total, using zero"
                ),
            }
        }
        debug!(total_ms = duration_to_millis(totals.sum()), "Totals loaded");
        totals
    }

    /// Write all totals and commit them together
    pub fn save(&self, totals: &TotalsTable) -> StoreResult<()> {
        for (subject, total) in totals.iter() {
            self.store
                .put(subject.storage_key(), duration_to_millis(total))?;
        }
        self.store.commit()?;
        debug!(total_ms = duration_to_millis(totals.sum()), "Totals saved");
        Ok(())
    }

    pub fn is_healthy(&self) -> bool {
        self.store.is_healthy()
    }
}
