use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::destination::Destination;
use crate::error::EtlResult;
use crate::types::StatementRecord;

#[derive(Debug)]
struct Inner {
    rows: HashMap<String, StatementRecord>,
    batches_applied: u32,
}

/// In-memory destination for testing and development purposes.
///
/// [`MemoryDestination`] keeps the merged table in a map keyed by record id,
/// making it ideal for verifying sync behavior without a database. All data is
/// held in memory and lost when the process terminates.
#[derive(Debug, Clone)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    /// Creates a new empty memory destination.
    pub fn new() -> Self {
        let inner = Inner {
            rows: HashMap::new(),
            batches_applied: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns a copy of the merged rows keyed by record id.
    ///
    /// This method is useful for testing and verification of sync behavior.
    pub async fn rows(&self) -> HashMap<String, StatementRecord> {
        let inner = self.inner.lock().await;
        inner.rows.clone()
    }

    /// Returns the number of batches merged so far.
    pub async fn batches_applied(&self) -> u32 {
        let inner = self.inner.lock().await;
        inner.batches_applied
    }

    /// Clears all merged rows.
    ///
    /// This method is useful for resetting the destination state between tests.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.rows.clear();
        inner.batches_applied = 0;
    }
}

impl Default for MemoryDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for MemoryDestination {
    fn name() -> &'static str {
        "memory"
    }

    fn resource_name(&self) -> &str {
        "memory"
    }

    async fn merge_statement_rows(&self, rows: Vec<StatementRecord>) -> EtlResult<()> {
        let mut inner = self.inner.lock().await;

        info!("merging a batch of {} statement rows", rows.len());

        for row in rows {
            inner.rows.insert(row.id.clone(), row);
        }
        inner.batches_applied += 1;

        Ok(())
    }
}
