use std::future::Future;

use crate::error::EtlResult;
use crate::types::StatementRecord;

/// Trait for systems that can receive merged statement records.
///
/// [`Destination`] implementations define how normalized batches are written
/// to the target store. Writes are merge-upserts keyed on the record id:
/// existing rows are overwritten, missing rows inserted, and nothing is ever
/// deleted. Re-applying the same batch must leave the destination unchanged,
/// since the sync job relies on idempotence when operators re-run after a
/// failure.
///
/// A run only ever touches the single named resource reported by
/// [`Destination::resource_name`].
pub trait Destination {
    /// Returns the name of the destination.
    fn name() -> &'static str;

    /// Returns the name of the resource this destination writes into.
    fn resource_name(&self) -> &str;

    /// Merges a batch of statement records into the destination.
    ///
    /// Batches arrive strictly in page order and contain at most one record
    /// per id; the merge engine collapses in-batch duplicates before the
    /// write. A failed write aborts the run while previously merged batches
    /// stay committed.
    fn merge_statement_rows(
        &self,
        rows: Vec<StatementRecord>,
    ) -> impl Future<Output = EtlResult<()>> + Send;
}
