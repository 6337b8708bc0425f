use std::collections::HashMap;

use chrono::Utc;
use scikgdash_config::shared::UpstreamConfig;
use tracing::info;
use uuid::Uuid;

use crate::destination::Destination;
use crate::error::EtlResult;
use crate::source::StatementSource;
use crate::source::paginator::Paginator;
use crate::types::{StatementRecord, SyncReport};

/// One full paginate-normalize-merge run over the upstream collection.
///
/// The run is strictly sequential: one page fetch, one normalization, one
/// merge at a time, in increasing page order. This preserves last-writer-wins
/// determinism across batches and implicitly respects upstream rate limits by
/// serializing requests. There is no mid-run cancellation: a run either
/// exhausts the pagination or aborts on the first unrecoverable error, leaving
/// previously merged batches committed.
#[derive(Debug)]
pub struct Pipeline<S, D> {
    upstream: UpstreamConfig,
    source: S,
    destination: D,
}

impl<S, D> Pipeline<S, D>
where
    S: StatementSource,
    D: Destination,
{
    pub fn new(upstream: UpstreamConfig, source: S, destination: D) -> Self {
        Self {
            upstream,
            source,
            destination,
        }
    }

    /// Runs the sync to completion and returns the run summary.
    ///
    /// Re-running with unchanged upstream data leaves the destination table
    /// unchanged: the merge is an upsert keyed on the record id and the run
    /// never deletes rows that disappeared upstream.
    pub async fn run(&self) -> EtlResult<SyncReport> {
        let load_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            %load_id,
            page_size = self.upstream.page_size,
            title_filter = self.upstream.title_filter.as_deref(),
            "starting statement sync run"
        );

        let mut paginator = Paginator::new(
            &self.source,
            self.upstream.page_size,
            self.upstream.max_pages,
        );

        let mut batches_applied = 0u32;
        let mut rows_loaded = 0u64;

        while let Some(batch) = paginator.next_batch().await? {
            let batch = dedupe_last_wins(batch);

            rows_loaded += batch.len() as u64;
            self.destination.merge_statement_rows(batch).await?;
            batches_applied += 1;
        }

        let report = SyncReport {
            load_id,
            pages_fetched: paginator.pages_fetched(),
            batches_applied,
            rows_loaded,
            resources: vec![self.destination.resource_name().to_string()],
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            %load_id,
            pages_fetched = report.pages_fetched,
            batches_applied = report.batches_applied,
            rows_loaded = report.rows_loaded,
            "statement sync run complete"
        );

        Ok(report)
    }
}

/// Collapses duplicate ids within one batch, keeping the last occurrence.
///
/// Upstream pages should not repeat an id, but nothing excludes it
/// structurally, and a single multi-row `ON CONFLICT DO UPDATE` cannot touch
/// the same row twice. The surviving record keeps the position of the id's
/// first occurrence.
fn dedupe_last_wins(batch: Vec<StatementRecord>) -> Vec<StatementRecord> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(batch.len());
    let mut deduped: Vec<StatementRecord> = Vec::with_capacity(batch.len());

    for record in batch {
        match positions.get(&record.id) {
            Some(&position) => deduped[position] = record,
            None => {
                positions.insert(record.id.clone(), deduped.len());
                deduped.push(record);
            }
        }
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, count: i64) -> StatementRecord {
        StatementRecord {
            id: id.to_string(),
            title: id.to_string(),
            count,
        }
    }

    #[test]
    fn dedupe_keeps_last_occurrence() {
        let batch = vec![record("P1", 1), record("P2", 2), record("P1", 9)];

        let deduped = dedupe_last_wins(batch);

        assert_eq!(deduped, vec![record("P1", 9), record("P2", 2)]);
    }

    #[test]
    fn dedupe_is_a_noop_without_duplicates() {
        let batch = vec![record("P1", 1), record("P2", 2)];

        assert_eq!(dedupe_last_wins(batch.clone()), batch);
    }
}
