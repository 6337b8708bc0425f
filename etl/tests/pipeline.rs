use scikgdash_config::shared::UpstreamConfig;
use scikgdash_etl::destination::memory::MemoryDestination;
use scikgdash_etl::error::ErrorKind;
use scikgdash_etl::pipeline::Pipeline;
use scikgdash_etl::types::RawStatementRecord;
use scikgdash_telemetry::tracing::init_test_tracing;
use serde_json::json;

mod support;

use support::{EndlessSource, ScriptedSource, page, record, records};

fn upstream_config(page_size: u32, max_pages: Option<u32>) -> UpstreamConfig {
    UpstreamConfig {
        base_url: "http://localhost/api/papers/statement-counts".to_string(),
        page_size,
        title_filter: None,
        request_timeout_secs: UpstreamConfig::DEFAULT_REQUEST_TIMEOUT_SECS,
        max_pages,
    }
}

#[tokio::test]
async fn sync_run_is_idempotent() {
    init_test_tracing();

    let pages = vec![
        page(records(0, 3), Some(2)),
        page(records(3, 2), Some(2)),
    ];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(3, None), source, destination.clone());

    let first = pipeline.run().await.unwrap();
    let rows_after_first = destination.rows().await;

    let second = pipeline.run().await.unwrap();
    let rows_after_second = destination.rows().await;

    assert_eq!(first.rows_loaded, 5);
    assert_eq!(second.rows_loaded, 5);
    assert_eq!(rows_after_first, rows_after_second);
}

#[tokio::test]
async fn run_yields_all_pages_when_total_pages_is_present() {
    init_test_tracing();

    // 6001 records across three pages of 2500; the upstream reports
    // total_pages on every response, including the trailing empty fetch.
    let pages = vec![
        page(records(0, 2500), Some(3)),
        page(records(2500, 2500), Some(3)),
        page(records(5000, 1001), Some(3)),
        page(vec![], Some(3)),
    ];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(2500, None), source, destination.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.batches_applied, 3);
    assert_eq!(report.rows_loaded, 6001);
    assert_eq!(destination.rows().await.len(), 6001);
}

#[tokio::test]
async fn run_stops_on_short_page_without_total_pages() {
    init_test_tracing();

    let pages = vec![
        page(records(0, 2500), None),
        page(records(2500, 2500), None),
        page(records(5000, 1000), None),
    ];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(
        upstream_config(2500, None),
        source.clone(),
        destination.clone(),
    );

    let report = pipeline.run().await.unwrap();

    // The short third page ends the walk; no fourth request is issued.
    assert_eq!(source.fetches(), 3);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.batches_applied, 3);
    assert_eq!(report.rows_loaded, 6000);
}

#[tokio::test]
async fn empty_page_with_remaining_total_pages_continues() {
    init_test_tracing();

    // A transient empty page in the middle of the collection must not end the
    // walk while total_pages says there is more.
    let pages = vec![
        page(records(0, 2), Some(3)),
        page(vec![], Some(3)),
        page(records(2, 2), Some(3)),
        page(vec![], Some(3)),
    ];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(
        upstream_config(2, None),
        source.clone(),
        destination.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(source.fetches(), 4);
    assert_eq!(report.batches_applied, 2);
    assert_eq!(report.rows_loaded, 4);
}

#[tokio::test]
async fn upstream_failure_aborts_run_and_keeps_committed_batches() {
    init_test_tracing();

    let pages = vec![
        page(records(0, 2), None),
        page(records(2, 2), None),
    ];
    let source = ScriptedSource::failing_at(pages, 1);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(2, None), source, destination.clone());

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFetchFailed);
    // The first batch was already merged and stays merged.
    assert_eq!(destination.rows().await.len(), 2);
    assert_eq!(destination.batches_applied().await, 1);
}

#[tokio::test]
async fn bad_count_aborts_run_without_partial_batch() {
    init_test_tracing();

    let poisoned = vec![
        record("P10", "Paper 10", 1),
        RawStatementRecord {
            id: Some("P11".to_string()),
            title: Some("Paper 11".to_string()),
            count: Some(json!("not-a-number")),
        },
    ];
    let pages = vec![page(records(0, 2), None), page(poisoned, None)];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(2, None), source, destination.clone());

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConversionError);
    // Nothing from the poisoned page was merged, not even its valid record.
    let rows = destination.rows().await;
    assert_eq!(rows.len(), 2);
    assert!(!rows.contains_key("P10"));
}

#[tokio::test]
async fn page_ceiling_fails_instead_of_truncating() {
    init_test_tracing();

    let source = EndlessSource::new();
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(
        upstream_config(100, Some(2)),
        source.clone(),
        destination.clone(),
    );

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PageLimitExceeded);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn duplicate_ids_within_a_batch_last_occurrence_wins() {
    init_test_tracing();

    let duplicated = vec![
        record("P1", "First title", 1),
        record("P2", "Other", 5),
        record("P1", "Second title", 9),
    ];
    let pages = vec![page(duplicated, None)];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(2500, None), source, destination.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.rows_loaded, 2);
    let rows = destination.rows().await;
    assert_eq!(rows["P1"].count, 9);
    assert_eq!(rows["P1"].title, "Second title");
}

#[tokio::test]
async fn report_names_the_touched_resource() {
    init_test_tracing();

    let pages = vec![page(records(0, 1), None)];
    let source = ScriptedSource::new(pages);
    let destination = MemoryDestination::new();
    let pipeline = Pipeline::new(upstream_config(2500, None), source, destination.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.resources, vec!["memory".to_string()]);
    assert_eq!(report.batches_applied, 1);
}
