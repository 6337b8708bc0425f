#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scikgdash_etl::error::{ErrorKind, EtlResult};
use scikgdash_etl::etl_error;
use scikgdash_etl::source::StatementSource;
use scikgdash_etl::types::{PageMeta, PageRequest, RawStatementRecord, StatementsPage};
use serde_json::json;

/// Upstream source serving a fixed script of pages.
///
/// Requests beyond the script return an empty page without pagination
/// metadata, which terminates the walk as a short page. The fetch counter lets
/// tests assert exactly how many requests were issued.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pages: Vec<StatementsPage>,
    fail_at: Option<u32>,
    fetches: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<StatementsPage>) -> Self {
        Self {
            pages,
            fail_at: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails the fetch of the given page index with an upstream error.
    pub fn failing_at(pages: Vec<StatementsPage>, page_number: u32) -> Self {
        Self {
            pages,
            fail_at: Some(page_number),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the number of fetches issued against this source.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl StatementSource for ScriptedSource {
    fn name() -> &'static str {
        "scripted"
    }

    async fn fetch_page(&self, request: &PageRequest) -> EtlResult<StatementsPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_at == Some(request.page_number) {
            return Err(etl_error!(
                ErrorKind::UpstreamFetchFailed,
                "Upstream returned an error status",
                format!("scripted failure on page {}", request.page_number)
            ));
        }

        Ok(self
            .pages
            .get(request.page_number as usize)
            .cloned()
            .unwrap_or(StatementsPage {
                content: vec![],
                page: None,
            }))
    }
}

/// Upstream source serving full pages forever, with no pagination metadata.
///
/// Used to verify the configured page ceiling, which is the only thing that
/// can stop this source.
#[derive(Debug, Clone)]
pub struct EndlessSource {
    fetches: Arc<AtomicUsize>,
}

impl EndlessSource {
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl StatementSource for EndlessSource {
    fn name() -> &'static str {
        "endless"
    }

    async fn fetch_page(&self, request: &PageRequest) -> EtlResult<StatementsPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let start = request.page_number as usize * request.page_size as usize;
        Ok(page(
            records(start, request.page_size as usize),
            None,
        ))
    }
}

/// Builds a raw record with all three fields present.
pub fn record(id: &str, title: &str, count: i64) -> RawStatementRecord {
    RawStatementRecord {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        count: Some(json!(count)),
    }
}

/// Builds `len` sequentially numbered raw records starting at `start`.
pub fn records(start: usize, len: usize) -> Vec<RawStatementRecord> {
    (start..start + len)
        .map(|i| record(&format!("P{i}"), &format!("Paper {i}"), i as i64))
        .collect()
}

/// Builds a page, attaching pagination metadata only when `total_pages` is given.
pub fn page(content: Vec<RawStatementRecord>, total_pages: Option<u32>) -> StatementsPage {
    StatementsPage {
        content,
        page: total_pages.map(|total_pages| PageMeta {
            size: None,
            total_elements: None,
            total_pages: Some(total_pages),
            number: None,
        }),
    }
}
