use tracing::debug;

use crate::bail;
use crate::conversions::record::normalize_batch;
use crate::error::{ErrorKind, EtlResult};
use crate::source::StatementSource;
use crate::types::{PageMeta, PageRequest, StatementRecord};

/// Decision taken after each page fetch.
///
/// The policy is evaluated in priority order: the upstream page count wins
/// when present, otherwise a short page signals exhaustion. An empty page by
/// itself never terminates the walk, which guards against transient empty
/// pages served without pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `total_pages` was present and the current index reached it.
    ByTotalPages,
    /// `total_pages` was absent and the page was shorter than requested.
    ByShortPage,
    /// Keep walking.
    Continue,
}

/// Evaluates the termination policy for the page that was just fetched.
pub fn termination_decision(
    meta: Option<&PageMeta>,
    raw_content_len: usize,
    page_size: u32,
    page_number: u32,
) -> Termination {
    match meta.and_then(|meta| meta.total_pages) {
        Some(total_pages) if page_number >= total_pages => Termination::ByTotalPages,
        Some(_) => Termination::Continue,
        None if raw_content_len < page_size as usize => Termination::ByShortPage,
        None => Termination::Continue,
    }
}

/// Sequential walker over the upstream collection.
///
/// Fetches pages in strictly increasing index order starting at zero,
/// normalizes each page, and yields non-empty batches until the termination
/// policy fires or an error aborts the run. A run that fails must be restarted
/// from page zero; there is no partial resumption.
#[derive(Debug)]
pub struct Paginator<'a, S> {
    source: &'a S,
    page_size: u32,
    max_pages: Option<u32>,
    next_page: u32,
    pages_fetched: u32,
    finished: bool,
}

impl<'a, S> Paginator<'a, S>
where
    S: StatementSource,
{
    /// Creates a paginator starting at page zero.
    ///
    /// `max_pages` is the operator-configured safety ceiling: when reached
    /// before the upstream signals exhaustion, the run fails loudly instead of
    /// silently truncating the collection.
    pub fn new(source: &'a S, page_size: u32, max_pages: Option<u32>) -> Self {
        Self {
            source,
            page_size,
            max_pages,
            next_page: 0,
            pages_fetched: 0,
            finished: false,
        }
    }

    /// Returns the number of page fetches issued so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetches pages until the next non-empty batch or exhaustion.
    ///
    /// Returns `Ok(None)` once the collection is exhausted. Batches come out
    /// in page order, fully normalized; a record that fails normalization
    /// aborts the run with no partial batch emitted.
    pub async fn next_batch(&mut self) -> EtlResult<Option<Vec<StatementRecord>>> {
        while !self.finished {
            if let Some(max_pages) = self.max_pages {
                if self.pages_fetched >= max_pages {
                    bail!(
                        ErrorKind::PageLimitExceeded,
                        "Upstream pagination exceeded the configured page ceiling",
                        format!("fetched {} pages without reaching the end of the collection", self.pages_fetched)
                    );
                }
            }

            let request = PageRequest {
                page_number: self.next_page,
                page_size: self.page_size,
            };

            let page = self.source.fetch_page(&request).await?;
            self.pages_fetched += 1;

            let raw_content_len = page.content.len();
            let batch = normalize_batch(&page.content)?;

            let decision = termination_decision(
                page.page.as_ref(),
                raw_content_len,
                self.page_size,
                request.page_number,
            );
            debug!(
                page = request.page_number,
                records = raw_content_len,
                ?decision,
                "fetched upstream page"
            );

            match decision {
                Termination::Continue => self.next_page += 1,
                Termination::ByTotalPages | Termination::ByShortPage => self.finished = true,
            }

            if !batch.is_empty() {
                return Ok(Some(batch));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(total_pages: Option<u32>) -> PageMeta {
        PageMeta {
            size: None,
            total_elements: None,
            total_pages,
            number: None,
        }
    }

    #[test]
    fn total_pages_takes_priority_over_short_page() {
        // A short page with a page count that says keep going must continue.
        let meta = meta(Some(4));
        assert_eq!(
            termination_decision(Some(&meta), 10, 2500, 1),
            Termination::Continue
        );
    }

    #[test]
    fn reaching_total_pages_terminates() {
        let meta = meta(Some(3));
        assert_eq!(
            termination_decision(Some(&meta), 0, 2500, 3),
            Termination::ByTotalPages
        );
    }

    #[test]
    fn short_page_terminates_without_total_pages() {
        assert_eq!(
            termination_decision(None, 1000, 2500, 2),
            Termination::ByShortPage
        );
        assert_eq!(
            termination_decision(Some(&meta(None)), 1000, 2500, 2),
            Termination::ByShortPage
        );
    }

    #[test]
    fn full_page_continues_without_total_pages() {
        assert_eq!(
            termination_decision(None, 2500, 2500, 2),
            Termination::Continue
        );
    }

    #[test]
    fn empty_page_without_metadata_is_a_short_page() {
        assert_eq!(
            termination_decision(None, 0, 2500, 0),
            Termination::ByShortPage
        );
    }
}
