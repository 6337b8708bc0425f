//! Upstream collection access: the HTTP client and the page walker.

pub mod client;
pub mod paginator;

use std::future::Future;

use crate::error::EtlResult;
use crate::types::{PageRequest, StatementsPage};

/// Trait for systems that can serve pages of the upstream statement-counts collection.
///
/// [`StatementSource`] implementations fetch one bounded slice of the
/// collection per call. The paginator drives requests strictly sequentially in
/// increasing page order, so implementations never see concurrent fetches for
/// the same run.
///
/// Implementations must fail the whole fetch on any transport or status error;
/// there is no retry and the caller aborts the run on the first failure.
pub trait StatementSource {
    /// Returns the name of the source.
    fn name() -> &'static str;

    /// Fetches one page of the collection.
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = EtlResult<StatementsPage>> + Send;
}
