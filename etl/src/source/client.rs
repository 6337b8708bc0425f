use std::time::Duration;

use scikgdash_config::shared::UpstreamConfig;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::etl_error;
use crate::source::StatementSource;
use crate::types::{PageRequest, StatementsPage};

/// HTTP client for the ORKG paper statement-counts collection endpoint.
///
/// Issues one `GET` per page with `size` and `page` query parameters and the
/// optional server-side `title` filter. Requests are single-attempt: any
/// transport failure or non-success status aborts the run.
#[derive(Debug, Clone)]
pub struct OrkgClient {
    http: reqwest::Client,
    base_url: String,
    title_filter: Option<String>,
}

impl OrkgClient {
    /// Creates a client from upstream endpoint settings.
    ///
    /// The per-request timeout bounds each page fetch; no timeout spans the
    /// whole run.
    pub fn new(config: &UpstreamConfig) -> EtlResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| {
                etl_error!(
                    ErrorKind::ConfigError,
                    "Failed to build the upstream HTTP client",
                    err.to_string(),
                    source: err
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            title_filter: config.title_filter.clone(),
        })
    }
}

impl StatementSource for OrkgClient {
    fn name() -> &'static str {
        "orkg"
    }

    async fn fetch_page(&self, request: &PageRequest) -> EtlResult<StatementsPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("size", request.page_size.to_string()),
            ("page", request.page_number.to_string()),
        ];
        if let Some(title) = &self.title_filter {
            query.push(("title", title.clone()));
        }

        debug!(page = request.page_number, size = request.page_size, "fetching upstream page");

        let response = self.http.get(&self.base_url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                ErrorKind::UpstreamFetchFailed,
                "Upstream returned an error status",
                format!("GET {} page {} -> {status}", self.base_url, request.page_number)
            );
        }

        let page = response.json::<StatementsPage>().await?;

        Ok(page)
    }
}
