use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Settings for the upstream paper-statement-counts collection endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpstreamConfig {
    /// Base URL of the paginated collection endpoint.
    pub base_url: String,
    /// Number of records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Optional server-side case-insensitive title substring filter.
    #[serde(default)]
    pub title_filter: Option<String>,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional hard ceiling on the number of pages fetched in one run.
    ///
    /// When absent, pagination runs until the upstream signals exhaustion. When set
    /// and reached before exhaustion, the run fails instead of silently truncating.
    #[serde(default)]
    pub max_pages: Option<u32>,
}

impl UpstreamConfig {
    /// Default number of records requested per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 2500;

    /// Default per-request timeout in seconds.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Validates upstream endpoint settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "upstream.base_url".to_string(),
                constraint: "must not be empty".to_string(),
            });
        }

        if self.page_size == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "upstream.page_size".to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }

        if self.max_pages == Some(0) {
            return Err(ValidationError::InvalidFieldValue {
                field: "upstream.max_pages".to_string(),
                constraint: "must be greater than 0 when set".to_string(),
            });
        }

        Ok(())
    }
}

fn default_page_size() -> u32 {
    UpstreamConfig::DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    UpstreamConfig::DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UpstreamConfig {
        UpstreamConfig {
            base_url: "https://orkg.org/api/papers/statement-counts".to_string(),
            page_size: default_page_size(),
            title_filter: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_pages: None,
        }
    }

    #[test]
    fn defaults_match_upstream_contract() {
        assert_eq!(UpstreamConfig::DEFAULT_PAGE_SIZE, 2500);
        assert_eq!(UpstreamConfig::DEFAULT_REQUEST_TIMEOUT_SECS, 60);
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = config();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_ceiling_is_rejected() {
        let mut config = config();
        config.max_pages = Some(0);
        assert!(config.validate().is_err());
    }
}
