use serde::Deserialize;

use crate::shared::{PgConnectionConfig, UpstreamConfig, ValidationError};

/// Complete configuration for the statement-counts sync job.
///
/// This intentionally does not implement [`serde::Serialize`] because the nested
/// connection config carries the database password.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncerConfig {
    /// Connection configuration for the destination Postgres database.
    pub pg_connection: PgConnectionConfig,
    /// Upstream collection endpoint settings.
    pub upstream: UpstreamConfig,
    /// Seconds between periodic sync runs.
    ///
    /// When absent, the job performs a single run and exits; scheduling is
    /// left to the operator.
    #[serde(default)]
    pub run_interval_secs: Option<u64>,
}

impl SyncerConfig {
    /// Validates syncer configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.upstream.validate()?;

        if self.run_interval_secs == Some(0) {
            return Err(ValidationError::InvalidFieldValue {
                field: "run_interval_secs".to_string(),
                constraint: "must be greater than 0 when set".to_string(),
            });
        }

        Ok(())
    }
}
