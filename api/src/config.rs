use scikgdash_config::shared::PgConnectionConfig;
use serde::Deserialize;
use std::fmt;

/// Complete configuration for the read API service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Connection configuration for the destination database the API reads from.
    pub database: PgConnectionConfig,
    /// Application server settings.
    pub application: ApplicationSettings,
}

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    /// Host address the API listens on.
    pub host: String,
    /// Port number the API listens on.
    pub port: u16,
}

impl fmt::Display for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
