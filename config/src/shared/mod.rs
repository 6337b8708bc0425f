//! Shared configuration types for scikgdash services.

mod connection;
mod syncer;
mod upstream;

use thiserror::Error;

pub use connection::{
    IntoConnectOptions, PgConnectionConfig, PgConnectionOptions, SCIKGDASH_API_OPTIONS,
    SCIKGDASH_MIGRATION_OPTIONS, SCIKGDASH_SYNCER_OPTIONS,
};
pub use syncer::SyncerConfig;
pub use upstream::UpstreamConfig;

/// Errors raised when a configuration value fails semantic validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field holds a value outside its allowed range or shape.
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}
