use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions as SqlxConnectOptions, PgSslMode as SqlxSslMode};
use std::sync::LazyLock;

/// Common Postgres settings shared across all scikgdash connection types.
const COMMON_CLIENT_ENCODING: &str = "UTF8";
const COMMON_TIMEZONE: &str = "UTC";

const APP_NAME_API: &str = "scikgdash_api";
const APP_NAME_SYNCER: &str = "scikgdash_syncer";
const APP_NAME_MIGRATIONS: &str = "scikgdash_migrations";

/// Session options for the read API's pool.
pub static SCIKGDASH_API_OPTIONS: LazyLock<PgConnectionOptions> =
    LazyLock::new(|| PgConnectionOptions {
        client_encoding: COMMON_CLIENT_ENCODING.to_string(),
        timezone: COMMON_TIMEZONE.to_string(),
        statement_timeout: 30_000,
        lock_timeout: 5_000,
        application_name: APP_NAME_API.to_string(),
    });

/// Session options for sync-run merge writes.
pub static SCIKGDASH_SYNCER_OPTIONS: LazyLock<PgConnectionOptions> =
    LazyLock::new(|| PgConnectionOptions {
        client_encoding: COMMON_CLIENT_ENCODING.to_string(),
        timezone: COMMON_TIMEZONE.to_string(),
        statement_timeout: 120_000,
        lock_timeout: 10_000,
        application_name: APP_NAME_SYNCER.to_string(),
    });

/// Session options for schema migrations, with a generous statement timeout.
pub static SCIKGDASH_MIGRATION_OPTIONS: LazyLock<PgConnectionOptions> =
    LazyLock::new(|| PgConnectionOptions {
        client_encoding: COMMON_CLIENT_ENCODING.to_string(),
        timezone: COMMON_TIMEZONE.to_string(),
        statement_timeout: 300_000,
        lock_timeout: 10_000,
        application_name: APP_NAME_MIGRATIONS.to_string(),
    });

/// Per-session Postgres options applied on top of a [`PgConnectionConfig`].
#[derive(Debug, Clone)]
pub struct PgConnectionOptions {
    pub client_encoding: String,
    pub timezone: String,
    pub statement_timeout: u32,
    pub lock_timeout: u32,
    pub application_name: String,
}

impl PgConnectionOptions {
    pub fn to_key_value_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("client_encoding".to_string(), self.client_encoding.clone()),
            ("timezone".to_string(), self.timezone.clone()),
            (
                "statement_timeout".to_string(),
                self.statement_timeout.to_string(),
            ),
            ("lock_timeout".to_string(), self.lock_timeout.to_string()),
            (
                "application_name".to_string(),
                self.application_name.clone(),
            ),
        ]
    }
}

/// Connection settings for the destination Postgres database.
///
/// This intentionally does not implement [`serde::Serialize`] to avoid accidentally
/// leaking the password into serialized forms.
#[derive(Debug, Clone, Deserialize)]
pub struct PgConnectionConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: Option<SecretString>,
}

/// Conversion of a [`PgConnectionConfig`] into driver-level connect options.
pub trait IntoConnectOptions<Output> {
    fn without_db(&self, options: Option<&PgConnectionOptions>) -> Output;
    fn with_db(&self, options: Option<&PgConnectionOptions>) -> Output;
}

impl IntoConnectOptions<SqlxConnectOptions> for PgConnectionConfig {
    fn without_db(&self, options: Option<&PgConnectionOptions>) -> SqlxConnectOptions {
        let mut connect_options = SqlxConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .port(self.port)
            .ssl_mode(SqlxSslMode::Prefer);

        if let Some(password) = &self.password {
            connect_options = connect_options.password(password.expose_secret());
        }

        if let Some(opts) = options {
            connect_options = connect_options.options(opts.to_key_value_pairs());
        }

        connect_options
    }

    fn with_db(&self, options: Option<&PgConnectionOptions>) -> SqlxConnectOptions {
        let connect_options: SqlxConnectOptions = self.without_db(options);
        connect_options.database(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syncer_options_carry_application_name() {
        let pairs = SCIKGDASH_SYNCER_OPTIONS.to_key_value_pairs();
        assert!(
            pairs.contains(&("application_name".to_string(), "scikgdash_syncer".to_string()))
        );
        assert!(pairs.contains(&("statement_timeout".to_string(), "120000".to_string())));
    }

    #[test]
    fn migration_options_use_longer_statement_timeout() {
        assert_eq!(SCIKGDASH_MIGRATION_OPTIONS.statement_timeout, 300_000);
        assert_eq!(SCIKGDASH_MIGRATION_OPTIONS.application_name, "scikgdash_migrations");
    }
}
