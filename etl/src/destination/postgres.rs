use scikgdash_config::shared::{
    IntoConnectOptions, PgConnectionConfig, SCIKGDASH_SYNCER_OPTIONS,
};
use scikgdash_postgres::schema::statement_counts_table;
use scikgdash_postgres::statements::{StatementCountRow, upsert_statement_counts};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::destination::Destination;
use crate::error::EtlResult;
use crate::types::StatementRecord;

/// Postgres destination merging batches into the statement counts table.
///
/// Each batch becomes one multi-row `INSERT ... ON CONFLICT (id) DO UPDATE`,
/// so per-batch atomicity comes from the database while the run as a whole is
/// not transactional: batches merged before a failure stay committed.
#[derive(Debug, Clone)]
pub struct PostgresDestination {
    pool: PgPool,
    resource_name: String,
}

impl PostgresDestination {
    /// Creates a destination with a lazily connected pool.
    ///
    /// The first batch write establishes the connection, so construction never
    /// fails and holds no resources for runs that abort before writing.
    pub fn new(config: &PgConnectionConfig) -> Self {
        let pool = PgPoolOptions::new()
            .connect_lazy_with(config.with_db(Some(&SCIKGDASH_SYNCER_OPTIONS)));

        Self {
            pool,
            resource_name: statement_counts_table(),
        }
    }
}

impl Destination for PostgresDestination {
    fn name() -> &'static str {
        "postgres"
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    async fn merge_statement_rows(&self, rows: Vec<StatementRecord>) -> EtlResult<()> {
        let rows: Vec<StatementCountRow> = rows
            .into_iter()
            .map(|row| StatementCountRow {
                id: row.id,
                title: row.title,
                count: row.count,
            })
            .collect();

        info!(rows = rows.len(), table = %self.resource_name, "merging statement batch");

        upsert_statement_counts(&self.pool, &rows).await?;

        Ok(())
    }
}
