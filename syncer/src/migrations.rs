use scikgdash_config::shared::{
    IntoConnectOptions, PgConnectionConfig, SCIKGDASH_MIGRATION_OPTIONS,
};
use sqlx::postgres::PgPoolOptions;

/// Applies all pending destination schema migrations.
///
/// The syncer owns the destination DDL because it is the only writer; the read
/// API assumes the table exists.
pub async fn migrate_destination(config: &PgConnectionConfig) -> Result<(), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .connect_lazy_with(config.with_db(Some(&SCIKGDASH_MIGRATION_OPTIONS)));

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(())
}
