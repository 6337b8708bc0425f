use anyhow::Context;
use scikgdash_api::{config::ApiConfig, startup::Application};
use scikgdash_config::load_config;
use scikgdash_config::shared::PgConnectionConfig;
use scikgdash_telemetry::tracing::init_tracing;
use tracing::info;

/// Entry point for the read API service.
///
/// Initializes tracing and starts the Actix web server.
fn main() -> anyhow::Result<()> {
    // Initialize tracing from the binary name
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // We start the runtime.
    actix_web::rt::System::new().block_on(async_main())?;

    Ok(())
}

/// Main async function that starts the service.
async fn async_main() -> anyhow::Result<()> {
    let config = load_config::<ApiConfig>().context("loading API configuration")?;
    log_pg_connection_config(&config.database);

    info!(address = %config.application, "starting read API");

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}

fn log_pg_connection_config(config: &PgConnectionConfig) {
    info!(
        host = config.host,
        port = config.port,
        dbname = config.name,
        username = config.username,
        "pg database options",
    );
}
