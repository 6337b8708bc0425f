use std::net::TcpListener;

use actix_web::{App, HttpServer, dev::Server, web};
use scikgdash_config::shared::{IntoConnectOptions, PgConnectionConfig, SCIKGDASH_API_OPTIONS};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ApiConfig;
use crate::routes::{
    ErrorMessage,
    health_check::{HealthCheckResponse, health_check},
    statements::{PageResponse, ReadStatementsResponse, StatementResponse, read_statements},
};

/// Read API application server wrapper.
///
/// Manages the HTTP server lifecycle including startup and shutdown.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds and configures the API application server.
    ///
    /// Binds the listener and sets up the connection pool and all routes. The
    /// pool connects lazily, so building succeeds even when the database is
    /// not reachable yet.
    pub async fn build(config: ApiConfig) -> anyhow::Result<Self> {
        let connection_pool = get_connection_pool(&config.database);

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, connection_pool).await?;

        Ok(Self { port, server })
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Runs the server until it receives a shutdown signal.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Creates a Postgres connection pool from the provided configuration.
///
/// The pool connects lazily on first use and applies the API session options.
pub fn get_connection_pool(config: &PgConnectionConfig) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.with_db(Some(&SCIKGDASH_API_OPTIONS)))
}

/// Creates and configures the HTTP server with all routes and middleware.
pub async fn run(listener: TcpListener, connection_pool: PgPool) -> anyhow::Result<Server> {
    let connection_pool = web::Data::new(connection_pool);

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::routes::health_check::health_check,
            crate::routes::statements::read_statements,
        ),
        components(schemas(
            HealthCheckResponse,
            ReadStatementsResponse,
            StatementResponse,
            PageResponse,
            ErrorMessage,
        ))
    )]
    struct ApiDoc;

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(health_check)
            .service(read_statements)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .app_data(connection_pool.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
