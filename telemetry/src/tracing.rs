use std::sync::Once;

use scikgdash_config::Environment;
use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Default directive applied when `RUST_LOG` is not set.
const DEFAULT_ENV_FILTER: &str = "info";

/// Guard used only once for test tracing initialization.
static INIT_TEST_TRACING: Once = Once::new();

/// Errors that can occur while installing the global tracing subscriber.
#[derive(Debug, Error)]
pub enum InitTracingError {
    /// The `log` crate bridge could not be installed.
    #[error("failed to install the log bridge: {0}")]
    LogTracer(#[from] tracing_log::log::SetLoggerError),

    /// Another global subscriber was already installed.
    #[error("failed to set the global tracing subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The runtime environment could not be determined.
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] std::io::Error),
}

/// Keeps the non-blocking log writer alive.
///
/// Dropping the flusher flushes and stops the background writer thread, so the
/// caller must hold on to it for the lifetime of the process.
pub struct LogFlusher {
    _guard: WorkerGuard,
}

/// Initializes the global tracing subscriber for a service binary.
///
/// Events are written to stdout through a non-blocking writer. Filtering honors
/// `RUST_LOG` and falls back to `info`. In staging and production the output is
/// JSON-formatted for log collection; in development it stays human-readable.
pub fn init_tracing(service_name: &str) -> Result<LogFlusher, InitTracingError> {
    // Forward `log` records from dependencies into tracing.
    LogTracer::init()?;

    let environment = Environment::load()?;

    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_ENV_FILTER));

    match environment {
        Environment::Dev => {
            let fmt_layer = fmt::layer().with_writer(writer);
            let subscriber = Registry::default().with(env_filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Environment::Staging | Environment::Prod => {
            let fmt_layer = fmt::layer().json().flatten_event(true).with_writer(writer);
            let subscriber = Registry::default().with(env_filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    info!(service = service_name, environment = %environment, "tracing initialized");

    Ok(LogFlusher { _guard: guard })
}

/// Initializes a test-friendly subscriber at most once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    INIT_TEST_TRACING.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_ENV_FILTER));

        let _ = fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}
