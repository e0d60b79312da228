use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use patient_core::{
    CoreConfig, PatientService, SqlitePatientStore, constants::DEFAULT_REST_ADDR,
    database_location_from_env_value,
};

/// Main entry point for the patient service
///
/// Opens the patient database, applies any pending migrations and serves the
/// REST API until interrupted.
///
/// # Environment Variables
/// - `PATIENT_REST_ADDR`: REST server address (default: "0.0.0.0:4000")
/// - `PATIENT_DB_PATH`: SQLite database file, or `:memory:` (default: "patient_data/patients.db")
/// - `RUST_LOG`: extra tracing filter directives
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the database cannot be opened or migrated,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("patient_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("PATIENT_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = CoreConfig::new(database_location_from_env_value(
        std::env::var("PATIENT_DB_PATH").ok(),
    ))?;

    let store = SqlitePatientStore::open(&cfg)?;
    let app = api_rest::router(AppState::new(PatientService::new(Arc::new(store))));

    tracing::info!("++ Starting patient REST API on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Patient REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
