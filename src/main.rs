use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, build_router};
use patients_core::config::database_path_from_env_value;
use patients_core::{CoreConfig, PatientService, SqlitePatientStore};

/// Main entry point for the patients application
///
/// Opens the patient database, applies pending migrations and serves the REST API
/// (with OpenAPI/Swagger documentation) until Ctrl+C.
///
/// # Environment Variables
/// - `PATIENTS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENTS_DATABASE_PATH`: SQLite database file (default: "patients.sqlite"; ":memory:" for
///   a throwaway database)
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
                .add_directive("patients=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PATIENTS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let database_path =
        database_path_from_env_value(std::env::var("PATIENTS_DATABASE_PATH").ok());
    let cfg = CoreConfig::new(database_path)?;

    let store = SqlitePatientStore::from_config(&cfg)?;
    let schema_version = store.schema_version().await?;
    tracing::info!(
        database = %cfg.database_path().display(),
        schema_version,
        "++ Opened patient database"
    );

    let app = build_router(AppState::new(PatientService::new(Arc::new(store))));

    tracing::info!("++ Starting patients REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
