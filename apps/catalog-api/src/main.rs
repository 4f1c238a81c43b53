use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageBackend};
use state::{AppState, Storage};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let storage = match (config.storage, &config.mongodb) {
        (StorageBackend::MongoDb, Some(mongodb)) => {
            info!("Connecting to MongoDB at {}", mongodb.url);
            let client = database::mongodb::connect_from_config_with_retry(mongodb, None).await?;
            let db = client.database(&mongodb.database);
            info!("Successfully connected to MongoDB database: {}", mongodb.database);
            Storage::MongoDb { client, db }
        }
        (StorageBackend::MongoDb, None) => {
            return Err(eyre::eyre!("MongoDB backend selected without MongoDB settings"));
        }
        (StorageBackend::Memory, _) => Storage::Memory,
    };

    let state = AppState { config, storage };

    // Domain routes plus /ready; indexes are created here
    let api_routes = api::routes(&state).await?;

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server);
    let app = router.merge(health_router(state.config.app.clone()));

    info!("Starting Catalog API with graceful shutdown (30s timeout)");

    let mongo_client = state.mongo_client().cloned();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(client) = mongo_client {
                info!("Shutting down: closing MongoDB connections");
                client.shutdown().await;
                info!("MongoDB connection closed successfully");
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
