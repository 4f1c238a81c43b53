//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;

use crate::state::{AppState, Storage};

/// Create the readiness router (`GET /ready`)
pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state.storage.clone())
}

/// Readiness check: pings MongoDB, or reports the in-memory store as up
async fn readiness_check(State(storage): State<Storage>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = match storage {
        Storage::MongoDb { client, .. } => vec![(
            "mongodb",
            Box::pin(async move {
                let status = check_health_detailed(&client).await;
                tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ping");
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
                }
            }),
        )],
        Storage::Memory => vec![("memory", Box::pin(async { Ok(()) }))],
    };

    run_health_checks(checks).await
}
