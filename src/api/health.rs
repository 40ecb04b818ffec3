use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::repositories::UserRepository;

pub async fn health_check(
    State(users): State<Arc<dyn UserRepository>>,
) -> (StatusCode, Json<Value>) {
    let (status, database) = match users.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::warn!("Health check database probe failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "healthy" } else { "degraded" },
            "service": "workout-api",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the workout API" }))
}
