// handlers/public/mod.rs - Public handlers (no authentication required)
use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Car Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "cars": "/api/cars[/:id] (protected)",
            "search": "/api/cars/search/:query (protected)",
            "uploads": "/uploads/:file (public)",
            "health": "/health (public)"
        }
    }))
}

/// GET /health - store connectivity check
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.cars.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable(format!("Database unavailable: {}", e))
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
