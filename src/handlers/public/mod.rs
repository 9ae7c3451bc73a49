// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info, liveness, and token acquisition. These handlers receive no
// user context and must validate everything they accept.

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

pub mod auth;

/// GET / - Service information
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Notes API",
            "version": version,
            "endpoints": {
                "health": "/health (public)",
                "auth": "/api/v1/auth/register, /api/v1/auth/login (public - token acquisition)",
                "profile": "/api/v1/profile (protected)",
                "notes": "/api/v1/notes[/:id] (protected)",
            }
        }
    }))
}

/// GET /health - Liveness plus store connectivity
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.users.ping().await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}
