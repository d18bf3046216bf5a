use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Deployment diagnostics. Never echoes the connection string.
pub async fn debug_handler(State(app_state): State<AppState>) -> Json<Value> {
    let settings = &app_state.settings;
    Json(json!({
        "hasDatabaseUrl": settings.database.url_configured,
        "backend": settings.database.backend.as_str(),
        "environment": settings.environment,
        "port": settings.port,
    }))
}
