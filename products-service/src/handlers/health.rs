use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Process liveness. Never touches the database.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "service": "Products"
    }))
}

/// Whether a database handle is currently published. Issues no query.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if state.provider.is_connected().await {
        Ok(Json(json!({ "status": "ready" })))
    } else {
        Err(AppError::ServiceUnavailable)
    }
}
