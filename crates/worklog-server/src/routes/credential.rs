use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/credential: whether a key is stored. Never exposes the key.
pub async fn get_status(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let worklog = app.worklog.clone();
    let configured = tokio::task::spawn_blocking(move || worklog.credential_status())
        .await
        .map_err(|e| AppError::internal(format!("task join error: {e}")))?;
    Ok(Json(serde_json::json!({ "configured": configured })))
}

#[derive(Deserialize)]
pub struct SaveKeyBody {
    pub key: String,
}

/// PUT /api/credential: validate and store a key, replacing any prior one.
pub async fn save_key(
    State(app): State<AppState>,
    Json(body): Json<SaveKeyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let worklog = app.worklog.clone();
    tokio::task::spawn_blocking(move || worklog.save_credential(body.key.trim()))
        .await
        .map_err(|e| AppError::internal(format!("task join error: {e}")))??;
    Ok(Json(serde_json::json!({ "status": "saved" })))
}

/// DELETE /api/credential
pub async fn delete_key(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let worklog = app.worklog.clone();
    tokio::task::spawn_blocking(move || worklog.delete_credential())
        .await
        .map_err(|e| AppError::internal(format!("task join error: {e}")))??;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
