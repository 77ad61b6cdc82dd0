use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/worklog: the current document and whether undo is available.
pub async fn get_worklog(State(app): State<AppState>) -> Json<serde_json::Value> {
    let content = app.worklog.read().await;
    let has_backup = app.worklog.has_backup().await;
    Json(serde_json::json!({
        "content": content,
        "has_backup": has_backup,
    }))
}

#[derive(Deserialize)]
pub struct AddEntriesBody {
    pub entries: Vec<String>,
}

/// POST /api/worklog/entries: merge a batch into the document.
pub async fn add_entries(
    State(app): State<AppState>,
    Json(body): Json<AddEntriesBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.worklog.organize(&body.entries).await?;
    let content = app.worklog.read().await;
    Ok(Json(serde_json::json!({ "content": content })))
}

/// POST /api/worklog/undo: restore the version before the last commit.
pub async fn undo(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let content = app.worklog.undo().await?;
    Ok(Json(serde_json::json!({ "content": content })))
}
