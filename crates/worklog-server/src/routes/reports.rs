use axum::{extract::State, Json};
use serde::Deserialize;
use worklog_core::report::report_filename;
use worklog_core::{ReportRequest, ReportStyle};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReportBody {
    pub start_date: String,
    pub end_date: String,
    pub style: String,
}

/// POST /api/reports: generate a report over an inclusive date window.
pub async fn generate_report(
    State(app): State<AppState>,
    Json(body): Json<ReportBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = ReportRequest::parse(&body.start_date, &body.end_date, &body.style)?;
    let report = app.worklog.generate(&req).await?;
    Ok(Json(serde_json::json!({
        "report": report,
        "filename": report_filename(&req),
    })))
}

/// GET /api/report-styles
pub async fn list_styles() -> Json<serde_json::Value> {
    let styles: Vec<serde_json::Value> = ReportStyle::ALL
        .iter()
        .map(|s| {
            serde_json::json!({
                "value": s.as_str(),
                "label": s.label(),
                "description": s.description(),
            })
        })
        .collect();
    Json(serde_json::json!(styles))
}
