use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use llm_gateway::GatewayError;
use worklog_core::{ErrorKind, WorklogError};

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Handler error. Engine errors keep their own status and `kind`; anything
/// else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(msg.into()))
    }
}

fn gateway_status(e: &GatewayError) -> StatusCode {
    match e {
        GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::Unauthorized(_) | GatewayError::Provider { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn classify(err: &anyhow::Error) -> (StatusCode, &'static str, bool) {
    if let Some(e) = err.downcast_ref::<WorklogError>() {
        return match (e.kind(), e) {
            (_, WorklogError::Gateway(g)) => (gateway_status(g), g.kind(), g.is_retryable()),
            (ErrorKind::Validation, _) => (StatusCode::BAD_REQUEST, "validation", false),
            (ErrorKind::MissingCredential, _) => {
                (StatusCode::PRECONDITION_FAILED, "missing_credential", false)
            }
            (ErrorKind::NoPriorVersion, _) => (StatusCode::CONFLICT, "no_prior_version", false),
            (ErrorKind::Storage | ErrorKind::Gateway, _) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage", false)
            }
        };
    }
    if let Some(g) = err.downcast_ref::<GatewayError>() {
        return (gateway_status(g), g.kind(), g.is_retryable());
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "internal", false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, retryable) = classify(&self.0);
        if status.is_server_error() {
            tracing::warn!(error = %self.0, kind, "request failed");
        }
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": kind,
            "retryable": retryable,
        });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use http_body_util::BodyExt;

    fn status_of(err: WorklogError) -> StatusCode {
        AppError(err.into()).into_response().status()
    }

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(status_of(WorklogError::EmptyBatch), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(WorklogError::InvalidStyle("weekly".into())),
            StatusCode::BAD_REQUEST
        );
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            status_of(WorklogError::NoEntriesInRange {
                start: day,
                end: day
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_credential_maps_to_412() {
        assert_eq!(
            status_of(WorklogError::MissingCredential),
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[test]
    fn no_prior_version_maps_to_409() {
        assert_eq!(status_of(WorklogError::NoPriorVersion), StatusCode::CONFLICT);
    }

    #[test]
    fn gateway_errors_map_by_variant() {
        assert_eq!(
            status_of(GatewayError::Unauthorized("bad key".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GatewayError::RateLimited {
                retry_after_secs: None
            }
            .into()),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(GatewayError::Network("timed out".into()).into()),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(
                GatewayError::Provider {
                    status: Some(500),
                    message: "boom".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        assert_eq!(
            status_of(WorklogError::Io(io_err)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn foreign_error_maps_to_500() {
        let response = AppError::internal("task join error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn body_carries_kind_and_retry_hint() {
        let err = AppError(
            WorklogError::from(GatewayError::RateLimited {
                retry_after_secs: Some(5),
            })
            .into(),
        );
        let body = err.into_response().into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "rate_limited");
        assert_eq!(json["retryable"], true);
        assert!(json["error"].as_str().unwrap().contains("rate limit"));
    }
}
