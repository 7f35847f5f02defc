use crate::pipeline::{Stage, ValidationError};
use crate::report::RecordId;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
}

/// Error returned by a handler, rendered as a JSON body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &str, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                kind: kind.to_string(),
                stage: None,
                record_id: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", error)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let status = match &err {
            ValidationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ValidationError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ValidationError::CompletionFailure { .. }
            | ValidationError::SchemaViolation { .. }
            | ValidationError::StageAborted { .. } => StatusCode::BAD_GATEWAY,
        };

        Self {
            status,
            body: ErrorBody {
                error: err.to_string(),
                kind: err.kind().to_string(),
                stage: err.stage(),
                record_id: err.record_id(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, kind = %self.body.kind, "{}", self.body.error);
        }
        (self.status, Json(self.body)).into_response()
    }
}
