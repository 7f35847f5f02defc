use super::error::ApiError;
use super::AppState;
use crate::pipeline::ValidationReport;
use crate::report::{IdeaRecord, RecordId};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct ValidateIdeaRequest {
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub worklab: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: crate::VERSION,
    })
}

/// Runs the full pipeline for one idea
///
/// The run is detached from the request: if the client goes away, the
/// in-flight stages still complete and persist.
pub async fn validate_idea_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateIdeaRequest>, JsonRejection>,
) -> Result<Json<ValidationReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    info!(
        idea_len = request.idea.len(),
        worklab = request.worklab.as_deref().unwrap_or(""),
        "Received validation request"
    );

    let orchestrator = state.orchestrator.clone();
    let handle = tokio::spawn(async move {
        orchestrator
            .validate_idea(&request.idea, request.worklab.as_deref())
            .await
    });

    let report = handle
        .await
        .map_err(|e| ApiError::internal(format!("Validation task failed: {}", e)))??;

    Ok(Json(report))
}

pub async fn get_idea_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdeaRecord>, ApiError> {
    let not_found = || ApiError::not_found(format!("Record not found: {}", id));

    let record_id: RecordId = id.parse().map_err(|_| not_found())?;
    debug!(record_id = %record_id, "Fetching record");

    let record = state
        .store
        .get_record(&record_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    record.map(Json).ok_or_else(not_found)
}
