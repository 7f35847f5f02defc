use super::stage::Stage;
use crate::llm::BackendError;
use crate::report::RecordId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors raised while validating an idea
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Missing or empty input, rejected before any side effect
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The completion call for a stage errored or timed out
    #[error("Completion failed for {stage} stage: {source}")]
    CompletionFailure {
        stage: Stage,
        #[source]
        source: BackendError,
    },

    /// The sanitized response was not JSON, or violated the stage schema
    #[error("Schema violation in {stage} stage: {message}")]
    SchemaViolation { stage: Stage, message: String },

    /// The record store rejected a create or update
    #[error("Persistence failure: {source}")]
    PersistenceFailure {
        stage: Option<Stage>,
        #[source]
        source: StoreError,
    },

    /// A stage failed under the abort policy; the record exists and keeps
    /// whatever earlier stages wrote
    #[error("Validation aborted for record {record_id}: {source}")]
    StageAborted {
        record_id: RecordId,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Stable, machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidInput(_) => "invalid_input",
            ValidationError::CompletionFailure { .. } => "completion_failure",
            ValidationError::SchemaViolation { .. } => "schema_violation",
            ValidationError::PersistenceFailure { .. } => "persistence_failure",
            ValidationError::StageAborted { source, .. } => source.kind(),
        }
    }

    /// Stage the error belongs to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ValidationError::InvalidInput(_) => None,
            ValidationError::CompletionFailure { stage, .. }
            | ValidationError::SchemaViolation { stage, .. } => Some(*stage),
            ValidationError::PersistenceFailure { stage, .. } => *stage,
            ValidationError::StageAborted { source, .. } => source.stage(),
        }
    }

    /// Record the failed run wrote to, if one was created
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            ValidationError::StageAborted { record_id, .. } => Some(*record_id),
            _ => None,
        }
    }
}
