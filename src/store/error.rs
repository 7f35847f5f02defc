use crate::report::RecordId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by record store drivers
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id exists
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored document could not be encoded or decoded
    #[error("Malformed record document {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Driver-specific failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
