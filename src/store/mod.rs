//! Persistence for idea records
//!
//! The pipeline writes through the [`RecordStore`] trait: one `create_record`
//! before any stage runs, then one `update_field` per successful stage. Two
//! drivers ship with the crate:
//!
//! - [`InMemoryStore`]: process-local map, the default and the test double
//! - [`JsonFileStore`]: one JSON document per record in a directory
//!
//! Drivers are selected from a store URL (`memory://` or `file://<dir>`), see
//! [`StoreLocation`].

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::report::{FieldUpdate, IdeaRecord, RecordId};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a record holding only `idea` and `worklab`
    ///
    /// The returned record carries the freshly assigned id.
    async fn create_record(
        &self,
        idea: &str,
        worklab: Option<&str>,
    ) -> Result<IdeaRecord, StoreError>;

    /// Writes exactly one stage field of an existing record
    ///
    /// Applying the same update twice leaves the record as after the first.
    async fn update_field(&self, id: &RecordId, update: FieldUpdate) -> Result<(), StoreError>;

    async fn get_record(&self, id: &RecordId) -> Result<Option<IdeaRecord>, StoreError>;

    fn name(&self) -> &str;
}

/// Where records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Opens the driver for this location
    pub async fn open(&self) -> Result<Arc<dyn RecordStore>, StoreError> {
        match self {
            StoreLocation::Memory => Ok(Arc::new(InMemoryStore::new())),
            StoreLocation::File(dir) => Ok(Arc::new(JsonFileStore::open(dir.clone()).await?)),
        }
    }
}

impl FromStr for StoreLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "memory" || s == "memory://" {
            return Ok(StoreLocation::Memory);
        }
        match s.strip_prefix("file://") {
            Some(path) if !path.is_empty() => Ok(StoreLocation::File(PathBuf::from(path))),
            _ => Err(format!(
                "Invalid store URL: {}. Expected memory:// or file://<directory>",
                s
            )),
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Memory => write!(f, "memory://"),
            StoreLocation::File(dir) => write!(f, "file://{}", dir.display()),
        }
    }
}
