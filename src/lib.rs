//! ideaforge - business idea validation backed by a language model
//!
//! An idea goes in as one line of text; three independent completion stages
//! turn it into a market snapshot, a feature roadmap and an agile sprint plan.
//! Each stage's output is sanitized, parsed into a typed document, checked for
//! completeness and persisted as soon as it is available, so a failing stage
//! never discards the work of the others.
//!
//! # Example Usage
//!
//! ```ignore
//! use ideaforge::llm::{MockLLMClient, MockResponse};
//! use ideaforge::pipeline::{PipelineConfig, ValidationOrchestrator};
//! use ideaforge::store::InMemoryStore;
//! use std::sync::Arc;
//!
//! let llm = Arc::new(MockLLMClient::new());
//! let store = Arc::new(InMemoryStore::new());
//! let orchestrator = ValidationOrchestrator::new(llm, store, PipelineConfig::default());
//!
//! let report = orchestrator.validate_idea("Meal kits for climbers", None).await?;
//! println!("{} fields populated", report.record.populated_fields());
//! ```
//!
//! # Project Structure
//!
//! - [`llm`]: completion client abstraction (genai, mock)
//! - [`pipeline`]: sanitizer, prompts and the stage orchestrator
//! - [`report`]: typed stage documents and the persisted record
//! - [`store`]: record persistence drivers
//! - [`server`]: axum HTTP surface
//! - [`cli`]: command-line entry points

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod server;
pub mod store;
pub mod util;

pub use config::{ConfigError, IdeaforgeConfig};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient, MockResponse};
pub use pipeline::{
    PipelineConfig, Stage, StageFailure, StageFailurePolicy, ValidationError,
    ValidationOrchestrator, ValidationReport,
};
pub use report::{IdeaRecord, RecordId};
pub use store::{InMemoryStore, JsonFileStore, RecordStore, StoreError, StoreLocation};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_ideaforge() {
        assert_eq!(NAME, "ideaforge");
    }
}
