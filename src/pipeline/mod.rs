//! Idea validation pipeline
//!
//! [`ValidationOrchestrator`] creates a record, then runs the market, roadmap
//! and sprint stages in order. Each stage sends a fixed prompt and the idea
//! text to the model, sanitizes the reply, parses it into its typed document
//! and persists it as a single-field update.

mod completion;
pub mod config;
mod error;
mod orchestrator;
pub mod prompts;
pub mod sanitize;
mod stage;
mod transcript;

pub use completion::{Completion, CompletionClient};
pub use config::{PipelineConfig, StageFailurePolicy};
pub use error::ValidationError;
pub use orchestrator::{StageFailure, ValidationOrchestrator, ValidationReport};
pub use sanitize::sanitize;
pub use stage::Stage;
pub use transcript::{Exchange, TranscriptLogger};
