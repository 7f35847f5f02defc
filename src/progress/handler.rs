//! Progress handler trait and events

use crate::pipeline::Stage;
use crate::report::RecordId;
use std::time::Duration;

/// Events emitted while an idea is validated
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Record created, stages about to run
    Started { record_id: RecordId },

    /// A stage's completion request is about to be sent
    StageStarted { record_id: RecordId, stage: Stage },

    /// A stage produced a valid document and it was persisted
    StageComplete {
        record_id: RecordId,
        stage: Stage,
        duration: Duration,
    },

    /// A stage failed; under the continue policy the run goes on
    StageFailed {
        record_id: RecordId,
        stage: Stage,
        error: String,
    },

    /// All stages ran
    Completed {
        record_id: RecordId,
        populated: usize,
        failed: usize,
        total_time: Duration,
    },

    /// The run stopped early
    Failed { error: String },
}

/// Trait for handling progress events during validation
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
