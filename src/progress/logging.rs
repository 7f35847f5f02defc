//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { record_id } => {
                info!(record_id = %record_id, "Starting idea validation");
            }
            ProgressEvent::StageStarted { record_id, stage } => {
                debug!(record_id = %record_id, stage = %stage, "Requesting stage completion");
            }
            ProgressEvent::StageComplete {
                record_id,
                stage,
                duration,
            } => {
                info!(
                    record_id = %record_id,
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::StageFailed {
                record_id,
                stage,
                error,
            } => {
                warn!(record_id = %record_id, stage = %stage, error = %error, "Stage failed");
            }
            ProgressEvent::Completed {
                record_id,
                populated,
                failed,
                total_time,
            } => {
                if *failed > 0 {
                    warn!(
                        record_id = %record_id,
                        populated,
                        failed,
                        total_time_ms = total_time.as_millis(),
                        "Validation complete with failed stages"
                    );
                } else {
                    info!(
                        record_id = %record_id,
                        populated,
                        total_time_ms = total_time.as_millis(),
                        "Validation complete"
                    );
                }
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Validation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use crate::report::RecordId;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;
        let record_id = RecordId::generate();

        let events = vec![
            ProgressEvent::Started { record_id },
            ProgressEvent::StageStarted {
                record_id,
                stage: Stage::Market,
            },
            ProgressEvent::StageComplete {
                record_id,
                stage: Stage::Market,
                duration: Duration::from_millis(100),
            },
            ProgressEvent::StageFailed {
                record_id,
                stage: Stage::Sprint,
                error: "timed out".to_string(),
            },
            ProgressEvent::Completed {
                record_id,
                populated: 2,
                failed: 1,
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Completed {
                record_id,
                populated: 3,
                failed: 0,
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
