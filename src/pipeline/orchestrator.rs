use super::completion::{Completion, CompletionClient};
use super::config::{PipelineConfig, StageFailurePolicy};
use super::error::ValidationError;
use super::prompts;
use super::sanitize::sanitize;
use super::stage::Stage;
use super::transcript::{Exchange, TranscriptLogger};
use crate::llm::LLMClient;
use crate::progress::{ProgressEvent, ProgressHandler};
use crate::report::{
    parse_stage_output, FeatureRoadmap, FieldUpdate, IdeaRecord, MarketSnapshot, RecordId,
    SprintPlan, StageOutput, REQUESTED_SPRINTS,
};
use crate::store::RecordStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A stage that left its field empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub kind: String,
    pub message: String,
}

impl StageFailure {
    fn from_error(stage: Stage, error: &ValidationError) -> Self {
        Self {
            stage,
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// The record produced by one run plus the stages that failed along the way
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(flatten)]
    pub record: IdeaRecord,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_stages: Vec<StageFailure>,
}

impl ValidationReport {
    /// True when every stage populated its field
    pub fn is_complete(&self) -> bool {
        self.failed_stages.is_empty() && self.record.is_complete()
    }
}

/// Runs the three stages for an idea and persists each result as it arrives
///
/// Stages run strictly in order and each one sees only the original idea text.
/// A record is created before the first stage, so even a run where every stage
/// fails leaves a record behind.
pub struct ValidationOrchestrator {
    completion: CompletionClient,
    store: Arc<dyn RecordStore>,
    config: PipelineConfig,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
    transcript: Arc<TranscriptLogger>,
}

impl ValidationOrchestrator {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        store: Arc<dyn RecordStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            completion: CompletionClient::new(llm, config.temperature, config.max_tokens),
            store,
            config,
            progress_handler: None,
            transcript: Arc::new(TranscriptLogger::disabled()),
        }
    }

    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    pub fn with_transcript(mut self, transcript: Arc<TranscriptLogger>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    pub async fn validate_idea(
        &self,
        idea: &str,
        worklab: Option<&str>,
    ) -> Result<ValidationReport, ValidationError> {
        if idea.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "idea must be a non-empty string".to_string(),
            ));
        }

        let start = Instant::now();
        let mut record = self
            .store
            .create_record(idea, worklab)
            .await
            .map_err(|source| ValidationError::PersistenceFailure {
                stage: None,
                source,
            })?;
        let record_id = record.id;

        info!(
            record_id = %record_id,
            store = self.store.name(),
            backend = self.completion.backend_name(),
            model = self.completion.model_info().as_deref().unwrap_or("unknown"),
            "Validating idea"
        );
        self.emit(ProgressEvent::Started { record_id });

        let mut failed_stages = Vec::new();

        for stage in Stage::ALL {
            self.emit(ProgressEvent::StageStarted { record_id, stage });
            let stage_start = Instant::now();

            let update = match self.run_stage(stage, &record).await {
                Ok(update) => update,
                Err(err) => {
                    warn!(
                        record_id = %record_id,
                        stage = %stage,
                        field = stage.field_name(),
                        error = %err,
                        "Stage failed"
                    );
                    self.emit(ProgressEvent::StageFailed {
                        record_id,
                        stage,
                        error: err.to_string(),
                    });

                    if self.config.policy == StageFailurePolicy::Abort {
                        self.emit(ProgressEvent::Failed {
                            error: err.to_string(),
                        });
                        return Err(ValidationError::StageAborted {
                            record_id,
                            source: Box::new(err),
                        });
                    }

                    failed_stages.push(StageFailure::from_error(stage, &err));
                    continue;
                }
            };

            if let Err(source) = self.store.update_field(&record_id, update.clone()).await {
                let err = ValidationError::PersistenceFailure {
                    stage: Some(stage),
                    source,
                };
                warn!(
                    record_id = %record_id,
                    stage = %stage,
                    field = stage.field_name(),
                    error = %err,
                    "Failed to persist stage result"
                );
                self.emit(ProgressEvent::StageFailed {
                    record_id,
                    stage,
                    error: err.to_string(),
                });
                failed_stages.push(StageFailure::from_error(stage, &err));
                continue;
            }

            update.apply(&mut record);
            self.emit(ProgressEvent::StageComplete {
                record_id,
                stage,
                duration: stage_start.elapsed(),
            });
        }

        self.emit(ProgressEvent::Completed {
            record_id,
            populated: record.populated_fields(),
            failed: failed_stages.len(),
            total_time: start.elapsed(),
        });

        Ok(ValidationReport {
            record,
            failed_stages,
        })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        record: &IdeaRecord,
    ) -> Result<FieldUpdate, ValidationError> {
        match stage {
            Stage::Market => self
                .generate::<MarketSnapshot>(stage, record)
                .await
                .map(FieldUpdate::MarketSnapshot),
            Stage::Roadmap => self
                .generate::<FeatureRoadmap>(stage, record)
                .await
                .map(FieldUpdate::FeatureRoadmap),
            Stage::Sprint => {
                let plan = self.generate::<SprintPlan>(stage, record).await?;
                if plan.len() != REQUESTED_SPRINTS {
                    warn!(
                        record_id = %record.id,
                        sprints = plan.len(),
                        requested = REQUESTED_SPRINTS,
                        "Sprint plan has an unexpected number of sprints"
                    );
                }
                Ok(FieldUpdate::AgileSprintPlan(plan))
            }
        }
    }

    async fn generate<T: StageOutput>(
        &self,
        stage: Stage,
        record: &IdeaRecord,
    ) -> Result<T, ValidationError> {
        let system_prompt = prompts::system_prompt(stage);
        let user_message = prompts::user_message(stage, &record.idea);

        let (completion, attempt) = self
            .complete_with_retry(stage, record.id, system_prompt, &user_message)
            .await?;
        let sanitized = sanitize(&completion.text);

        self.transcript.log_exchange(&Exchange {
            stage,
            record_id: record.id,
            attempt,
            system_prompt,
            user_message: &user_message,
            raw_response: &completion.text,
            sanitized: &sanitized,
            latency_ms: completion.latency.as_millis() as u64,
        });

        debug!(
            record_id = %record.id,
            stage = %stage,
            latency_ms = completion.latency.as_millis() as u64,
            raw_len = completion.text.len(),
            sanitized_len = sanitized.len(),
            "Parsing stage response"
        );

        parse_stage_output::<T>(&sanitized).map_err(|e| ValidationError::SchemaViolation {
            stage,
            message: format!("{:#}", e),
        })
    }

    /// Calls the model, retrying completion failures only
    async fn complete_with_retry(
        &self,
        stage: Stage,
        record_id: RecordId,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<(Completion, u32), ValidationError> {
        let max_attempts = self.config.completion_retries + 1;
        let mut attempt = 1;

        loop {
            match self
                .completion
                .complete(stage, system_prompt, user_message)
                .await
            {
                Ok(completion) => return Ok((completion, attempt)),
                Err(err @ ValidationError::CompletionFailure { .. }) if attempt < max_attempts => {
                    warn!(
                        record_id = %record_id,
                        stage = %stage,
                        attempt,
                        max_attempts,
                        error = %err,
                        "Completion failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl std::fmt::Debug for ValidationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationOrchestrator")
            .field("completion", &self.completion)
            .field("store", &self.store.name())
            .field("config", &self.config)
            .field("transcript", &self.transcript)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{BackendError, MockLLMClient, MockResponse};
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn market() -> serde_json::Value {
        json!({
            "totalAddressableMarket": "$40B",
            "trends": ["Ghost kitchens"],
            "customerSegments": [{"segment": "Restaurants", "painPoints": ["Courier idle time"]}]
        })
    }

    fn roadmap() -> serde_json::Value {
        json!({
            "mvpFeatures": ["Route optimizer"],
            "versionedFeatures": [{"version": "v1.1", "features": ["Demand forecast"]}],
            "stretchGoals": ["Drone handoff"]
        })
    }

    fn sprints() -> serde_json::Value {
        let sprints: Vec<_> = (1..=7)
            .map(|n| {
                json!({
                    "sprint": format!("Sprint {}", n),
                    "userStories": [{"story": "As a courier I see my next stop", "priority": "High"}],
                    "rice": {"reach": "500", "impact": "3", "confidence": "80%", "effort": "2"}
                })
            })
            .collect();
        json!({ "sprints": sprints })
    }

    fn orchestrator(mock: Arc<MockLLMClient>, config: PipelineConfig) -> ValidationOrchestrator {
        ValidationOrchestrator::new(mock, Arc::new(InMemoryStore::new()), config)
    }

    #[tokio::test]
    async fn test_all_stages_populate_record() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_responses([
            MockResponse::fenced_json(&market()),
            MockResponse::fenced_json(&roadmap()),
            MockResponse::fenced_json(&sprints()),
        ]);
        let orchestrator = orchestrator(mock.clone(), PipelineConfig::default());

        let report = orchestrator.validate_idea("Courier routing", None).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.record.idea, "Courier routing");
        assert_eq!(report.record.agile_sprint_plan.as_ref().map(|p| p.len()), Some(7));

        let stored = orchestrator
            .store()
            .get_record(&report.record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.market_snapshot, report.record.market_snapshot);
        assert_eq!(stored.feature_roadmap, report.record.feature_roadmap);
        assert_eq!(stored.agile_sprint_plan, report.record.agile_sprint_plan);
        assert_eq!(mock.remaining_responses(), 0);
    }

    #[tokio::test]
    async fn test_schema_violation_is_not_retried() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_responses([
            MockResponse::fenced_json(&market()),
            MockResponse::fenced_json(&json!({"mvpFeatures": [], "versionedFeatures": [], "stretchGoals": []})),
            MockResponse::fenced_json(&sprints()),
        ]);
        let orchestrator = orchestrator(mock.clone(), PipelineConfig::default());

        let report = orchestrator.validate_idea("Courier routing", None).await.unwrap();
        assert_eq!(mock.requests().len(), 3);
        assert_eq!(report.failed_stages.len(), 1);
        assert_eq!(report.failed_stages[0].stage, Stage::Roadmap);
        assert_eq!(report.failed_stages[0].kind, "schema_violation");
        assert!(report.record.feature_roadmap.is_none());
        assert!(report.record.market_snapshot.is_some());
        assert!(report.record.agile_sprint_plan.is_some());
    }

    #[tokio::test]
    async fn test_completion_failure_is_retried() {
        let mock = Arc::new(MockLLMClient::new());
        mock.add_responses([
            MockResponse::error(BackendError::TimeoutError { seconds: 60 }),
            MockResponse::fenced_json(&market()),
            MockResponse::fenced_json(&roadmap()),
            MockResponse::fenced_json(&sprints()),
        ]);
        let orchestrator = orchestrator(mock.clone(), PipelineConfig::default());

        let report = orchestrator.validate_idea("Courier routing", None).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(mock.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_idea_is_rejected() {
        let mock = Arc::new(MockLLMClient::new());
        let store = Arc::new(InMemoryStore::new());
        let orchestrator =
            ValidationOrchestrator::new(mock.clone(), store.clone(), PipelineConfig::default());

        let err = orchestrator.validate_idea("   ", None).await.unwrap_err();
        assert!(matches!(err, ValidationError::InvalidInput(_)));
        assert!(store.is_empty().await);
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = ValidationReport {
            record: IdeaRecord::new("Idea", None),
            failed_stages: vec![StageFailure {
                stage: Stage::Sprint,
                kind: "completion_failure".to_string(),
                message: "timed out".to_string(),
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["idea"], "Idea");
        assert!(value["_id"].is_string());
        assert!(value["agileSprintPlan"].is_null());
        assert_eq!(value["failedStages"][0]["stage"], "sprint");

        let complete = ValidationReport {
            record: IdeaRecord::new("Idea", None),
            failed_stages: vec![],
        };
        let value = serde_json::to_value(&complete).unwrap();
        assert!(value.get("failedStages").is_none());
    }
}
