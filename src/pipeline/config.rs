use std::fmt;
use std::str::FromStr;

/// What the orchestrator does when a stage fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageFailurePolicy {
    /// Leave the stage's field null and run the next stage
    #[default]
    Continue,
    /// Stop at the first failing stage
    Abort,
}

impl FromStr for StageFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(StageFailurePolicy::Continue),
            "abort" => Ok(StageFailurePolicy::Abort),
            other => Err(format!(
                "Invalid stage failure policy: {}. Expected continue or abort",
                other
            )),
        }
    }
}

impl fmt::Display for StageFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageFailurePolicy::Continue => write!(f, "continue"),
            StageFailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub policy: StageFailurePolicy,
    /// Extra attempts after a failed completion call; schema violations are
    /// never retried
    pub completion_retries: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            policy: StageFailurePolicy::Continue,
            completion_retries: 1,
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: StageFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_completion_retries(mut self, completion_retries: u32) -> Self {
        self.completion_retries = completion_retries;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
