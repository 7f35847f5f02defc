use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three AI-driven analyses run for every idea, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Market,
    Roadmap,
    Sprint,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Market, Stage::Roadmap, Stage::Sprint];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Market => "market",
            Stage::Roadmap => "roadmap",
            Stage::Sprint => "sprint",
        }
    }

    /// Record field the stage populates
    pub fn field_name(&self) -> &'static str {
        match self {
            Stage::Market => "marketSnapshot",
            Stage::Roadmap => "featureRoadmap",
            Stage::Sprint => "agileSprintPlan",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
