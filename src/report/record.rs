//! The persisted idea record

use super::schema::{FeatureRoadmap, MarketSnapshot, SprintPlan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier assigned to a record at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One validation request and the results accumulated for it
///
/// Created with `idea` and `worklab` only; each stage later fills in its own
/// field. The three result fields stay `None` until their stage succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub idea: String,
    pub worklab: Option<String>,
    pub market_snapshot: Option<MarketSnapshot>,
    pub feature_roadmap: Option<FeatureRoadmap>,
    pub agile_sprint_plan: Option<SprintPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaRecord {
    pub fn new(idea: impl Into<String>, worklab: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            idea: idea.into(),
            worklab,
            market_snapshot: None,
            feature_roadmap: None,
            agile_sprint_plan: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of stage fields that hold a result
    pub fn populated_fields(&self) -> usize {
        [
            self.market_snapshot.is_some(),
            self.feature_roadmap.is_some(),
            self.agile_sprint_plan.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    pub fn is_complete(&self) -> bool {
        self.populated_fields() == 3
    }
}

/// A partial update naming exactly one stage field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    MarketSnapshot(MarketSnapshot),
    FeatureRoadmap(FeatureRoadmap),
    AgileSprintPlan(SprintPlan),
}

impl FieldUpdate {
    /// Document field name the update writes
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::MarketSnapshot(_) => "marketSnapshot",
            FieldUpdate::FeatureRoadmap(_) => "featureRoadmap",
            FieldUpdate::AgileSprintPlan(_) => "agileSprintPlan",
        }
    }

    /// Writes the named field, leaving every other field untouched
    pub fn apply(self, record: &mut IdeaRecord) {
        match self {
            FieldUpdate::MarketSnapshot(value) => record.market_snapshot = Some(value),
            FieldUpdate::FeatureRoadmap(value) => record.feature_roadmap = Some(value),
            FieldUpdate::AgileSprintPlan(value) => record.agile_sprint_plan = Some(value),
        }
        record.updated_at = Utc::now();
    }
}
