//! Stage payload data structures
//!
//! This module defines the three documents the model generates for an idea:
//! a market snapshot, a feature roadmap and an agile sprint plan. Every field
//! is required and must be populated; `validate()` enforces what serde's type
//! checks cannot (empty strings, empty lists).

use anyhow::{Context, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A document produced by one pipeline stage
pub trait StageOutput: DeserializeOwned + Serialize + Send + Sized {
    /// Checks every required field is populated
    fn validate(&self) -> Result<()>;
}

/// Parses sanitized model output into a typed, validated stage document
pub fn parse_stage_output<T: StageOutput>(json: &str) -> Result<T> {
    let parsed: T = serde_json::from_str(json).context("Response is not a valid document")?;
    parsed.validate()?;
    Ok(parsed)
}

fn ensure_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", field);
    }
    Ok(())
}

fn ensure_texts(values: &[String], field: &str) -> Result<()> {
    if values.is_empty() {
        anyhow::bail!("{} must contain at least one entry", field);
    }
    for (i, value) in values.iter().enumerate() {
        ensure_text(value, &format!("{}[{}]", field, i))?;
    }
    Ok(())
}

// RICE magnitudes are free text, but models like to answer with bare numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected text or number, got {}",
            other
        ))),
    }
}

/// Stage 1: market analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Description of the total addressable market
    pub total_addressable_market: String,
    /// Relevant market trends, most important first
    pub trends: Vec<String>,
    /// Target customer segments
    pub customer_segments: Vec<CustomerSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    /// Segment name
    pub segment: String,
    /// Pain points this segment has
    pub pain_points: Vec<String>,
}

impl StageOutput for MarketSnapshot {
    fn validate(&self) -> Result<()> {
        ensure_text(&self.total_addressable_market, "totalAddressableMarket")?;
        ensure_texts(&self.trends, "trends")?;

        if self.customer_segments.is_empty() {
            anyhow::bail!("customerSegments must contain at least one entry");
        }
        for (i, segment) in self.customer_segments.iter().enumerate() {
            ensure_text(&segment.segment, &format!("customerSegments[{}].segment", i))?;
            ensure_texts(
                &segment.pain_points,
                &format!("customerSegments[{}].painPoints", i),
            )?;
        }

        Ok(())
    }
}

/// Stage 2: feature roadmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRoadmap {
    /// Features required for a minimum viable product
    pub mvp_features: Vec<String>,
    /// Features grouped by the release that ships them
    pub versioned_features: Vec<VersionStage>,
    /// Nice-to-have features with no committed release
    pub stretch_goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStage {
    /// Release label, e.g. "v1.1"
    pub version: String,
    pub features: Vec<String>,
}

impl StageOutput for FeatureRoadmap {
    fn validate(&self) -> Result<()> {
        ensure_texts(&self.mvp_features, "mvpFeatures")?;

        if self.versioned_features.is_empty() {
            anyhow::bail!("versionedFeatures must contain at least one entry");
        }
        for (i, stage) in self.versioned_features.iter().enumerate() {
            ensure_text(&stage.version, &format!("versionedFeatures[{}].version", i))?;
            ensure_texts(&stage.features, &format!("versionedFeatures[{}].features", i))?;
        }

        ensure_texts(&self.stretch_goals, "stretchGoals")?;
        Ok(())
    }
}

/// User story priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub story: String,
    pub priority: Priority,
}

/// RICE prioritisation estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiceScore {
    #[serde(deserialize_with = "text_or_number")]
    pub reach: String,
    #[serde(deserialize_with = "text_or_number")]
    pub impact: String,
    #[serde(deserialize_with = "text_or_number")]
    pub confidence: String,
    #[serde(deserialize_with = "text_or_number")]
    pub effort: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// Sprint label, e.g. "Sprint 1"
    pub sprint: String,
    pub user_stories: Vec<UserStory>,
    pub rice: RiceScore,
}

/// Stage 3: ordered sprint plan
///
/// Serializes as a bare array. Deserializes from either a bare array or an
/// object wrapping the array under `sprints` (or `agileSprintPlan`).
#[derive(Debug, Clone, PartialEq)]
pub struct SprintPlan(pub Vec<Sprint>);

/// Number of sprints the sprint stage asks the model for
pub const REQUESTED_SPRINTS: usize = 7;

impl SprintPlan {
    pub fn sprints(&self) -> &[Sprint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SprintPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SprintPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Bare(Vec<Sprint>),
            Wrapped {
                #[serde(alias = "agileSprintPlan")]
                sprints: Vec<Sprint>,
            },
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Bare(sprints) => SprintPlan(sprints),
            Shape::Wrapped { sprints } => SprintPlan(sprints),
        })
    }
}

impl StageOutput for SprintPlan {
    fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            anyhow::bail!("Sprint plan must contain at least one sprint");
        }

        for (i, sprint) in self.0.iter().enumerate() {
            ensure_text(&sprint.sprint, &format!("sprints[{}].sprint", i))?;

            if sprint.user_stories.is_empty() {
                anyhow::bail!("sprints[{}].userStories must contain at least one entry", i);
            }
            for (j, story) in sprint.user_stories.iter().enumerate() {
                ensure_text(&story.story, &format!("sprints[{}].userStories[{}].story", i, j))?;
            }

            let rice = &sprint.rice;
            ensure_text(&rice.reach, &format!("sprints[{}].rice.reach", i))?;
            ensure_text(&rice.impact, &format!("sprints[{}].rice.impact", i))?;
            ensure_text(&rice.confidence, &format!("sprints[{}].rice.confidence", i))?;
            ensure_text(&rice.effort, &format!("sprints[{}].rice.effort", i))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market_json() -> serde_json::Value {
        json!({
            "totalAddressableMarket": "$150B global food delivery market",
            "trends": ["Dark kitchens", "Route optimisation with ML"],
            "customerSegments": [
                {"segment": "Restaurant chains", "painPoints": ["High courier costs"]}
            ]
        })
    }

    fn sprint_json(label: &str) -> serde_json::Value {
        json!({
            "sprint": label,
            "userStories": [{"story": "As a courier I see my next stop", "priority": "High"}],
            "rice": {"reach": "5000 users", "impact": "High", "confidence": "80%", "effort": "2 weeks"}
        })
    }

    #[test]
    fn test_market_snapshot_valid() {
        let snapshot: MarketSnapshot = parse_stage_output(&market_json().to_string()).unwrap();
        assert_eq!(snapshot.trends.len(), 2);
        assert_eq!(snapshot.customer_segments[0].pain_points, vec!["High courier costs"]);
    }

    #[test]
    fn test_market_snapshot_rejects_empty_fields() {
        let mut value = market_json();
        value["trends"] = json!([]);
        let err = parse_stage_output::<MarketSnapshot>(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("trends"));

        let mut value = market_json();
        value["totalAddressableMarket"] = json!("   ");
        assert!(parse_stage_output::<MarketSnapshot>(&value.to_string()).is_err());

        let mut value = market_json();
        value["customerSegments"][0]["painPoints"] = json!([]);
        let err = parse_stage_output::<MarketSnapshot>(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("customerSegments[0].painPoints"));
    }

    #[test]
    fn test_market_snapshot_rejects_missing_and_null_fields() {
        let value = json!({"totalAddressableMarket": "big", "trends": ["a"]});
        assert!(parse_stage_output::<MarketSnapshot>(&value.to_string()).is_err());

        let value = json!({"totalAddressableMarket": null, "trends": ["a"], "customerSegments": []});
        assert!(parse_stage_output::<MarketSnapshot>(&value.to_string()).is_err());
    }

    #[test]
    fn test_feature_roadmap_validation() {
        let value = json!({
            "mvpFeatures": ["Order tracking"],
            "versionedFeatures": [{"version": "v1.1", "features": ["Batching"]}],
            "stretchGoals": ["Drone delivery"]
        });
        let roadmap: FeatureRoadmap = parse_stage_output(&value.to_string()).unwrap();
        assert_eq!(roadmap.versioned_features[0].version, "v1.1");

        let mut empty_version = value.clone();
        empty_version["versionedFeatures"][0]["features"] = json!([]);
        assert!(parse_stage_output::<FeatureRoadmap>(&empty_version.to_string()).is_err());

        let mut no_stretch = value;
        no_stretch["stretchGoals"] = json!([]);
        assert!(parse_stage_output::<FeatureRoadmap>(&no_stretch.to_string()).is_err());
    }

    #[test]
    fn test_sprint_plan_accepts_bare_and_wrapped() {
        let bare = json!([sprint_json("Sprint 1"), sprint_json("Sprint 2")]);
        let plan: SprintPlan = parse_stage_output(&bare.to_string()).unwrap();
        assert_eq!(plan.len(), 2);

        let wrapped = json!({"sprints": [sprint_json("Sprint 1")]});
        let plan: SprintPlan = parse_stage_output(&wrapped.to_string()).unwrap();
        assert_eq!(plan.sprints()[0].sprint, "Sprint 1");

        // Always serializes back as a bare array
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!([sprint_json("Sprint 1")])
        );
    }

    #[test]
    fn test_sprint_plan_priority_and_numeric_rice() {
        let value = json!([{
            "sprint": "Sprint 1",
            "userStories": [{"story": "Login", "priority": "low"}],
            "rice": {"reach": 1200, "impact": 2, "confidence": 0.8, "effort": "3 weeks"}
        }]);
        let plan: SprintPlan = parse_stage_output(&value.to_string()).unwrap();
        let sprint = &plan.sprints()[0];
        assert_eq!(sprint.user_stories[0].priority, Priority::Low);
        assert_eq!(sprint.rice.reach, "1200");
        assert_eq!(sprint.rice.confidence, "0.8");
    }

    #[test]
    fn test_sprint_plan_rejects_invalid_entries() {
        assert!(parse_stage_output::<SprintPlan>("[]").is_err());

        let mut value = sprint_json("Sprint 1");
        value["userStories"][0]["priority"] = json!("Urgent");
        assert!(parse_stage_output::<SprintPlan>(&json!([value]).to_string()).is_err());

        let mut value = sprint_json("Sprint 1");
        value["rice"]["effort"] = json!("");
        let err = parse_stage_output::<SprintPlan>(&json!([value]).to_string()).unwrap_err();
        assert!(err.to_string().contains("rice.effort"));
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Priority::Medium.to_string(), "Medium");
    }
}
