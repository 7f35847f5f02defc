//! Fixed instruction templates for the three stages
//!
//! The system prompt carries the schema. The user message carries the stage
//! instruction and the original idea text, and nothing produced by an earlier
//! stage.

use super::stage::Stage;
use crate::report::REQUESTED_SPRINTS;

pub const MARKET_SYSTEM_PROMPT: &str = r#"You are a senior market analyst validating early-stage business ideas.

Respond with a single JSON object and nothing else: no markdown, no comments, no explanation.

Schema:
{
  "totalAddressableMarket": "string - size and description of the total addressable market",
  "trends": ["string - a relevant market trend"],
  "customerSegments": [
    {
      "segment": "string - name of the customer segment",
      "painPoints": ["string - a concrete pain point of this segment"]
    }
  ]
}

Rules:
- Every field is required and must be populated.
- Empty strings, empty arrays and null values are not allowed.
- Provide at least three trends and at least two customer segments.
- Every customer segment has at least one pain point.
"#;

pub const ROADMAP_SYSTEM_PROMPT: &str = r#"You are an experienced product manager turning business ideas into feature roadmaps.

Respond with a single JSON object and nothing else: no markdown, no comments, no explanation.

Schema:
{
  "mvpFeatures": ["string - a feature required for the minimum viable product"],
  "versionedFeatures": [
    {
      "version": "string - release label, e.g. v1.1",
      "features": ["string - a feature shipped in this release"]
    }
  ],
  "stretchGoals": ["string - an ambitious feature with no committed release"]
}

Rules:
- Every field is required and must be populated.
- Empty strings, empty arrays and null values are not allowed.
- List releases in shipping order; every release has at least one feature.
"#;

pub const SPRINT_SYSTEM_PROMPT: &str = r#"You are an agile delivery lead planning the first sprints of a new product.

Respond with a single JSON object and nothing else: no markdown, no comments, no explanation.

Schema:
{
  "sprints": [
    {
      "sprint": "string - sprint label, e.g. Sprint 1",
      "userStories": [
        {
          "story": "string - user story in 'As a ..., I want ..., so that ...' form",
          "priority": "High" | "Medium" | "Low"
        }
      ],
      "rice": {
        "reach": "string - estimated reach",
        "impact": "string - estimated impact",
        "confidence": "string - confidence in the estimate",
        "effort": "string - estimated effort"
      }
    }
  ]
}

Rules:
- Every field is required and must be populated.
- Empty strings, empty arrays and null values are not allowed.
- Every sprint has at least one user story and a complete RICE estimate.
"#;

/// System prompt for a stage
pub fn system_prompt(stage: Stage) -> &'static str {
    match stage {
        Stage::Market => MARKET_SYSTEM_PROMPT,
        Stage::Roadmap => ROADMAP_SYSTEM_PROMPT,
        Stage::Sprint => SPRINT_SYSTEM_PROMPT,
    }
}

/// User message for a stage: a restated instruction followed by the idea
pub fn user_message(stage: Stage, idea: &str) -> String {
    let instruction = match stage {
        Stage::Market => "Analyze the market for the following business idea.".to_string(),
        Stage::Roadmap => "Create a feature roadmap for the following business idea.".to_string(),
        Stage::Sprint => format!(
            "Create an agile sprint plan with exactly {} sprints for the following business idea.",
            REQUESTED_SPRINTS
        ),
    };

    format!("{}\n\nBusiness idea:\n{}", instruction, idea)
}
