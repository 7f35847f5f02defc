//! Rendering of validation reports for the terminal

use crate::pipeline::ValidationReport;
use crate::report::{FeatureRoadmap, MarketSnapshot, SprintPlan};
use anyhow::{Context, Result};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The record as served by the HTTP API
    Json,
    /// Indented plain-text summary
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
    pretty: bool,
}

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Indent JSON output; ignored for the human format
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json if self.pretty => serde_json::to_string_pretty(report)
                .context("Failed to serialize validation report to JSON"),
            OutputFormat::Json => {
                serde_json::to_string(report).context("Failed to serialize validation report to JSON")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &ValidationReport) -> String {
        let record = &report.record;
        let mut out = String::new();

        if report.is_complete() {
            out.push_str("\u{2713} Idea Validation Report\n");
        } else {
            out.push_str("\u{26A0} Idea Validation Report (partial)\n");
        }
        let _ = writeln!(out, "{}\n", RULE);
        let _ = writeln!(out, "Idea:     {}", record.idea);
        if let Some(ref worklab) = record.worklab {
            let _ = writeln!(out, "Worklab:  {}", worklab);
        }
        let _ = writeln!(out, "Record:   {}\n", record.id);

        match &record.market_snapshot {
            Some(snapshot) => render_market(&mut out, snapshot),
            None => out.push_str("Market Snapshot: (not available)\n"),
        }
        out.push('\n');

        match &record.feature_roadmap {
            Some(roadmap) => render_roadmap(&mut out, roadmap),
            None => out.push_str("Feature Roadmap: (not available)\n"),
        }
        out.push('\n');

        match &record.agile_sprint_plan {
            Some(plan) => render_sprints(&mut out, plan),
            None => out.push_str("Sprint Plan: (not available)\n"),
        }

        if !report.failed_stages.is_empty() {
            out.push_str("\nFailed Stages:\n");
            for failure in &report.failed_stages {
                let _ = writeln!(
                    out,
                    "  \u{2717} {} ({}): {}",
                    failure.stage, failure.kind, failure.message
                );
            }
        }

        out
    }
}

fn render_list(out: &mut String, indent: &str, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        let connector = if i + 1 == items.len() { "\u{2514}" } else { "\u{251C}" };
        let _ = writeln!(out, "{}{}\u{2500} {}", indent, connector, item);
    }
}

fn render_market(out: &mut String, snapshot: &MarketSnapshot) {
    out.push_str("Market Snapshot:\n");
    let _ = writeln!(out, "  Total Addressable Market: {}", snapshot.total_addressable_market);
    out.push_str("  Trends:\n");
    render_list(out, "    ", &snapshot.trends);
    out.push_str("  Customer Segments:\n");
    for segment in &snapshot.customer_segments {
        let _ = writeln!(out, "    {}", segment.segment);
        render_list(out, "      ", &segment.pain_points);
    }
}

fn render_roadmap(out: &mut String, roadmap: &FeatureRoadmap) {
    out.push_str("Feature Roadmap:\n");
    out.push_str("  MVP:\n");
    render_list(out, "    ", &roadmap.mvp_features);
    for stage in &roadmap.versioned_features {
        let _ = writeln!(out, "  {}:", stage.version);
        render_list(out, "    ", &stage.features);
    }
    out.push_str("  Stretch Goals:\n");
    render_list(out, "    ", &roadmap.stretch_goals);
}

fn render_sprints(out: &mut String, plan: &SprintPlan) {
    let _ = writeln!(out, "Sprint Plan ({} sprints):", plan.len());
    for sprint in plan.sprints() {
        let rice = &sprint.rice;
        let _ = writeln!(
            out,
            "  {}  [R {} | I {} | C {} | E {}]",
            sprint.sprint, rice.reach, rice.impact, rice.confidence, rice.effort
        );
        let stories: Vec<String> = sprint
            .user_stories
            .iter()
            .map(|s| format!("[{}] {}", s.priority, s.story))
            .collect();
        render_list(out, "    ", &stories);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Stage, StageFailure};
    use crate::report::{CustomerSegment, IdeaRecord};

    fn partial_report() -> ValidationReport {
        let mut record = IdeaRecord::new("Meal kit for climbers", Some("lab-2".to_string()));
        record.market_snapshot = Some(MarketSnapshot {
            total_addressable_market: "$3B outdoor nutrition".to_string(),
            trends: vec!["Bouldering gyms".to_string(), "High-protein snacks".to_string()],
            customer_segments: vec![CustomerSegment {
                segment: "Gym climbers".to_string(),
                pain_points: vec!["No time to cook".to_string()],
            }],
        });

        ValidationReport {
            record,
            failed_stages: vec![StageFailure {
                stage: Stage::Roadmap,
                kind: "schema_violation".to_string(),
                message: "mvpFeatures must contain at least one entry".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_output() {
        let report = partial_report();

        let compact = OutputFormatter::new(OutputFormat::Json)
            .format_report(&report)
            .unwrap();
        assert!(!compact.contains('\n'));

        let pretty = OutputFormatter::new(OutputFormat::Json)
            .with_pretty(true)
            .format_report(&report)
            .unwrap();
        assert!(pretty.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(value["idea"], "Meal kit for climbers");
        assert_eq!(value["failedStages"][0]["kind"], "schema_violation");
    }

    #[test]
    fn test_human_output() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_report(&partial_report())
            .unwrap();

        assert!(output.contains("(partial)"));
        assert!(output.contains("Worklab:  lab-2"));
        assert!(output.contains("$3B outdoor nutrition"));
        assert!(output.contains("Gym climbers"));
        assert!(output.contains("Feature Roadmap: (not available)"));
        assert!(output.contains("roadmap (schema_violation)"));
    }
}
