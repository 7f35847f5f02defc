//! Idea validation report types

mod record;
pub mod schema;

pub use record::{FieldUpdate, IdeaRecord, RecordId};
pub use schema::{
    parse_stage_output, CustomerSegment, FeatureRoadmap, MarketSnapshot, Priority, RiceScore,
    Sprint, SprintPlan, StageOutput, UserStory, VersionStage, REQUESTED_SPRINTS,
};
