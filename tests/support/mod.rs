//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use ideaforge::llm::{MockLLMClient, MockResponse};
use ideaforge::report::{FieldUpdate, IdeaRecord, RecordId};
use ideaforge::store::{InMemoryStore, RecordStore, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;

pub const FOOD_DELIVERY_IDEA: &str = "AI-powered food delivery optimization platform";

pub fn market_payload() -> Value {
    json!({
        "totalAddressableMarket": "$150B global online food delivery market",
        "trends": [
            "Dark kitchens expanding in urban areas",
            "Demand for sub-30-minute delivery",
            "Route optimization with real-time traffic data"
        ],
        "customerSegments": [
            {
                "segment": "Independent restaurants",
                "painPoints": ["High aggregator commissions", "Unpredictable courier availability"]
            },
            {
                "segment": "Delivery fleet operators",
                "painPoints": ["Idle courier time between orders"]
            }
        ]
    })
}

pub fn roadmap_payload() -> Value {
    json!({
        "mvpFeatures": ["Order batching", "Live courier tracking", "Restaurant dashboard"],
        "versionedFeatures": [
            {"version": "v1.1", "features": ["Demand forecasting"]},
            {"version": "v2.0", "features": ["Dynamic pricing", "Multi-city support"]}
        ],
        "stretchGoals": ["Autonomous drone handoff"]
    })
}

pub fn sprint_list() -> Value {
    let sprints: Vec<Value> = (1..=7)
        .map(|n| {
            json!({
                "sprint": format!("Sprint {}", n),
                "userStories": [
                    {"story": format!("As a dispatcher I can review batch {} before it ships", n), "priority": "High"},
                    {"story": "As a restaurant I see the courier ETA", "priority": "Medium"}
                ],
                "rice": {"reach": "2000 orders/week", "impact": "2", "confidence": "80%", "effort": "3 weeks"}
            })
        })
        .collect();
    Value::Array(sprints)
}

pub fn sprint_payload() -> Value {
    json!({ "sprints": sprint_list() })
}

/// Mock returning schema-valid, fenced payloads for the three stages in order
pub fn canned_client() -> Arc<MockLLMClient> {
    let mock = Arc::new(MockLLMClient::new());
    mock.add_responses([
        MockResponse::fenced_json(&market_payload()),
        MockResponse::fenced_json(&roadmap_payload()),
        MockResponse::fenced_json(&sprint_payload()),
    ]);
    mock
}

/// Store whose updates to one field always fail
pub struct FailingStore {
    inner: InMemoryStore,
    failing_field: &'static str,
    fail_create: bool,
}

impl FailingStore {
    pub fn failing_updates(failing_field: &'static str) -> Self {
        Self {
            inner: InMemoryStore::new(),
            failing_field,
            fail_create: false,
        }
    }

    pub fn failing_create() -> Self {
        Self {
            inner: InMemoryStore::new(),
            failing_field: "",
            fail_create: true,
        }
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn create_record(
        &self,
        idea: &str,
        worklab: Option<&str>,
    ) -> Result<IdeaRecord, StoreError> {
        if self.fail_create {
            return Err(StoreError::Unavailable("store is read-only".to_string()));
        }
        self.inner.create_record(idea, worklab).await
    }

    async fn update_field(&self, id: &RecordId, update: FieldUpdate) -> Result<(), StoreError> {
        if update.field_name() == self.failing_field {
            return Err(StoreError::Unavailable(format!(
                "cannot write {}",
                self.failing_field
            )));
        }
        self.inner.update_field(id, update).await
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<IdeaRecord>, StoreError> {
        self.inner.get_record(id).await
    }

    fn name(&self) -> &str {
        "failing"
    }
}
