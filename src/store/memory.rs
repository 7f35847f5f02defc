use super::{RecordStore, StoreError};
use crate::report::{FieldUpdate, IdeaRecord, RecordId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local record store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<RecordId, IdeaRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn create_record(
        &self,
        idea: &str,
        worklab: Option<&str>,
    ) -> Result<IdeaRecord, StoreError> {
        let record = IdeaRecord::new(idea, worklab.map(str::to_string));
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        debug!(record_id = %record.id, "Created record");
        Ok(record)
    }

    async fn update_field(&self, id: &RecordId, update: FieldUpdate) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        debug!(record_id = %id, field = update.field_name(), "Updating record field");
        update.apply(record);
        Ok(())
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<IdeaRecord>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
