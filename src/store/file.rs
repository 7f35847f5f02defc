use super::{RecordStore, StoreError};
use crate::report::{FieldUpdate, IdeaRecord, RecordId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Record store keeping one pretty-printed JSON document per record
///
/// Documents live at `<dir>/<id>.json` and are replaced atomically (write to a
/// temporary file, then rename), so a reader never observes a half-written
/// record.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (and creates, if needed) the store directory
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        info!(dir = %dir.display(), "Opened file record store");

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn read(&self, id: &RecordId) -> Result<Option<IdeaRecord>, StoreError> {
        let path = self.record_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Serialization { path, source })
    }

    async fn write(&self, record: &IdeaRecord) -> Result<(), StoreError> {
        let path = self.record_path(&record.id);
        let tmp_path = path.with_extension("json.tmp");

        let content =
            serde_json::to_string_pretty(record).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?;

        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|source| StoreError::Io { path, source })?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn create_record(
        &self,
        idea: &str,
        worklab: Option<&str>,
    ) -> Result<IdeaRecord, StoreError> {
        let record = IdeaRecord::new(idea, worklab.map(str::to_string));
        let _guard = self.write_lock.lock().await;
        self.write(&record).await?;
        debug!(record_id = %record.id, "Created record file");
        Ok(record)
    }

    async fn update_field(&self, id: &RecordId, update: FieldUpdate) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read(id).await?.ok_or(StoreError::NotFound(*id))?;
        debug!(record_id = %id, field = update.field_name(), "Updating record file");
        update.apply(&mut record);
        self.write(&record).await
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<IdeaRecord>, StoreError> {
        self.read(id).await
    }

    fn name(&self) -> &str {
        "file"
    }
}
