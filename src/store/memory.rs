//! In-memory record store for tests.

use crate::error::Result;
use crate::store::{RecordStore, VideoRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Record store that keeps everything in a HashMap. Not persistent.
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, VideoRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn lookup(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(video_id).cloned())
    }

    async fn save(&self, record: &VideoRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(record.video_id.clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<VideoRecord>> {
        let records = self.records.read().unwrap();
        let mut all: Vec<VideoRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
        Ok(all)
    }
}
