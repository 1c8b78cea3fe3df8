//! Video record store for Selg.
//!
//! Holds one record per processed video so later runs can skip acquisition
//! and transcription and reuse the stored transcript.

mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One processed video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    /// Transcript text from the run that produced this record.
    pub transcript: String,
    /// Where the transcript file was written.
    pub transcript_path: String,
    pub analyzed_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Create a record stamped with the current time.
    pub fn new(video_id: &str, transcript: &str, transcript_path: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            transcript: transcript.to_string(),
            transcript_path: transcript_path.to_string(),
            analyzed_at: Utc::now(),
        }
    }
}

/// Trait for video record stores.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record for a video, if one exists.
    async fn lookup(&self, video_id: &str) -> Result<Option<VideoRecord>>;

    /// Insert or replace the record for a video.
    async fn save(&self, record: &VideoRecord) -> Result<()>;

    /// All records, most recently analyzed first.
    async fn list(&self) -> Result<Vec<VideoRecord>>;
}
