//! SQLite-backed record store.

use crate::error::{Result, SelgError};
use crate::store::{RecordStore, VideoRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Persistent record store backed by a local SQLite database.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at the given path.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::init_schema(&conn)?;

        info!("Opened record store at {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS videos (
                video_id TEXT PRIMARY KEY,
                transcript TEXT NOT NULL,
                transcript_path TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SelgError::Store(format!("Failed to acquire database lock: {}", e)))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn lookup(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        let conn = self.lock_conn()?;

        let result = conn.query_row(
            "SELECT video_id, transcript, transcript_path, analyzed_at
             FROM videos WHERE video_id = ?1",
            [video_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match result {
            Ok((video_id, transcript, transcript_path, analyzed_at)) => {
                let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());
                Ok(Some(VideoRecord {
                    video_id,
                    transcript,
                    transcript_path,
                    analyzed_at,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, record: &VideoRecord) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO videos (video_id, transcript, transcript_path, analyzed_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                record.video_id,
                record.transcript,
                record.transcript_path,
                record.analyzed_at.to_rfc3339(),
            ],
        )?;

        debug!("Saved record for video {}", record.video_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<VideoRecord>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            "SELECT video_id, transcript, transcript_path, analyzed_at
             FROM videos ORDER BY analyzed_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (video_id, transcript, transcript_path, analyzed_at) = row?;
            let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            records.push(VideoRecord {
                video_id,
                transcript,
                transcript_path,
                analyzed_at,
            });
        }

        Ok(records)
    }
}
