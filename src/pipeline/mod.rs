//! The four-stage analysis pipeline.
//!
//! A single [`PipelineEnvelope`] flows through acquisition, transcription,
//! extraction, and persistence in that order. Stages only add to the
//! envelope; whether the run is fresh or served from a stored record is
//! decided once, at entry, and never revisited.

mod acquire;
mod extract;
mod persist;
mod transcribe;

use crate::analysis::{ScriptAnalysis, Summary};
use crate::config::{Prompts, Settings};
use crate::error::{Result, SelgError};
use crate::extraction::{OpenAiExtractor, ScriptExtractor};
use crate::source::{parse_input, VideoSource, YoutubeSource};
use crate::store::{RecordStore, SqliteRecordStore};
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::workspace::Workspace;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// How the entry lookup classified this run.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordStatus {
    /// No stored record; every stage does real work.
    Fresh,
    /// A prior run already transcribed this video.
    Cached {
        transcript: String,
        transcript_path: String,
    },
}

/// State accumulated as a video moves through the stages.
#[derive(Debug)]
pub struct PipelineEnvelope {
    pub video_id: String,
    pub record: RecordStatus,
    /// Video title, known only after a fresh format resolution.
    pub title: Option<String>,
    /// Local audio file, present only after a fresh download.
    pub video_file: Option<PathBuf>,
    pub transcript: Option<String>,
    pub transcript_file: Option<PathBuf>,
    pub video_file_deleted: bool,
    pub analysis: Option<ScriptAnalysis>,
}

impl PipelineEnvelope {
    pub fn new(video_id: &str, record: RecordStatus) -> Self {
        Self {
            video_id: video_id.to_string(),
            record,
            title: None,
            video_file: None,
            transcript: None,
            transcript_file: None,
            video_file_deleted: false,
            analysis: None,
        }
    }

    /// Whether this run reuses a stored transcript.
    pub fn is_cached(&self) -> bool {
        matches!(self.record, RecordStatus::Cached { .. })
    }
}

/// Result of a completed pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub video_id: String,
    /// Title from format resolution; None on cached runs.
    pub title: Option<String>,
    /// Whether the transcript came from a stored record.
    pub cached: bool,
    pub transcript: String,
    pub analysis: ScriptAnalysis,
    pub artifact_path: PathBuf,
    pub summary: Summary,
}

/// Sequential orchestrator over the four stages.
pub struct Pipeline {
    settings: Settings,
    source: Arc<dyn VideoSource>,
    transcriber: Arc<dyn Transcriber>,
    extractor: Arc<dyn ScriptExtractor>,
    store: Arc<dyn RecordStore>,
    workspace: Workspace,
}

impl Pipeline {
    /// Create a pipeline with the default providers.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let source = Arc::new(YoutubeSource::new());
        let transcriber = Arc::new(WhisperTranscriber::with_model(&settings.transcription.model));
        let extractor = Arc::new(OpenAiExtractor::with_config(
            &settings.extraction.model,
            settings.extraction.temperature,
            prompts,
        ));
        let store = Arc::new(SqliteRecordStore::new(&settings.sqlite_path())?);
        let workspace = Workspace::from_settings(&settings);

        Ok(Self {
            settings,
            source,
            transcriber,
            extractor,
            store,
            workspace,
        })
    }

    /// Create a pipeline with custom providers.
    pub fn with_components(
        settings: Settings,
        source: Arc<dyn VideoSource>,
        transcriber: Arc<dyn Transcriber>,
        extractor: Arc<dyn ScriptExtractor>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let workspace = Workspace::from_settings(&settings);
        Self {
            settings,
            source,
            transcriber,
            extractor,
            store,
            workspace,
        }
    }

    /// Get a reference to the record store.
    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Analyze a video: acquire audio, transcribe, extract, persist.
    ///
    /// `input` may be a full video URL or a bare video id. With `force`,
    /// any stored record is ignored and the video is re-acquired.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn run(&self, input: &str, force: bool) -> Result<PipelineOutcome> {
        let video_id = parse_input(input)
            .ok_or_else(|| SelgError::InvalidInput(format!("Could not parse input: {}", input)))?;

        let record = if force {
            RecordStatus::Fresh
        } else {
            match self.store.lookup(&video_id).await? {
                Some(prior) => {
                    info!("Found stored record for {}", video_id);
                    RecordStatus::Cached {
                        transcript: prior.transcript,
                        transcript_path: prior.transcript_path,
                    }
                }
                None => RecordStatus::Fresh,
            }
        };

        let envelope = PipelineEnvelope::new(&video_id, record);
        let envelope = acquire::run(self.source.as_ref(), &self.workspace, envelope).await?;
        let envelope = transcribe::run(
            self.transcriber.as_ref(),
            self.store.as_ref(),
            &self.workspace,
            self.settings.transcription.punctuate,
            envelope,
        )
        .await?;
        let envelope = extract::run(self.extractor.as_ref(), envelope).await?;
        persist::run(&self.workspace, envelope).await
    }
}
