//! Filesystem areas the pipeline writes into.
//!
//! All directory creation happens here so stages can assume their target
//! directory exists once the corresponding `ensure_*` call returns.

use crate::config::Settings;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Scratch and output directories for a pipeline run.
///
/// Audio is scratch space (files are deleted after transcription);
/// transcripts and analyses are durable outputs.
#[derive(Debug, Clone)]
pub struct Workspace {
    audio_dir: PathBuf,
    transcript_dir: PathBuf,
    analysis_dir: PathBuf,
}

impl Workspace {
    /// Create a workspace over explicit directories.
    pub fn new(audio_dir: PathBuf, transcript_dir: PathBuf, analysis_dir: PathBuf) -> Self {
        Self {
            audio_dir,
            transcript_dir,
            analysis_dir,
        }
    }

    /// Create a workspace from configured (tilde-expanded) paths.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.audio_dir(),
            settings.transcript_dir(),
            settings.analysis_dir(),
        )
    }

    /// Directory for downloaded audio, created if absent.
    pub fn ensure_audio_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.audio_dir)?;
        Ok(&self.audio_dir)
    }

    /// Directory for transcript text files, created if absent.
    pub fn ensure_transcript_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.transcript_dir)?;
        Ok(&self.transcript_dir)
    }

    /// Directory for analysis artifacts, created if absent.
    pub fn ensure_analysis_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.analysis_dir)?;
        Ok(&self.analysis_dir)
    }

    /// The audio directory path, without creating it.
    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// The transcript directory path, without creating it.
    pub fn transcript_dir(&self) -> &Path {
        &self.transcript_dir
    }

    /// The analysis directory path, without creating it.
    pub fn analysis_dir(&self) -> &Path {
        &self.analysis_dir
    }
}
