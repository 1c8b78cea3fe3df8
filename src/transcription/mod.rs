//! Transcription module for Selg.
//!
//! Converts a local audio file into plain transcript text via an external
//! speech-recognition provider.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for speech-to-text providers.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a local audio file to plain text.
    ///
    /// When `punctuate` is set, the provider is asked to restore
    /// punctuation and casing in the output.
    async fn transcribe(&self, audio_path: &Path, punctuate: bool) -> Result<String>;
}
