//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::error::{Result, SelgError};
use crate::openai::create_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// Style prompt nudging Whisper toward punctuated, cased output.
///
/// Whisper mirrors the style of its prompt, so a fully punctuated sample
/// sentence is how punctuation restoration is requested.
const PUNCTUATION_PROMPT: &str =
    "Hello, and welcome. This transcript uses full punctuation, capitalization, \
     and complete sentences.";

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with the default model.
    pub fn new() -> Self {
        Self::with_model("whisper-1")
    }

    /// Create a new Whisper transcriber with a custom model.
    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path, punctuate: bool) -> Result<String> {
        debug!("Transcribing audio file with {}", self.model);

        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.webm")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json);

        if punctuate {
            request_builder.prompt(PUNCTUATION_PROMPT);
        }

        let request = request_builder
            .build()
            .map_err(|e| SelgError::OpenAI(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| SelgError::OpenAI(format!("Whisper API error: {}", e)))?;

        debug!("Transcribed {} characters", response.text.len());
        Ok(response.text)
    }
}
