//! Error types for Selg.

use thiserror::Error;

/// Library-level error type for Selg operations.
///
/// Pipeline failures are fatal: a stage surfaces one of these and the
/// remaining stages never run. There is no retry layer.
#[derive(Error, Debug)]
pub enum SelgError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video source error: {0}")]
    VideoSource(String),

    #[error("No audio-only stream available for video '{0}'")]
    NoAudioAvailable(String),

    #[error("Audio acquisition failed for video '{video_id}': {reason}")]
    AcquisitionFailed { video_id: String, reason: String },

    #[error("No local audio file to transcribe for video '{0}'")]
    MissingInputFile(String),

    #[error("Transcription failed for video '{video_id}': {reason}")]
    TranscriptionFailed { video_id: String, reason: String },

    #[error("Transcript for video '{0}' is empty")]
    EmptyTranscript(String),

    #[error("Model response violates the analysis schema: {0}")]
    SchemaValidation(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Selg operations.
pub type Result<T> = std::result::Result<T, SelgError>;
