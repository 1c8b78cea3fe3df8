//! Transcription stage: turn the local audio file into a persisted
//! transcript and release the audio scratch file.

use crate::error::{Result, SelgError};
use crate::pipeline::{PipelineEnvelope, RecordStatus};
use crate::store::{RecordStore, VideoRecord};
use crate::transcription::Transcriber;
use crate::workspace::Workspace;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[instrument(skip_all, fields(video_id = %envelope.video_id))]
pub(crate) async fn run(
    transcriber: &dyn Transcriber,
    store: &dyn RecordStore,
    workspace: &Workspace,
    punctuate: bool,
    mut envelope: PipelineEnvelope,
) -> Result<PipelineEnvelope> {
    let cached = match &envelope.record {
        RecordStatus::Cached {
            transcript,
            transcript_path,
        } => Some((transcript.clone(), transcript_path.clone())),
        RecordStatus::Fresh => None,
    };

    if let Some((transcript, transcript_path)) = cached {
        info!("Reusing stored transcript from {}", transcript_path);
        // A stored transcript gets the same validation as a fresh one.
        if transcript.trim().is_empty() {
            return Err(SelgError::EmptyTranscript(envelope.video_id.clone()));
        }
        envelope.transcript = Some(transcript);
        envelope.transcript_file = Some(PathBuf::from(transcript_path));
        envelope.video_file_deleted = true;
        return Ok(envelope);
    }

    let audio_path = envelope
        .video_file
        .clone()
        .ok_or_else(|| SelgError::MissingInputFile(envelope.video_id.clone()))?;

    info!("Transcribing {}", audio_path.display());
    let transcript = transcriber
        .transcribe(&audio_path, punctuate)
        .await
        .map_err(|e| SelgError::TranscriptionFailed {
            video_id: envelope.video_id.clone(),
            reason: e.to_string(),
        })?;

    let base = audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let transcript_dir = workspace.ensure_transcript_dir()?;
    let transcript_path = transcript_dir.join(format!("{}_transcript.txt", base));
    std::fs::write(&transcript_path, &transcript)?;
    info!("Wrote transcript to {}", transcript_path.display());

    // The audio file is scratch; a failed delete is logged, not fatal.
    match std::fs::remove_file(&audio_path) {
        Ok(()) => envelope.video_file_deleted = true,
        Err(e) => warn!(
            "Failed to delete audio file {}: {}",
            audio_path.display(),
            e
        ),
    }

    if transcript.trim().is_empty() {
        return Err(SelgError::EmptyTranscript(envelope.video_id.clone()));
    }

    // Record the run so the next invocation can skip acquisition. A failed
    // save costs a re-download later, nothing more.
    let record = VideoRecord::new(
        &envelope.video_id,
        &transcript,
        &transcript_path.display().to_string(),
    );
    if let Err(e) = store.save(&record).await {
        warn!(
            "Failed to store record for {}: {}",
            envelope.video_id, e
        );
    }

    envelope.transcript = Some(transcript);
    envelope.transcript_file = Some(transcript_path);
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use async_trait::async_trait;
    use std::path::Path;

    struct FixedTranscriber {
        text: String,
    }

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio_path: &Path, _punctuate: bool) -> Result<String> {
            Ok(self.text.clone())
        }
    }

    fn workspace(root: &Path) -> Workspace {
        Workspace::new(
            root.join("audio"),
            root.join("transcripts"),
            root.join("analysis"),
        )
    }

    #[tokio::test]
    async fn test_fresh_transcript_is_persisted_and_audio_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = workspace(tmp.path());
        let store = MemoryRecordStore::new();
        let transcriber = FixedTranscriber {
            text: "Act now.".to_string(),
        };

        let audio_path = ws.ensure_audio_dir().unwrap().join("Demo_abc123.webm");
        std::fs::write(&audio_path, b"bytes").unwrap();

        let mut envelope = PipelineEnvelope::new("abc123", RecordStatus::Fresh);
        envelope.video_file = Some(audio_path.clone());

        let envelope = run(&transcriber, &store, &ws, true, envelope).await.unwrap();

        assert!(envelope.video_file_deleted);
        assert!(!audio_path.exists());

        let transcript_path = envelope.transcript_file.unwrap();
        assert!(transcript_path.starts_with(ws.transcript_dir()));
        assert_eq!(
            transcript_path.file_name().unwrap().to_str().unwrap(),
            "Demo_abc123_transcript.txt"
        );
        assert_eq!(std::fs::read_to_string(&transcript_path).unwrap(), "Act now.");

        let record = store.lookup("abc123").await.unwrap().unwrap();
        assert_eq!(record.transcript, "Act now.");
    }

    #[tokio::test]
    async fn test_unremovable_audio_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = workspace(tmp.path());
        let store = MemoryRecordStore::new();
        let transcriber = FixedTranscriber {
            text: "Still works.".to_string(),
        };

        // Points at a file that never existed, so the delete fails.
        let mut envelope = PipelineEnvelope::new("abc123", RecordStatus::Fresh);
        envelope.video_file = Some(tmp.path().join("ghost.webm"));

        let envelope = run(&transcriber, &store, &ws, true, envelope).await.unwrap();

        assert!(!envelope.video_file_deleted);
        assert_eq!(envelope.transcript.as_deref(), Some("Still works."));
    }
}
