//! Extraction stage: turn the transcript into a validated script analysis.

use crate::error::{Result, SelgError};
use crate::extraction::ScriptExtractor;
use crate::pipeline::PipelineEnvelope;
use tracing::{info, instrument};

#[instrument(skip_all, fields(video_id = %envelope.video_id))]
pub(crate) async fn run(
    extractor: &dyn ScriptExtractor,
    mut envelope: PipelineEnvelope,
) -> Result<PipelineEnvelope> {
    let transcript = envelope
        .transcript
        .as_deref()
        .ok_or_else(|| SelgError::EmptyTranscript(envelope.video_id.clone()))?;

    info!("Extracting script analysis");
    let analysis = extractor.extract(transcript).await?;
    info!(
        "Extracted {} sections (overall rating {})",
        analysis.sections.len(),
        analysis.effectiveness.overall_rating
    );

    envelope.analysis = Some(analysis);
    Ok(envelope)
}
