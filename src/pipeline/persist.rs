//! Persistence stage: write the analysis artifact and derive the summary.

use crate::analysis::{AnalysisArtifact, Summary};
use crate::error::{Result, SelgError};
use crate::pipeline::{PipelineEnvelope, PipelineOutcome, RecordStatus};
use crate::workspace::Workspace;
use tracing::{info, instrument};

#[instrument(skip_all, fields(video_id = %envelope.video_id))]
pub(crate) async fn run(
    workspace: &Workspace,
    envelope: PipelineEnvelope,
) -> Result<PipelineOutcome> {
    let PipelineEnvelope {
        video_id,
        record,
        title,
        transcript,
        transcript_file,
        analysis,
        ..
    } = envelope;

    let transcript = transcript.ok_or_else(|| SelgError::EmptyTranscript(video_id.clone()))?;
    let analysis = analysis.ok_or_else(|| {
        SelgError::SchemaValidation("no validated analysis to persist".to_string())
    })?;

    let transcript_source = transcript_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let artifact = AnalysisArtifact::new(&video_id, &transcript_source, analysis);
    let analysis_dir = workspace.ensure_analysis_dir()?;
    let artifact_path = artifact.write_to(analysis_dir)?;
    info!("Wrote analysis artifact to {}", artifact_path.display());

    let summary = Summary::derive(&artifact.vsl_script);

    Ok(PipelineOutcome {
        video_id,
        title,
        cached: matches!(record, RecordStatus::Cached { .. }),
        transcript,
        analysis: artifact.vsl_script,
        artifact_path,
        summary,
    })
}
