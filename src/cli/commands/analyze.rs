//! Analyze command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the analyze command.
pub async fn run_analyze(input: &str, force: bool, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Analyze) {
        Output::error(&format!("{}", e));
        Output::info("Run 'selg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!("Analyzing: {}", input));

    let pipeline = Pipeline::new(settings)?;

    match pipeline.run(input, force).await {
        Ok(outcome) => {
            if outcome.cached {
                Output::info("Using the stored transcript (pass --force to re-download).");
            }

            Output::header("Script structure");
            for section in &outcome.analysis.sections {
                Output::list_item(&format!(
                    "{} [{} / {}]",
                    section.title, section.purpose, section.tone
                ));
            }

            let summary = &outcome.summary;
            let purposes: Vec<&str> = summary.purposes.iter().map(|p| p.as_str()).collect();
            let tones: Vec<&str> = summary.top_tones.iter().map(|t| t.as_str()).collect();

            println!();
            if let Some(title) = &outcome.title {
                Output::kv("Title", title);
            }
            Output::kv("Sections", &summary.total_sections.to_string());
            Output::kv("Purposes", &purposes.join(", "));
            Output::kv("Top tones", &tones.join(", "));
            Output::kv("Rating", &format!("{}/10", summary.overall_rating));
            Output::kv("Artifact", &outcome.artifact_path.display().to_string());

            println!();
            Output::success(&format!("Analysis for '{}' complete.", outcome.video_id));
        }
        Err(e) => {
            Output::error(&format!("Failed to analyze: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
