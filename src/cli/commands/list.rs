//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let pipeline = Pipeline::new(settings)?;

    match pipeline.store().list().await {
        Ok(records) => {
            if records.is_empty() {
                Output::info("No videos analyzed yet. Use 'selg analyze <input>' to add one.");
            } else {
                Output::header(&format!("Analyzed Videos ({})", records.len()));
                println!();

                for record in &records {
                    Output::record_info(
                        &record.video_id,
                        &record.analyzed_at.format("%Y-%m-%d %H:%M").to_string(),
                        &record.transcript_path,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list videos: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
