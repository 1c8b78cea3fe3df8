//! The persisted analysis artifact.
//!
//! One JSON document per analyzed video, written next to earlier runs and
//! overwritten wholesale on re-analysis.

use crate::analysis::{ScriptAnalysis, Section, SectionPurpose, SectionTone};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Provenance of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub video_id: String,
    pub analysis_date: DateTime<Utc>,
    /// Where the analyzed transcript lives on disk.
    pub transcript_source: String,
}

/// Frequency breakdowns over the script's sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub purpose_breakdown: BTreeMap<SectionPurpose, u32>,
    pub tone_breakdown: BTreeMap<SectionTone, u32>,
}

impl Statistics {
    /// Count purposes and tones in a single pass over the sections.
    pub fn from_sections(sections: &[Section]) -> Self {
        let mut purpose_breakdown = BTreeMap::new();
        let mut tone_breakdown = BTreeMap::new();
        for section in sections {
            *purpose_breakdown.entry(section.purpose).or_insert(0) += 1;
            *tone_breakdown.entry(section.tone).or_insert(0) += 1;
        }
        Self {
            purpose_breakdown,
            tone_breakdown,
        }
    }
}

/// The persisted analysis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub metadata: ArtifactMetadata,
    pub vsl_script: ScriptAnalysis,
    pub statistics: Statistics,
}

impl AnalysisArtifact {
    /// Assemble an artifact from a validated analysis, stamped with the
    /// current time.
    pub fn new(video_id: &str, transcript_source: &str, analysis: ScriptAnalysis) -> Self {
        let statistics = Statistics::from_sections(&analysis.sections);
        Self {
            metadata: ArtifactMetadata {
                video_id: video_id.to_string(),
                analysis_date: Utc::now(),
                transcript_source: transcript_source.to_string(),
            },
            vsl_script: analysis,
            statistics,
        }
    }

    /// Artifact file name for a video.
    pub fn file_name(video_id: &str) -> String {
        format!("{}_vsl_analysis.json", video_id)
    }

    /// Write the artifact into `dir`, replacing any previous run's file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(Self::file_name(&self.metadata.video_id));
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
