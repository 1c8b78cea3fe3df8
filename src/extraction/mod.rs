//! Structured extraction module for Selg.
//!
//! Turns transcript text into a validated [`ScriptAnalysis`] via a
//! generative model constrained to a fixed output schema.

mod openai;

pub use openai::OpenAiExtractor;

use crate::analysis::ScriptAnalysis;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for script-analysis extractors.
#[async_trait]
pub trait ScriptExtractor: Send + Sync {
    /// Extract a structured script analysis from transcript text.
    async fn extract(&self, transcript: &str) -> Result<ScriptAnalysis>;
}
