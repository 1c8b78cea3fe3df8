//! Configuration module for Selg.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnalysisPrompts, Prompts};
pub use settings::{
    AcquisitionSettings, ExtractionSettings, GeneralSettings, OutputSettings, PromptSettings,
    Settings, StoreSettings, TranscriptionSettings,
};
