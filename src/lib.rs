//! Selg - VSL Script Analysis
//!
//! A CLI tool that transcribes sales videos and extracts structured VSL
//! (video sales letter) script analyses.
//!
//! The name "Selg" comes from the Norwegian word for "sell."
//!
//! # Overview
//!
//! Selg allows you to:
//! - Download the audio track of a sales video
//! - Transcribe it with a speech-to-text model
//! - Extract the script's structure (sections, purposes, tones) with a
//!   schema-constrained LLM call
//! - Persist the analysis as a JSON artifact with derived statistics
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `source` - Video stream resolution and audio download
//! - `transcription` - Speech-to-text transcription
//! - `analysis` - Script analysis domain model, schema, and artifact
//! - `extraction` - Structured script extraction
//! - `store` - Processed-video record store
//! - `pipeline` - Stage coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use selg::config::Settings;
//! use selg::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     // Analyze a sales video by id or URL
//!     let outcome = pipeline.run("dQw4w9WgXcQ", false).await?;
//!     println!("{} sections", outcome.summary.total_sections);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod openai;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod transcription;
pub mod workspace;

pub use error::{Result, SelgError};
