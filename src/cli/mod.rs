//! CLI module for Selg.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Selg - VSL Script Analysis
///
/// A CLI tool that transcribes sales videos and extracts structured VSL
/// script analyses. The name "Selg" comes from the Norwegian word for "sell."
#[derive(Parser, Debug)]
#[command(name = "selg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// Download, transcribe, and analyze a sales video
    Analyze {
        /// YouTube URL or video ID
        input: String,

        /// Re-analyze even if a stored record exists
        #[arg(short, long)]
        force: bool,
    },

    /// List analyzed videos
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
