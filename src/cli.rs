//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Index a library (creating it if needed) and print its statistics
//! slurp /Volumes/External/Pictures
//!
//! # Import new media from a camera card, skipping anything already present
//! slurp /Volumes/External/Pictures /Volumes/CARD/DCIM
//!
//! # Machine-readable report with every item listed
//! slurp --output json --list /Volumes/External/Pictures
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deduplicating media importer.
///
/// Maintains a library directory in which every photo and video is stored
/// once, and copies in only the content it has not seen before.
#[derive(Debug, Parser)]
#[command(name = "slurp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (defaults to <LIBRARY>/slurp.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// List every canonical item and duplicate in the report
    #[arg(long)]
    pub list: bool,

    /// Never rename library items to a duplicate's better name
    #[arg(long)]
    pub no_rename: bool,

    /// Report fatal errors on stderr as JSON
    #[arg(long)]
    pub json_errors: bool,

    /// Library directory (created if missing)
    #[arg(value_name = "LIBRARY")]
    pub library: PathBuf,

    /// Directory to import new media from
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,
}

/// Report format for the statistics printed after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
