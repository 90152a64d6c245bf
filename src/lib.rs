//! slurp - deduplicating media importer
//!
//! Maintains a library directory in which every photo and video is stored
//! once. Content identity is decided in tiers (size, quick hash of the first
//! kilobyte, full hash), each computed only when the cheaper tier ties, and
//! remembered in a `cache.txt` inside the library between runs.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod library;
pub mod logging;
pub mod output;
pub mod scanner;

use std::io;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::events::LogEvents;
use crate::library::Library;
use crate::output::{JsonOutput, Report, TextOutput};

/// Run one invocation: open the library, import from the source if one was
/// given, save the cache and print the report.
///
/// Returns [`ExitCode::PartialSuccess`] when the run completed but some items
/// could not be copied, renamed or hashed.
///
/// # Errors
///
/// Returns an error for anything that stops the run: bad configuration, an
/// unusable library or source directory, a file vanishing mid-scan, or a
/// cache that cannot be read or written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref(), &cli.library)
        .context("Failed to load configuration")?;
    config.apply_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let mut library = Library::open(&cli.library, config.library_options(), Arc::new(LogEvents))
        .with_context(|| format!("Failed to open library {}", cli.library.display()))?;

    let import = match &cli.source {
        Some(source) => Some(
            library
                .copy(source)
                .with_context(|| format!("Failed to import from {}", source.display()))?,
        ),
        None => None,
    };

    library
        .save()
        .with_context(|| format!("Failed to save cache in {}", library.directory().display()))?;

    let exit_code = if library.failures().is_empty() {
        ExitCode::Success
    } else {
        log::warn!(
            "Completed with {} failures",
            library.failures().len()
        );
        ExitCode::PartialSuccess
    };

    let report = Report::new(&library, import, config.list, exit_code);
    let mut stdout = io::stdout().lock();
    match config.output {
        OutputFormat::Text => TextOutput::new(&report)
            .write_to(&mut stdout)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report)
            .write_to(&mut stdout)
            .context("Failed to write report")?,
    }

    Ok(exit_code)
}
