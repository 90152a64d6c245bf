//! Reports printed after a run.
//!
//! A [`Report`] is a plain snapshot of a [`Library`]: its summary, the
//! result of an import if one ran, the non-fatal failures, and (with
//! `--list`) every canonical item and duplicate. It renders as text
//! ([`text::TextOutput`]) or JSON ([`json::JsonOutput`]).
//!
//! # Example
//!
//! ```no_run
//! use slurp::error::ExitCode;
//! use slurp::library::Library;
//! use slurp::output::{json::JsonOutput, Report};
//! use std::path::Path;
//!
//! let library = Library::with_defaults(Path::new("/Volumes/External/Pictures")).unwrap();
//! let report = Report::new(&library, None, false, ExitCode::Success);
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

use serde::Serialize;

use crate::error::ExitCode;
use crate::library::{ImportSummary, Library, LibrarySummary};
use crate::scanner::{hash_to_hex, Item};

pub use json::JsonOutput;
pub use text::TextOutput;

/// One canonical item in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    /// Path of the item
    pub path: String,
    /// Size in bytes, if known
    pub size: Option<u64>,
    /// Quick hash as hex, if computed
    pub quick_hash: Option<String>,
    /// Full hash as hex, if computed
    pub full_hash: Option<String>,
}

impl ReportItem {
    fn from_item(item: &Item) -> Self {
        let identity = item.cached_identity();
        Self {
            path: item.path().display().to_string(),
            size: item.known_size(),
            quick_hash: identity.map(|(_, quick, _)| hash_to_hex(&quick)),
            full_hash: identity.map(|(_, _, full)| hash_to_hex(&full)),
        }
    }
}

/// Everything worth telling the user after a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Library counters
    pub summary: LibrarySummary,
    /// Result of the import, if a source was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportSummary>,
    /// Non-fatal failures, as messages
    pub failures: Vec<String>,
    /// Canonical items, when listing was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ReportItem>>,
    /// Duplicate paths, when listing was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<String>>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SL000")
    pub exit_code_name: String,
}

impl Report {
    /// Snapshot `library`.
    ///
    /// # Arguments
    ///
    /// * `library` - Library to describe
    /// * `import` - Result of [`Library::copy`], if it ran
    /// * `list` - Include every item and duplicate
    /// * `exit_code` - Exit code of this run
    #[must_use]
    pub fn new(
        library: &Library,
        import: Option<ImportSummary>,
        list: bool,
        exit_code: ExitCode,
    ) -> Self {
        let items: Option<Vec<ReportItem>> =
            list.then(|| library.items().map(ReportItem::from_item).collect());
        let duplicates: Option<Vec<String>> = list.then(|| {
            library
                .duplicates()
                .iter()
                .map(|d| d.path().display().to_string())
                .collect()
        });

        Self {
            summary: library.summary(),
            import,
            failures: library.failures().iter().map(ToString::to_string).collect(),
            items,
            duplicates,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}
