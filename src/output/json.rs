//! JSON report for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "summary": {
//!     "directory": "/Volumes/External/Pictures",
//!     "items": 1200,
//!     "total_size": 5368709120,
//!     "duplicates": 14,
//!     "duplicate_size": 73400320,
//!     "skipped": 3,
//!     "corrupt_cache_lines": 0,
//!     "renamed": 2,
//!     "copied": 40,
//!     "failures": 0
//!   },
//!   "import": { "discovered": 54, "copied": 40, "already_placed": 0, "failed": 0 },
//!   "failures": [],
//!   "exit_code": 0,
//!   "exit_code_name": "SL000"
//! }
//! ```
//!
//! `import` is present only when a source was given; `items` and
//! `duplicates` only with `--list`.

use std::io::Write;

use super::Report;

/// Renders a [`Report`] as JSON.
#[derive(Debug)]
pub struct JsonOutput<'a> {
    report: &'a Report,
}

impl<'a> JsonOutput<'a> {
    /// Wrap a report for JSON rendering.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.report)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(&mut *writer, self.report)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
