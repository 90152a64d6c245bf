//! Importing new content from a source tree.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

use super::{transfer, Library, LibraryError, Transfer};

/// Counts from one [`Library::copy`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Media files found in the source tree
    pub discovered: usize,
    /// Items copied into the library
    pub copied: usize,
    /// Items from the source that already lived inside the library
    pub already_placed: usize,
    /// Items that could not be copied
    pub failed: usize,
}

impl Library {
    /// Import every piece of new content found under `source`.
    ///
    /// The source tree is scanned through [`Library::insert`], so files whose
    /// content the library already holds become duplicates (and may rename a
    /// camera-named canonical item). Every canonical item that now lives under
    /// `source` is then copied to the same relative path under the library
    /// root and tracked at its new location. Items from before this import are
    /// not touched.
    ///
    /// A failed copy is recorded and the item keeps its source path; the
    /// import carries on with the next item.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::SourceNotFound`] or
    /// [`LibraryError::NotADirectory`] for a bad source, and
    /// [`LibraryError::Hash`] if a source file vanishes during the scan.
    pub fn copy(&mut self, source: &Path) -> Result<ImportSummary, LibraryError> {
        let source = fs::canonicalize(source).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::SourceNotFound(source.to_path_buf()),
            _ => LibraryError::Hash(crate::scanner::HashError::from_io(source, e)),
        })?;
        if !source.is_dir() {
            return Err(LibraryError::NotADirectory(source));
        }

        let mut summary = ImportSummary {
            discovered: self.scan(&source)?,
            ..ImportSummary::default()
        };

        let mut failures = Vec::new();
        for item in self.buckets.values_mut().flatten() {
            if !item.path().starts_with(&source) {
                // predates this import
                continue;
            }
            if item.path().starts_with(&self.directory) {
                self.events.on_already_placed(item.path());
                summary.already_placed += 1;
                continue;
            }

            let Ok(relative) = item.path().strip_prefix(&source) else {
                continue;
            };
            let target = self.directory.join(relative);

            match transfer(item.path(), &target, Transfer::Copy) {
                Ok(()) => {
                    self.events.on_copied(item.path(), &target);
                    item.relocate(target, self.directory.clone());
                    summary.copied += 1;
                }
                Err(error) => {
                    self.events.on_failure(&error);
                    failures.push(error);
                    summary.failed += 1;
                }
            }
        }

        self.failures.extend(failures);
        self.copied += summary.copied;
        log::info!(
            "Imported {}: {} copied, {} already in place, {} failed",
            source.display(),
            summary.copied,
            summary.already_placed,
            summary.failed
        );
        Ok(summary)
    }
}
