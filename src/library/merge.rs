//! Merge policy: which of two identical files keeps the canonical name.
//!
//! Cameras name files `IMG_1234.JPG`; people name them `beach.jpg`. When a
//! duplicate turns up under a human-chosen name and the canonical item still
//! carries a camera name, the canonical item adopts the duplicate's name.
//! The test is a case-sensitive substring match on [`CAMERA_MARKER`] and
//! nothing else.

use std::path::Path;

use crate::scanner::Item;

use super::{transfer, Library, LibraryError, Transfer};

/// Substring that marks a camera-generated file name.
pub const CAMERA_MARKER: &str = "IMG";

/// What the merge policy did with a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The canonical item kept its path.
    Kept,
    /// The canonical item was renamed on disk to the duplicate's name.
    Renamed,
    /// The canonical item had not been imported yet; the better-named source
    /// file took its place and will be imported instead.
    Retargeted,
    /// A rename was called for but failed; the canonical item kept its path.
    Failed,
}

/// Whether an item named like `existing` should take the name of `candidate`.
///
/// True only when the names differ, `existing` contains [`CAMERA_MARKER`] and
/// `candidate` does not.
///
/// # Example
///
/// ```
/// use slurp::library::should_adopt_name;
/// use std::path::Path;
///
/// assert!(should_adopt_name(Path::new("IMG_0001.jpg"), Path::new("vacation/beach.jpg")));
/// assert!(!should_adopt_name(Path::new("beach.jpg"), Path::new("IMG_0002.jpg")));
/// ```
#[must_use]
pub fn should_adopt_name(existing: &Path, candidate: &Path) -> bool {
    let (Some(existing), Some(candidate)) = (existing.file_name(), candidate.file_name()) else {
        return false;
    };
    if existing == candidate {
        return false;
    }
    existing.to_string_lossy().contains(CAMERA_MARKER)
        && !candidate.to_string_lossy().contains(CAMERA_MARKER)
}

impl Library {
    /// Offer `dupe` to the merge policy against the canonical item at
    /// `buckets[size][index]`.
    ///
    /// A canonical item inside the library is renamed to the duplicate's path
    /// relative to its own scan root, joined onto the library root. When that
    /// target is the duplicate itself (both files live in the library) the
    /// rename replaces it, since the bytes are already known to match.
    ///
    /// A canonical item still waiting in a source tree is never renamed. This
    /// is a deliberate exception to the rename rule: it swaps places with
    /// `dupe`, so the duplicate becomes the tracked item and the better-named
    /// file is the one imported.
    pub(super) fn merge(&mut self, size: u64, index: usize, dupe: &mut Item) -> MergeOutcome {
        if !self.options.rename_on_merge {
            return MergeOutcome::Kept;
        }

        let Some(existing) = self.buckets.get_mut(&size).and_then(|b| b.get_mut(index)) else {
            return MergeOutcome::Kept;
        };
        if !should_adopt_name(existing.path(), dupe.path()) {
            return MergeOutcome::Kept;
        }

        if !existing.path().starts_with(&self.directory) {
            self.events.on_retargeted(existing.path(), dupe.path());
            std::mem::swap(existing, dupe);
            return MergeOutcome::Retargeted;
        }

        let Some(relative) = dupe.relative_path() else {
            let error = LibraryError::OutsideRoot {
                path: dupe.path().to_path_buf(),
                root: dupe.root().to_path_buf(),
            };
            self.events.on_failure(&error);
            self.failures.push(error);
            return MergeOutcome::Failed;
        };
        let target = self.directory.join(relative);
        let mode = if target == dupe.path() {
            Transfer::Replace
        } else {
            Transfer::Rename
        };

        match transfer(existing.path(), &target, mode) {
            Ok(()) => {
                self.events.on_renamed(existing.path(), &target);
                existing.relocate(target, self.directory.clone());
                self.renamed += 1;
                MergeOutcome::Renamed
            }
            Err(error) => {
                self.events.on_failure(&error);
                self.failures.push(error);
                MergeOutcome::Failed
            }
        }
    }
}
