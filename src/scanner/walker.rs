//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and classifying every regular file as media or skipped.
//!
//! # Features
//!
//! - Top-down traversal, children sorted by file name for deterministic order
//! - Hidden directories (names starting with `.`) are never entered
//! - Symbolic links are neither followed nor reported
//! - Errors are yielded rather than stopping iteration
//!
//! # Example
//!
//! ```no_run
//! use slurp::scanner::{Discovered, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"));
//! let media = walker
//!     .walk()
//!     .filter_map(Result::ok)
//!     .filter(|d| matches!(d, Discovered::Media { .. }))
//!     .count();
//! println!("Found {} media files", media);
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{MediaKind, ScanError};

/// A regular file found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// A file with a recognized media extension.
    Media {
        /// Path to the file
        path: PathBuf,
        /// Kind of media
        kind: MediaKind,
    },
    /// A file whose extension is not a recognized media type.
    Skipped(PathBuf),
}

impl Discovered {
    /// Path of the discovered file.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Media { path, .. } | Self::Skipped(path) => path,
        }
    }
}

/// Directory walker for media discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding every regular file.
    ///
    /// The root itself is always entered, even if its own name starts with a
    /// dot. Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<Discovered, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden_dir(entry))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        if entry.file_type().is_symlink() {
                            log::trace!("Skipping symlink: {}", entry.path().display());
                        }
                        return None;
                    }
                    let path = entry.into_path();
                    match MediaKind::from_path(&path) {
                        Some(kind) => Some(Ok(Discovered::Media { path, kind })),
                        None => {
                            log::trace!("Not a media file: {}", path.display());
                            Some(Ok(Discovered::Skipped(path)))
                        }
                    }
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Path not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                ScanError::Io { path, source }
            }
        }
    }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}
