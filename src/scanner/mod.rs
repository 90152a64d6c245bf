//! Scanner module for directory traversal and content identity.
//!
//! This module provides functionality for:
//! - Walking a directory tree while pruning hidden directories
//! - Classifying files as media by extension
//! - Tiered content identity (size, quick hash, full hash) per [`Item`]
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and media classification
//! - [`hasher`]: Quick (XxHash64) and full (BLAKE3) hashing
//! - [`item`]: Items with lazily memoized identity
//!
//! # Example
//!
//! ```no_run
//! use slurp::scanner::{Discovered, Walker};
//! use std::path::Path;
//!
//! for found in Walker::new(Path::new("/home/user/Pictures")).walk() {
//!     match found {
//!         Ok(Discovered::Media { path, kind }) => println!("{kind:?}: {}", path.display()),
//!         Ok(Discovered::Skipped(path)) => println!("skipped {}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod item;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{hash_to_hex, hex_to_hash, FullHash, Hasher, QuickHash, PREHASH_SIZE};
pub use item::{Item, Memo};
pub use walker::{Discovered, Walker};

/// Recognized image extensions (lower case, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "png", "tif", "tiff"];

/// Recognized video extensions (lower case, without the dot).
pub const VIDEO_EXTENSIONS: &[&str] = &["avi", "mov", "mpeg", "mpg", "mp4"];

/// Kind of media a file holds, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video clip
    Video,
}

impl MediaKind {
    /// Classify a path by its lower-cased extension.
    ///
    /// Returns `None` for files without an extension or with one that is not
    /// a recognized media type.
    ///
    /// # Example
    ///
    /// ```
    /// use slurp::scanner::MediaKind;
    /// use std::path::Path;
    ///
    /// assert_eq!(MediaKind::from_path(Path::new("a/IMG_0001.JPG")), Some(MediaKind::Image));
    /// assert_eq!(MediaKind::from_path(Path::new("clip.mp4")), Some(MediaKind::Video));
    /// assert_eq!(MediaKind::from_path(Path::new("notes.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while walking.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while establishing an item's identity.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file no longer exists.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The path whose identity could not be established.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
