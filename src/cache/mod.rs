//! Hash caching module.
//!
//! This module persists the identity of every canonical item so later runs
//! can rebuild a library without re-reading file content.
//!
//! # Architecture
//!
//! The caching system is split into two main components:
//!
//! * [`entry`]: The one-line text codec for a single item.
//! * [`store`]: Loading (tolerant of bad lines) and atomic saving of the file.
//!
//! # File Format
//!
//! Plain UTF-8 text at `<library>/cache.txt`, one item per line, sorted
//! lexicographically, no header:
//!
//! ```text
//! <size>-<quickHashHex>-<fullHashHex>:<path>
//! ```
//!
//! There is no version tag. Changing either hash algorithm invalidates every
//! existing cache file.

pub mod entry;
pub mod store;

use std::path::PathBuf;

pub use entry::{CacheEntry, CorruptReason};
pub use store::{CacheContents, CacheFile, CACHE_FILE_NAME};

/// Errors raised while reading or writing the cache.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// A line could not be decoded. Never fatal on its own.
    #[error("line {line}: {reason}")]
    CorruptLine {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: CorruptReason,
    },

    /// The cache file could not be read or written.
    #[error("Cache I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
