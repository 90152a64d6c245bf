//! Cache entry definitions and the one-line text codec.
//!
//! Each canonical item is stored as
//!
//! ```text
//! <size>-<quickHashHex>-<fullHashHex>:<path>
//! ```
//!
//! The stats prefix is split off at the first `:` before anything else, so
//! paths may freely contain `-` and `:`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::scanner::{hash_to_hex, hex_to_hash, FullHash, HashError, Item, QuickHash};

/// Why a cache line could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CorruptReason {
    /// No `:` separating the stats from the path.
    #[error("missing ':' between stats and path")]
    MissingPathSeparator,

    /// Nothing after the `:`.
    #[error("empty path")]
    EmptyPath,

    /// The stats prefix did not split into exactly three fields.
    #[error("expected 3 '-' separated fields, found {0}")]
    FieldCount(usize),

    /// The size field is not a non-negative decimal integer.
    #[error("invalid size '{0}'")]
    InvalidSize(String),

    /// The quick hash is not 16 hex digits.
    #[error("invalid quick hash '{0}'")]
    InvalidQuickHash(String),

    /// The full hash is not 64 hex digits.
    #[error("invalid full hash '{0}'")]
    InvalidFullHash(String),

    /// The raw line bytes are not UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Identity and location of one canonical item, as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// File size in bytes
    pub size: u64,
    /// Digest of the first kilobyte
    pub quick_hash: QuickHash,
    /// Digest of the whole file
    pub full_hash: FullHash,
    /// Path of the item when the cache was written
    pub path: PathBuf,
}

impl CacheEntry {
    /// Capture an item's identity, hashing it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates the stat or hash failure if the item's file is gone.
    pub fn from_item(item: &mut Item) -> Result<Self, HashError> {
        let (size, quick_hash, full_hash) = item.identity()?;
        Ok(Self {
            size,
            quick_hash,
            full_hash,
            path: item.path().to_path_buf(),
        })
    }

    /// Turn the entry back into an item with pre-populated identity.
    ///
    /// # Arguments
    ///
    /// * `root` - Root hint for the reconstructed item (the library directory)
    #[must_use]
    pub fn into_item(self, root: PathBuf) -> Item {
        Item::from_cached(self.path, root, self.size, self.quick_hash, self.full_hash)
    }

    /// Encode as a single cache line, without a trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}:{}",
            self.size,
            hash_to_hex(&self.quick_hash),
            hash_to_hex(&self.full_hash),
            self.path.to_string_lossy()
        )
    }
}

impl FromStr for CacheEntry {
    type Err = CorruptReason;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (stats, path) = line
            .split_once(':')
            .ok_or(CorruptReason::MissingPathSeparator)?;
        if path.is_empty() {
            return Err(CorruptReason::EmptyPath);
        }

        let fields: Vec<&str> = stats.split('-').collect();
        let [size, quick, full] = fields.as_slice() else {
            return Err(CorruptReason::FieldCount(fields.len()));
        };

        // u64::from_str accepts a leading '+', which never appears in our output
        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CorruptReason::InvalidSize((*size).to_string()));
        }
        let size = size
            .parse::<u64>()
            .map_err(|_| CorruptReason::InvalidSize((*size).to_string()))?;
        let quick_hash = hex_to_hash::<8>(quick)
            .ok_or_else(|| CorruptReason::InvalidQuickHash((*quick).to_string()))?;
        let full_hash = hex_to_hash::<32>(full)
            .ok_or_else(|| CorruptReason::InvalidFullHash((*full).to_string()))?;

        Ok(Self {
            size,
            quick_hash,
            full_hash,
            path: PathBuf::from(path),
        })
    }
}
