//! Items: one media file under management, with memoized identity.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use super::hasher::{FullHash, Hasher, QuickHash};
use super::HashError;

/// A lazily computed value.
///
/// Identity fields start out `Uncomputed` and flip to `Computed` the first
/// time they are needed. They never go back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Memo<T> {
    /// Not yet read from disk.
    #[default]
    Uncomputed,
    /// Known value.
    Computed(T),
}

impl<T: Copy> Memo<T> {
    /// The value, if already computed.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        match self {
            Self::Uncomputed => None,
            Self::Computed(value) => Some(*value),
        }
    }

    /// Whether the value has been computed.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// Return the value, running `init` and storing its result on first use.
    ///
    /// A failed `init` leaves the memo `Uncomputed`.
    pub fn get_or_try_init<E>(&mut self, init: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Self::Computed(value) = self {
            return Ok(*value);
        }
        let value = init()?;
        *self = Self::Computed(value);
        Ok(value)
    }
}

/// One media file tracked (or about to be tracked) by a library.
///
/// Two items hold the same content iff their size, quick hash and full hash
/// all match. [`Item::same_content`] evaluates those in that order and stops
/// at the first mismatch, so a size mismatch never opens either file.
#[derive(Debug, Clone)]
pub struct Item {
    path: PathBuf,
    root: PathBuf,
    size: Memo<u64>,
    quick_hash: Memo<QuickHash>,
    full_hash: Memo<FullHash>,
    content_reads: usize,
}

impl Item {
    /// Create an item for a freshly discovered file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the file
    /// * `root` - Root directory of the scan that found it
    #[must_use]
    pub fn new(path: PathBuf, root: PathBuf) -> Self {
        Self {
            path,
            root,
            size: Memo::Uncomputed,
            quick_hash: Memo::Uncomputed,
            full_hash: Memo::Uncomputed,
            content_reads: 0,
        }
    }

    /// Rebuild an item from cached identity. Never touches the filesystem.
    #[must_use]
    pub fn from_cached(
        path: PathBuf,
        root: PathBuf,
        size: u64,
        quick_hash: QuickHash,
        full_hash: FullHash,
    ) -> Self {
        Self {
            path,
            root,
            size: Memo::Computed(size),
            quick_hash: Memo::Computed(quick_hash),
            full_hash: Memo::Computed(full_hash),
            content_reads: 0,
        }
    }

    /// Current location of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root directory the item was discovered under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name component of the current path.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Path relative to the item's discovery root.
    ///
    /// Returns `None` if the item has moved outside its root.
    #[must_use]
    pub fn relative_path(&self) -> Option<&Path> {
        self.path.strip_prefix(&self.root).ok()
    }

    /// Relocate the item after a copy or rename.
    pub(crate) fn relocate(&mut self, path: PathBuf, root: PathBuf) {
        self.path = path;
        self.root = root;
    }

    /// Number of times this item has opened its file to read content.
    #[must_use]
    pub fn content_reads(&self) -> usize {
        self.content_reads
    }

    /// Size, if it has been read already.
    #[must_use]
    pub fn known_size(&self) -> Option<u64> {
        self.size.get()
    }

    /// Size, quick hash and full hash, if all three are already known.
    #[must_use]
    pub fn cached_identity(&self) -> Option<(u64, QuickHash, FullHash)> {
        Some((
            self.size.get()?,
            self.quick_hash.get()?,
            self.full_hash.get()?,
        ))
    }

    /// Byte length of the file, read once and remembered.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NotFound`] if the path no longer exists.
    pub fn size(&mut self) -> Result<u64, HashError> {
        let path = &self.path;
        self.size.get_or_try_init(|| {
            fs::metadata(path)
                .map(|m| m.len())
                .map_err(|e| HashError::from_io(path, e))
        })
    }

    /// Digest of the first kilobyte, computed at most once.
    ///
    /// # Errors
    ///
    /// See [`Hasher::prehash`].
    pub fn quick_hash(&mut self) -> Result<QuickHash, HashError> {
        if let Some(hash) = self.quick_hash.get() {
            return Ok(hash);
        }
        self.content_reads += 1;
        let path = &self.path;
        self.quick_hash
            .get_or_try_init(|| Hasher::new().prehash(path))
    }

    /// Digest of the whole file, computed at most once.
    ///
    /// # Errors
    ///
    /// See [`Hasher::full_hash`].
    pub fn full_hash(&mut self) -> Result<FullHash, HashError> {
        if let Some(hash) = self.full_hash.get() {
            return Ok(hash);
        }
        self.content_reads += 1;
        let path = &self.path;
        self.full_hash
            .get_or_try_init(|| Hasher::new().full_hash(path))
    }

    /// Make sure all three identity fields are known.
    ///
    /// # Errors
    ///
    /// Propagates the first stat or hash failure.
    pub fn identity(&mut self) -> Result<(u64, QuickHash, FullHash), HashError> {
        Ok((self.size()?, self.quick_hash()?, self.full_hash()?))
    }

    /// Compare content with another item: size, then quick hash, then full hash.
    ///
    /// # Errors
    ///
    /// Propagates stat and hash failures from either item.
    pub fn same_content(&mut self, other: &mut Item) -> Result<bool, HashError> {
        if self.size()? != other.size()? {
            return Ok(false);
        }
        if self.quick_hash()? != other.quick_hash()? {
            return Ok(false);
        }
        Ok(self.full_hash()? == other.full_hash()?)
    }
}
