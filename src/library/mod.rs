//! The deduplicated media library.
//!
//! # Overview
//!
//! A [`Library`] is the size-bucketed index of every canonical item under one
//! directory, plus the duplicates and skipped files seen along the way. It
//! owns:
//!
//! 1. **Insertion** ([`Library::insert`]): look up the bucket for the item's
//!    size, compare against each entry (size, quick hash, full hash, stopping at
//!    the first mismatch) and stop at the first match.
//! 2. **Merging** ([`merge`]): when a duplicate carries a better name than the
//!    canonical item, the canonical item takes that name.
//! 3. **Importing** ([`import`]): [`Library::copy`] pulls new content in from
//!    another tree.
//! 4. **Persistence**: [`Library::open`] reads `cache.txt` (or rescans the
//!    directory when it is missing) and [`Library::save`] writes it back.
//!
//! # Example
//!
//! ```no_run
//! use slurp::library::Library;
//! use std::path::Path;
//!
//! let mut library = Library::with_defaults(Path::new("/Volumes/External/Pictures")).unwrap();
//! let imported = library.copy(Path::new("/home/user/Pictures")).unwrap();
//! println!("Copied {} new files", imported.copied);
//! library.save().unwrap();
//! ```

pub mod import;
pub mod merge;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::cache::{CacheEntry, CacheError, CacheFile};
use crate::events::{LibraryEvents, LogEvents};
use crate::scanner::{Discovered, HashError, Item, Walker};

pub use import::ImportSummary;
pub use merge::{should_adopt_name, MergeOutcome, CAMERA_MARKER};

/// Errors raised by library operations.
#[derive(thiserror::Error, Debug)]
pub enum LibraryError {
    /// An item's identity could not be established.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The cache file could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A walk error during a scan.
    #[error(transparent)]
    Scan(#[from] crate::scanner::ScanError),

    /// A directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Copying a file into the library failed.
    #[error("Failed to copy {from} -> {to}: {source}")]
    Copy {
        /// Source file
        from: PathBuf,
        /// Intended destination
        to: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Renaming a canonical item failed.
    #[error("Failed to rename {from} -> {to}: {source}")]
    Rename {
        /// Current location
        from: PathBuf,
        /// Intended new location
        to: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The destination of a copy or rename is already taken.
    #[error("Refusing to overwrite {to} with {from}")]
    DestinationExists {
        /// File that would have been moved or copied
        from: PathBuf,
        /// Existing file at the destination
        to: PathBuf,
    },

    /// An item no longer lies under the root it was discovered in.
    #[error("{path} is not under {root}")]
    OutsideRoot {
        /// Item path
        path: PathBuf,
        /// Expected root
        root: PathBuf,
    },

    /// An item path cannot be written to the line-based cache.
    #[error("Path contains a newline and cannot be cached: {0:?}")]
    UnencodablePath(PathBuf),

    /// The import source does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    /// The import source or library root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Tunable library behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    /// Let duplicates with a human-chosen name rename camera-named items.
    pub rename_on_merge: bool,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            rename_on_merge: true,
        }
    }
}

/// Outcome of [`Library::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The item holds new content and is now canonical.
    Added,
    /// The item duplicates a canonical item and was recorded as a duplicate.
    Duplicate {
        /// Path of the canonical item after any merge
        of: PathBuf,
        /// What the merge policy did
        merge: MergeOutcome,
    },
}

/// Counts describing the state of a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    /// Library root directory
    pub directory: PathBuf,
    /// Number of canonical items
    pub items: usize,
    /// Total size of canonical items in bytes
    pub total_size: u64,
    /// Number of recorded duplicates
    pub duplicates: usize,
    /// Total size of recorded duplicates in bytes
    pub duplicate_size: u64,
    /// Number of non-media files skipped
    pub skipped: usize,
    /// Number of cache lines that could not be decoded
    pub corrupt_cache_lines: usize,
    /// Number of canonical items renamed by the merge policy
    pub renamed: usize,
    /// Number of items copied in by imports
    pub copied: usize,
    /// Number of non-fatal failures recorded
    pub failures: usize,
}

/// A deduplicated media collection rooted at one directory.
pub struct Library {
    directory: PathBuf,
    cache: CacheFile,
    buckets: BTreeMap<u64, Vec<Item>>,
    duplicates: Vec<Item>,
    skipped: Vec<PathBuf>,
    failures: Vec<LibraryError>,
    corrupt_cache_lines: usize,
    renamed: usize,
    copied: usize,
    options: LibraryOptions,
    events: Arc<dyn LibraryEvents>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("directory", &self.directory)
            .field("items", &self.len())
            .field("duplicates", &self.duplicates.len())
            .field("skipped", &self.skipped.len())
            .field("failures", &self.failures.len())
            .field("options", &self.options)
            .field("events", &"<events>")
            .finish()
    }
}

impl Library {
    /// Open the library rooted at `directory`.
    ///
    /// The directory is created if missing. When `cache.txt` exists every
    /// line is fed through [`Library::insert`]; otherwise the directory is
    /// scanned from scratch.
    ///
    /// # Arguments
    ///
    /// * `directory` - Library root
    /// * `options` - Library behavior
    /// * `events` - Receiver for everything the library does
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the cache file
    /// exists but cannot be read, or a file vanishes mid-scan.
    pub fn open(
        directory: &Path,
        options: LibraryOptions,
        events: Arc<dyn LibraryEvents>,
    ) -> Result<Self, LibraryError> {
        fs::create_dir_all(directory).map_err(|source| LibraryError::DirectoryCreation {
            path: directory.to_path_buf(),
            source,
        })?;
        let directory = fs::canonicalize(directory).map_err(|source| {
            LibraryError::DirectoryCreation {
                path: directory.to_path_buf(),
                source,
            }
        })?;
        if !directory.is_dir() {
            return Err(LibraryError::NotADirectory(directory));
        }

        let mut library = Self {
            cache: CacheFile::in_directory(&directory),
            directory,
            buckets: BTreeMap::new(),
            duplicates: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            corrupt_cache_lines: 0,
            renamed: 0,
            copied: 0,
            options,
            events,
        };

        match library.cache.load()? {
            Some(contents) => {
                for error in &contents.corrupt {
                    library.events.on_cache_corrupt(error);
                }
                library.corrupt_cache_lines = contents.corrupt.len();
                for entry in contents.entries {
                    let item = entry.into_item(library.directory.clone());
                    library.insert(item)?;
                }
            }
            None => {
                log::info!(
                    "No cache in {}, scanning from scratch",
                    library.directory.display()
                );
                let directory = library.directory.clone();
                library.scan(&directory)?;
            }
        }

        Ok(library)
    }

    /// Open a library with default options, logging through [`LogEvents`].
    ///
    /// # Errors
    ///
    /// See [`Library::open`].
    pub fn with_defaults(directory: &Path) -> Result<Self, LibraryError> {
        Self::open(directory, LibraryOptions::default(), Arc::new(LogEvents))
    }

    /// Library root directory (canonicalized).
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The cache file backing this library.
    #[must_use]
    pub fn cache_file(&self) -> &CacheFile {
        &self.cache
    }

    /// Canonical items, ordered by size then discovery.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.buckets.values().flatten()
    }

    /// Number of canonical items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether the library has no canonical items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Find the canonical item at `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Item> {
        self.items().find(|item| item.path() == path)
    }

    /// Items found to duplicate a canonical item.
    #[must_use]
    pub fn duplicates(&self) -> &[Item] {
        &self.duplicates
    }

    /// Files ignored because they are not media.
    #[must_use]
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Non-fatal failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> &[LibraryError] {
        &self.failures
    }

    /// Snapshot of the library's counters.
    #[must_use]
    pub fn summary(&self) -> LibrarySummary {
        LibrarySummary {
            directory: self.directory.clone(),
            items: self.len(),
            total_size: self.items().filter_map(Item::known_size).sum(),
            duplicates: self.duplicates.len(),
            duplicate_size: self.duplicates.iter().filter_map(Item::known_size).sum(),
            skipped: self.skipped.len(),
            corrupt_cache_lines: self.corrupt_cache_lines,
            renamed: self.renamed,
            copied: self.copied,
            failures: self.failures.len(),
        }
    }

    /// Register an item, or record it as a duplicate of an existing one.
    ///
    /// Only the bucket of items with the same size is searched, in discovery
    /// order, and the search stops at the first item with identical content.
    /// A duplicate is then offered to the merge policy.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the size or a hash of either side cannot be
    /// read. The library is left unchanged in that case.
    pub fn insert(&mut self, mut item: Item) -> Result<Insertion, HashError> {
        let size = item.size()?;

        let mut matched = None;
        if let Some(bucket) = self.buckets.get_mut(&size) {
            for (index, existing) in bucket.iter_mut().enumerate() {
                if existing.same_content(&mut item)? {
                    matched = Some(index);
                    break;
                }
            }
        }

        let Some(index) = matched else {
            self.events.on_added(item.path());
            self.buckets.entry(size).or_default().push(item);
            return Ok(Insertion::Added);
        };

        self.events
            .on_duplicate(item.path(), self.buckets[&size][index].path());
        let merge = self.merge(size, index, &mut item);
        let of = self.buckets[&size][index].path().to_path_buf();
        self.duplicates.push(item);
        Ok(Insertion::Duplicate { of, merge })
    }

    /// Walk `directory` and insert every media file found under it.
    ///
    /// Non-media files are recorded as skipped. Walk errors are recorded as
    /// non-fatal failures.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Hash`] if a discovered file cannot be stat'ed
    /// or hashed.
    pub fn scan(&mut self, directory: &Path) -> Result<usize, LibraryError> {
        self.events.on_scan_start(directory);
        let walker = Walker::new(directory);
        let mut media = 0;

        for found in walker.walk() {
            match found {
                Ok(Discovered::Media { path, .. }) => {
                    media += 1;
                    self.insert(Item::new(path, directory.to_path_buf()))?;
                }
                Ok(Discovered::Skipped(path)) => {
                    self.events.on_skipped(&path);
                    self.skipped.push(path);
                }
                Err(e) => self.record_failure(e.into()),
            }
        }

        self.events.on_scan_end(directory, media);
        Ok(media)
    }

    /// Write every canonical item to `cache.txt`.
    ///
    /// Hashes that were never needed are computed now. Items whose file has
    /// disappeared, or whose path cannot be encoded, are left out and
    /// recorded as failures. Items still outside the library directory (a
    /// failed copy) and duplicates are never written.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Cache`] if the cache file cannot be written.
    pub fn save(&mut self) -> Result<usize, LibraryError> {
        let mut lines = Vec::with_capacity(self.len());
        let mut failures = Vec::new();

        for item in self.buckets.values_mut().flatten() {
            if !item.path().starts_with(&self.directory) {
                // left behind by a failed copy; a rescan of the source finds it again
                log::debug!("Not caching {}: outside library", item.path().display());
                continue;
            }
            if item.path().to_string_lossy().contains('\n') {
                failures.push(LibraryError::UnencodablePath(item.path().to_path_buf()));
                continue;
            }
            match CacheEntry::from_item(item) {
                Ok(entry) => lines.push(entry.to_line()),
                Err(e) => failures.push(e.into()),
            }
        }

        for failure in failures {
            self.record_failure(failure);
        }

        let written = lines.len();
        self.cache.save(lines)?;
        log::info!(
            "Saved {} items to {}",
            written,
            self.cache.path().display()
        );
        Ok(written)
    }

    fn record_failure(&mut self, error: LibraryError) {
        self.events.on_failure(&error);
        self.failures.push(error);
    }
}

/// How [`transfer`] moves content to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Copy,
    Rename,
    /// Rename onto a file already proven to hold the same bytes.
    Replace,
}

/// Move or copy `from` to `to`, creating parent directories as needed.
///
/// Only [`Transfer::Replace`] overwrites; otherwise an occupied destination is
/// [`LibraryError::DestinationExists`]. Copies go through a hidden sibling
/// without a media extension and are renamed into place when complete.
fn transfer(from: &Path, to: &Path, mode: Transfer) -> Result<(), LibraryError> {
    if mode != Transfer::Replace && to.symlink_metadata().is_ok() {
        return Err(LibraryError::DestinationExists {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| LibraryError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    match mode {
        Transfer::Rename | Transfer::Replace => {
            fs::rename(from, to).map_err(|source| LibraryError::Rename {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            })
        }
        Transfer::Copy => {
            let copy_err = |source| LibraryError::Copy {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source,
            };
            let partial = partial_path(to);
            if let Err(e) = fs::copy(from, &partial) {
                let _ = fs::remove_file(&partial);
                return Err(copy_err(e));
            }
            if let Err(e) = fs::rename(&partial, to) {
                let _ = fs::remove_file(&partial);
                return Err(copy_err(e));
            }
            Ok(())
        }
    }
}

/// In-progress name for a copy headed to `to`: `.<name>.slurp-partial`.
fn partial_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{name}.slurp-partial"))
}
