//! On-disk cache file: tolerant loading and atomic saving.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::entry::{CacheEntry, CorruptReason};
use super::{CacheError, CacheResult};

/// File name of the cache inside a library directory.
pub const CACHE_FILE_NAME: &str = "cache.txt";

/// Everything recovered from a cache file.
#[derive(Debug, Default)]
pub struct CacheContents {
    /// Successfully decoded entries, in file order
    pub entries: Vec<CacheEntry>,
    /// Lines that failed to decode
    pub corrupt: Vec<CacheError>,
}

/// The cache file belonging to one library directory.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    /// The cache file for a library rooted at `directory`.
    #[must_use]
    pub fn in_directory(directory: &Path) -> Self {
        Self {
            path: directory.join(CACHE_FILE_NAME),
        }
    }

    /// Location of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("txt.tmp")
    }

    /// Read and decode the cache file.
    ///
    /// Returns `Ok(None)` when there is no cache file yet. Lines that fail to
    /// decode are logged, collected in [`CacheContents::corrupt`] and skipped;
    /// blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> CacheResult<Option<CacheContents>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No cache file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let mut contents = CacheContents::default();
        for (index, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            if raw.is_empty() {
                continue;
            }
            let decoded = std::str::from_utf8(raw)
                .map_err(|_| CorruptReason::InvalidUtf8)
                .and_then(str::parse::<CacheEntry>);
            match decoded {
                Ok(entry) => contents.entries.push(entry),
                Err(reason) => {
                    let err = CacheError::CorruptLine {
                        line: index + 1,
                        reason,
                    };
                    log::warn!("Skipping cache line in {}: {}", self.path.display(), err);
                    contents.corrupt.push(err);
                }
            }
        }

        log::debug!(
            "Loaded {} cache entries from {} ({} corrupt)",
            contents.entries.len(),
            self.path.display(),
            contents.corrupt.len()
        );
        Ok(Some(contents))
    }

    /// Write the given lines, sorted, replacing the cache file atomically.
    ///
    /// The content goes to a temporary sibling first and is renamed over the
    /// cache file once it is safely on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if writing or renaming fails. The previous
    /// cache file is left intact in that case.
    pub fn save(&self, mut lines: Vec<String>) -> CacheResult<()> {
        lines.sort();
        let content = lines.join("\n");

        let tmp = self.temp_path();
        let io_err = |source| CacheError::Io {
            path: tmp.clone(),
            source,
        };

        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(content.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        f.sync_all().map_err(io_err)?;
        drop(f);

        rename_over(&tmp, &self.path).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("Wrote {} cache entries to {}", lines.len(), self.path.display());
        Ok(())
    }
}

fn rename_over(from: &Path, to: &Path) -> std::io::Result<()> {
    #[cfg(windows)]
    {
        if to.exists() {
            fs::remove_file(to)?;
        }
    }
    fs::rename(from, to)
}
