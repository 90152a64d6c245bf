//! Library event reporting.
//!
//! A [`Library`](crate::library::Library) never logs on its own; it reports
//! what happens through the [`LibraryEvents`] implementation it was built
//! with. [`LogEvents`] forwards everything to the `log` facade, tests plug in
//! their own recorder.

use std::path::Path;

use crate::cache::CacheError;
use crate::library::LibraryError;

/// Log target used by [`LogEvents`].
pub const LOG_TARGET: &str = "slurp::library";

/// Receiver for library activity.
///
/// Every method has a no-op default so implementors only override what they
/// care about.
pub trait LibraryEvents: Send + Sync {
    /// A directory scan is starting.
    fn on_scan_start(&self, _root: &Path) {}

    /// A directory scan finished.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory that was scanned
    /// * `media` - Number of media files found
    fn on_scan_end(&self, _root: &Path, _media: usize) {}

    /// New unique content was registered.
    fn on_added(&self, _path: &Path) {}

    /// A file was found to duplicate an already registered item.
    fn on_duplicate(&self, _dupe: &Path, _existing: &Path) {}

    /// A file was ignored because it is not a recognized media type.
    fn on_skipped(&self, _path: &Path) {}

    /// A canonical item was renamed to a better name.
    fn on_renamed(&self, _from: &Path, _to: &Path) {}

    /// A canonical item still in the source tree now stands for a better-named copy.
    fn on_retargeted(&self, _from: &Path, _to: &Path) {}

    /// An item was copied into the library.
    fn on_copied(&self, _from: &Path, _to: &Path) {}

    /// An item was not copied because it already lives inside the library.
    fn on_already_placed(&self, _path: &Path) {}

    /// A cache line was skipped.
    fn on_cache_corrupt(&self, _error: &CacheError) {}

    /// A non-fatal failure was recorded.
    fn on_failure(&self, _error: &LibraryError) {}
}

/// Forwards library events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl LibraryEvents for LogEvents {
    fn on_scan_start(&self, root: &Path) {
        log::info!(target: LOG_TARGET, "Scanning {}", root.display());
    }

    fn on_scan_end(&self, root: &Path, media: usize) {
        log::info!(target: LOG_TARGET, "Found {} media files under {}", media, root.display());
    }

    fn on_added(&self, path: &Path) {
        log::trace!(target: LOG_TARGET, "New content: {}", path.display());
    }

    fn on_duplicate(&self, dupe: &Path, existing: &Path) {
        log::debug!(
            target: LOG_TARGET,
            "Duplicate: {} is the same as {}",
            dupe.display(),
            existing.display()
        );
    }

    fn on_skipped(&self, path: &Path) {
        log::trace!(target: LOG_TARGET, "Skipping non-media file: {}", path.display());
    }

    fn on_renamed(&self, from: &Path, to: &Path) {
        log::info!(target: LOG_TARGET, "renaming {} -> {}", from.display(), to.display());
    }

    fn on_retargeted(&self, from: &Path, to: &Path) {
        log::info!(
            target: LOG_TARGET,
            "importing {} instead of {}",
            to.display(),
            from.display()
        );
    }

    fn on_copied(&self, from: &Path, to: &Path) {
        log::info!(target: LOG_TARGET, "copying {} -> {}", from.display(), to.display());
    }

    fn on_already_placed(&self, path: &Path) {
        log::warn!(target: LOG_TARGET, "already copied \"{}\"", path.display());
    }

    fn on_cache_corrupt(&self, error: &CacheError) {
        log::warn!(target: LOG_TARGET, "Ignoring cache entry: {}", error);
    }

    fn on_failure(&self, error: &LibraryError) {
        log::error!(target: LOG_TARGET, "{}", error);
    }
}
