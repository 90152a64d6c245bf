use slurp::cache::{CacheError, CacheFile, CorruptReason, CACHE_FILE_NAME};
use slurp::events::LogEvents;
use slurp::library::{Library, LibraryOptions};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const QUICK: &str = "0123456789abcdef";

fn full() -> String {
    "ab".repeat(32)
}

#[test]
fn test_corrupt_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let good = format!("5-{QUICK}-{}:/lib/a.jpg", full());
    let content = [
        good.as_str(),
        "not a cache line at all",
        "12-zz-zz:/lib/b.jpg",
        "",
        "x-0123456789abcdef-00:/lib/c.jpg",
    ]
    .join("\n");
    fs::write(dir.path().join(CACHE_FILE_NAME), content).unwrap();

    let contents = CacheFile::in_directory(dir.path()).load().unwrap().unwrap();
    assert_eq!(contents.entries.len(), 1);
    assert_eq!(contents.corrupt.len(), 3);

    let lines: Vec<usize> = contents
        .corrupt
        .iter()
        .map(|e| match e {
            CacheError::CorruptLine { line, .. } => *line,
            other => panic!("unexpected error: {other}"),
        })
        .collect();
    assert_eq!(lines, vec![2, 3, 5]);
}

#[test]
fn test_library_opens_despite_corrupt_cache() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    fs::write(root.join("a.jpg"), b"alpha").unwrap();

    let mut library = Library::with_defaults(&root).unwrap();
    library.save().unwrap();

    let cache = root.join(CACHE_FILE_NAME);
    let mut text = fs::read_to_string(&cache).unwrap();
    text.push_str("\ngarbage\n");
    fs::write(&cache, text).unwrap();

    let library =
        Library::open(&root, LibraryOptions::default(), Arc::new(LogEvents)).unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.summary().corrupt_cache_lines, 1);
    // Skipped lines are not failures
    assert!(library.failures().is_empty());
}

#[test]
fn test_invalid_utf8_line_is_corrupt() {
    let dir = tempdir().unwrap();
    let mut bytes = format!("5-{QUICK}-{}:/lib/a.jpg\n", full()).into_bytes();
    bytes.extend_from_slice(b"5-\xff\xfe:/lib/b.jpg");
    fs::write(dir.path().join(CACHE_FILE_NAME), bytes).unwrap();

    let contents = CacheFile::in_directory(dir.path()).load().unwrap().unwrap();
    assert_eq!(contents.entries.len(), 1);
    assert!(matches!(
        contents.corrupt[0],
        CacheError::CorruptLine {
            line: 2,
            reason: CorruptReason::InvalidUtf8
        }
    ));
}

#[test]
fn test_wrong_hash_width_is_corrupt() {
    let short_full = "ab".repeat(16);
    let line = format!("5-{QUICK}-{short_full}:/lib/a.jpg");
    assert!(matches!(
        line.parse::<slurp::cache::CacheEntry>(),
        Err(CorruptReason::InvalidFullHash(_))
    ));

    let line = format!("5-0123-{}:/lib/a.jpg", full());
    assert!(matches!(
        line.parse::<slurp::cache::CacheEntry>(),
        Err(CorruptReason::InvalidQuickHash(_))
    ));
}

#[test]
fn test_empty_cache_file_means_empty_library() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"not yet known").unwrap();
    fs::write(dir.path().join(CACHE_FILE_NAME), b"").unwrap();

    // An existing cache, even empty, is trusted over a rescan
    let library = Library::with_defaults(dir.path()).unwrap();
    assert!(library.is_empty());
}

#[test]
fn test_cache_entry_for_missing_file_is_kept_until_save() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    let ghost = root.join("ghost.jpg");
    let line = format!("5-{QUICK}-{}:{}", full(), ghost.display());
    fs::write(root.join(CACHE_FILE_NAME), line).unwrap();

    let mut library = Library::with_defaults(&root).unwrap();
    assert!(library.get(&ghost).is_some());

    // Identity is already known, so the entry is written back unchanged
    assert_eq!(library.save().unwrap(), 1);
}

#[test]
fn test_unreadable_cache_is_an_error() {
    let dir = tempdir().unwrap();
    // A directory where the cache file should be cannot be read as a file
    fs::create_dir(dir.path().join(CACHE_FILE_NAME)).unwrap();

    let err = CacheFile::in_directory(dir.path()).load().unwrap_err();
    assert!(matches!(err, CacheError::Io { .. }));
    assert!(Library::with_defaults(dir.path()).is_err());
}
