use slurp::library::Library;
use slurp::scanner::{Discovered, MediaKind, Walker};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(path: PathBuf, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let library = Library::with_defaults(dir.path()).unwrap();

    assert!(library.is_empty());
    assert!(library.duplicates().is_empty());
    assert!(library.skipped().is_empty());
}

#[test]
fn test_scan_classifies_media_and_skips_the_rest() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a.gif", &b"gif"[..]),
        ("b.JPEG", b"jpeg!"),
        ("c.tiff", b"tiff tiff"),
        ("d.MPG", b"mpg mpg mpg"),
        ("e.mp4", b"mp4 mp4 mp4 mp4"),
        ("readme.txt", b"text"),
        ("archive.zip", b"zip"),
        ("noext", b"none"),
    ] {
        write(dir.path().join(name), content);
    }

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 5);
    assert_eq!(library.skipped().len(), 3);
}

#[test]
fn test_scan_prunes_hidden_directories() {
    let dir = tempdir().unwrap();
    write(dir.path().join(".thumbnails").join("a.jpg"), b"thumb");
    write(dir.path().join("visible").join(".b.jpg"), b"hidden file");
    write(dir.path().join("visible").join("c.jpg"), b"visible file!");

    let library = Library::with_defaults(dir.path()).unwrap();
    // Hidden files are still media; only hidden directories are pruned
    assert_eq!(library.len(), 2);
    assert!(library
        .items()
        .all(|item| !item.path().to_string_lossy().contains(".thumbnails")));
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path().join("2013").join("a.jpg"), b"same photo");
    write(dir.path().join("2014").join("b.jpg"), b"same photo");
    write(dir.path().join("2014").join("c.jpg"), b"other photo");

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 2);
    assert_eq!(library.duplicates().len(), 1);
    // Sorted traversal: 2013 is seen first and stays canonical
    assert!(library.duplicates()[0].path().ends_with("2014/b.jpg"));
}

#[test]
fn test_unique_sizes_are_never_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a.jpg"), b"1");
    write(dir.path().join("b.jpg"), b"22");
    write(dir.path().join("c.jpg"), b"333");

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 3);
    assert!(library.items().all(|item| item.content_reads() == 0));
    assert!(library.items().all(|item| item.cached_identity().is_none()));
}

#[test]
fn test_same_size_different_prefix_needs_only_quick_hash() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a.jpg"), &[b'a'; 4096]);
    write(dir.path().join("b.jpg"), &[b'b'; 4096]);

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 2);
    for item in library.items() {
        assert_eq!(item.content_reads(), 1);
    }
}

#[test]
fn test_shared_prefix_needs_full_hash() {
    let dir = tempdir().unwrap();
    let mut a = vec![0u8; 4096];
    let mut b = vec![0u8; 4096];
    a[4000] = 1;
    b[4000] = 2;
    write(dir.path().join("a.jpg"), &a);
    write(dir.path().join("b.jpg"), &b);

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 2);
    assert!(library.duplicates().is_empty());
    for item in library.items() {
        assert_eq!(item.content_reads(), 2);
    }
}

#[test]
fn test_empty_files_are_items() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a.jpg"), b"");
    write(dir.path().join("b.png"), b"");

    let library = Library::with_defaults(dir.path()).unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.duplicates().len(), 1);
}

#[test]
fn test_walker_yields_media_kinds() {
    let dir = tempdir().unwrap();
    write(dir.path().join("a.png"), b"png");
    write(dir.path().join("b.avi"), b"avi");

    let kinds: Vec<MediaKind> = Walker::new(dir.path())
        .walk()
        .filter_map(Result::ok)
        .filter_map(|found| match found {
            Discovered::Media { kind, .. } => Some(kind),
            Discovered::Skipped(_) => None,
        })
        .collect();
    assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path().join("ok.jpg"), b"fine");
    let locked = dir.path().join("locked");
    write(locked.join("secret.jpg"), b"secret");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permissions; nothing to observe in that case
    let readable = fs::read_dir(&locked).is_ok();
    let library = Library::with_defaults(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let library = library.unwrap();
    if !readable {
        assert_eq!(library.len(), 1);
        assert_eq!(library.failures().len(), 1);
    }
}
