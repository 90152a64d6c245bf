use slurp::events::LogEvents;
use slurp::library::{Insertion, Library, LibraryOptions, MergeOutcome};
use slurp::scanner::Item;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

struct Fixture {
    _lib: TempDir,
    _src: TempDir,
    library: Library,
    src: std::path::PathBuf,
}

fn fixture(library_files: &[(&str, &[u8])], source_files: &[(&str, &[u8])], rename: bool) -> Fixture {
    let lib = tempdir().unwrap();
    let src = tempdir().unwrap();
    for (name, content) in library_files {
        put(lib.path(), name, content);
    }
    for (name, content) in source_files {
        put(src.path(), name, content);
    }
    let options = LibraryOptions {
        rename_on_merge: rename,
    };
    let library = Library::open(lib.path(), options, Arc::new(LogEvents)).unwrap();
    let src_root = fs::canonicalize(src.path()).unwrap();
    Fixture {
        _lib: lib,
        _src: src,
        library,
        src: src_root,
    }
}

fn put(root: &Path, name: &str, content: &[u8]) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_camera_name_adopts_human_name_on_import() {
    let mut f = fixture(
        &[("IMG_1234.JPG", b"sunset")],
        &[("holiday/sunset.jpg", b"sunset")],
        true,
    );
    let summary = f.library.copy(&f.src).unwrap();
    let root = f.library.directory().to_path_buf();

    assert_eq!(summary.copied, 0);
    assert!(!root.join("IMG_1234.JPG").exists());
    assert_eq!(fs::read(root.join("holiday/sunset.jpg")).unwrap(), b"sunset");
    assert_eq!(f.library.len(), 1);
    assert_eq!(f.library.summary().renamed, 1);
}

#[test]
fn test_renamed_path_is_what_gets_cached() {
    let mut f = fixture(
        &[("IMG_1234.JPG", b"sunset")],
        &[("sunset.jpg", b"sunset")],
        true,
    );
    f.library.copy(&f.src).unwrap();
    f.library.save().unwrap();
    let root = f.library.directory().to_path_buf();

    let reopened = Library::with_defaults(&root).unwrap();
    assert!(reopened.get(&root.join("sunset.jpg")).is_some());
    assert!(reopened.get(&root.join("IMG_1234.JPG")).is_none());
}

#[test]
fn test_good_name_is_never_replaced() {
    let mut f = fixture(
        &[("sunset.jpg", b"sunset")],
        &[("IMG_1234.JPG", b"sunset"), ("dusk.jpg", b"sunset")],
        true,
    );
    f.library.copy(&f.src).unwrap();
    let root = f.library.directory().to_path_buf();

    assert!(root.join("sunset.jpg").exists());
    assert!(!root.join("dusk.jpg").exists());
    assert!(!root.join("IMG_1234.JPG").exists());
    assert_eq!(f.library.summary().renamed, 0);
    assert_eq!(f.library.duplicates().len(), 2);
}

#[test]
fn test_lowercase_marker_does_not_count() {
    let mut f = fixture(
        &[("img_1234.jpg", b"sunset")],
        &[("sunset.jpg", b"sunset")],
        true,
    );
    f.library.copy(&f.src).unwrap();
    assert!(f.library.directory().join("img_1234.jpg").exists());
    assert_eq!(f.library.summary().renamed, 0);
}

#[test]
fn test_rename_disabled() {
    let mut f = fixture(
        &[("IMG_1234.JPG", b"sunset")],
        &[("sunset.jpg", b"sunset")],
        false,
    );
    f.library.copy(&f.src).unwrap();
    let root = f.library.directory();

    assert!(root.join("IMG_1234.JPG").exists());
    assert!(!root.join("sunset.jpg").exists());
}

#[test]
fn test_only_first_match_is_renamed() {
    let mut f = fixture(&[("IMG_0001.jpg", b"same")], &[], true);
    let root = f.library.directory().to_path_buf();
    put(&f.src, "a/first.jpg", b"same");
    put(&f.src, "b/second.jpg", b"same");

    let first = f
        .library
        .insert(Item::new(f.src.join("a/first.jpg"), f.src.clone()))
        .unwrap();
    let second = f
        .library
        .insert(Item::new(f.src.join("b/second.jpg"), f.src.clone()))
        .unwrap();

    assert_eq!(
        first,
        Insertion::Duplicate {
            of: root.join("a/first.jpg"),
            merge: MergeOutcome::Renamed
        }
    );
    // Already carries a human name; nothing further happens
    assert_eq!(
        second,
        Insertion::Duplicate {
            of: root.join("a/first.jpg"),
            merge: MergeOutcome::Kept
        }
    );
}

#[test]
fn test_pending_camera_name_is_imported_under_better_name() {
    let mut f = fixture(
        &[],
        &[("IMG_0001.jpg", b"beach"), ("beach.jpg", b"beach")],
        true,
    );
    let summary = f.library.copy(&f.src).unwrap();
    let root = f.library.directory().to_path_buf();

    assert_eq!(summary.copied, 1);
    assert!(root.join("beach.jpg").exists());
    assert!(!root.join("IMG_0001.jpg").exists());
    // Source tree is never modified
    assert!(f.src.join("IMG_0001.jpg").exists());
    assert!(f.src.join("beach.jpg").exists());
}

#[test]
fn test_twins_inside_library_merge_on_cold_start() {
    let f = fixture(
        &[("IMG_0001.jpg", b"beach"), ("beach.jpg", b"beach")],
        &[],
        true,
    );
    let root = f.library.directory().to_path_buf();

    assert!(f.library.failures().is_empty());
    assert_eq!(f.library.summary().renamed, 1);
    assert!(!root.join("IMG_0001.jpg").exists());
    assert_eq!(fs::read(root.join("beach.jpg")).unwrap(), b"beach");
    assert!(f.library.get(&root.join("beach.jpg")).is_some());
}
