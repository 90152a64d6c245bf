use clap::Parser;
use slurp::cli::Cli;
use slurp::error::ExitCode;
use std::fs;
use tempfile::tempdir;

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    let mut argv = vec!["slurp", "--quiet"];
    argv.extend_from_slice(args);
    slurp::run_app(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_run_creates_library_and_cache() {
    let root = tempdir().unwrap();
    let lib = root.path().join("library");
    let lib_arg = lib.to_str().unwrap();

    let code = run(&["--output", "json", lib_arg]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(lib.is_dir());
    assert!(lib.join("cache.txt").is_file());
}

#[test]
fn test_run_import_success() {
    let lib = tempdir().unwrap();
    let src = tempdir().unwrap();
    fs::write(src.path().join("a.jpg"), b"aaa").unwrap();

    let code = run(&[
        "--list",
        lib.path().to_str().unwrap(),
        src.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(lib.path().join("a.jpg").exists());

    let cache = fs::read_to_string(lib.path().join("cache.txt")).unwrap();
    assert_eq!(cache.lines().count(), 1);
}

#[test]
fn test_run_partial_success_on_collision() {
    let lib = tempdir().unwrap();
    let src = tempdir().unwrap();
    fs::write(lib.path().join("a.jpg"), b"library").unwrap();
    fs::write(src.path().join("a.jpg"), b"source!").unwrap();

    let code = run(&[lib.path().to_str().unwrap(), src.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::PartialSuccess);
    assert_eq!(fs::read(lib.path().join("a.jpg")).unwrap(), b"library");
}

#[test]
fn test_run_missing_source_is_error() {
    let lib = tempdir().unwrap();
    let missing = lib.path().join("missing");

    let err = run(&[lib.path().to_str().unwrap(), missing.to_str().unwrap()]).unwrap_err();
    assert!(format!("{err:#}").contains("Source not found"));
}

#[test]
fn test_run_no_rename_flag() {
    let lib = tempdir().unwrap();
    let src = tempdir().unwrap();
    fs::write(lib.path().join("IMG_0001.jpg"), b"beach").unwrap();
    fs::write(src.path().join("beach.jpg"), b"beach").unwrap();

    let code = run(&[
        "--no-rename",
        lib.path().to_str().unwrap(),
        src.path().to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(lib.path().join("IMG_0001.jpg").exists());
    assert!(!lib.path().join("beach.jpg").exists());
}

#[test]
fn test_run_missing_config_file_is_error() {
    let lib = tempdir().unwrap();
    let config = lib.path().join("nope.toml");

    let result = run(&[
        "--config",
        config.to_str().unwrap(),
        lib.path().to_str().unwrap(),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_run_library_with_twins_succeeds() {
    let lib = tempdir().unwrap();
    fs::write(lib.path().join("IMG_0001.jpg"), b"beach").unwrap();
    fs::write(lib.path().join("beach.jpg"), b"beach").unwrap();

    let code = run(&[lib.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(lib.path().join("beach.jpg").exists());
    assert!(!lib.path().join("IMG_0001.jpg").exists());
}
