//! End-to-end runs of `run_app`.
//!
//! Each run happens inside a figment `Jail` so that environment variables
//! set by the config tests cannot leak into it.

use clap::Parser;
use dupesearch::cli::Cli;
use dupesearch::error::ExitCode;
use figment::Jail;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let mut args = vec!["dupesearch", "-q", "-p", dir.to_str().unwrap()];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).unwrap()
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut result = None;
    Jail::expect_with(|_| {
        result = Some(dupesearch::run_app(cli));
        Ok(())
    });
    result.unwrap()
}

#[test]
fn test_no_duplicates_is_success() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unique.txt"), b"unique").unwrap();

    assert_eq!(run(cli(dir.path(), &[])).unwrap(), ExitCode::Success);
}

#[test]
fn test_report_only_touches_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    assert_eq!(run(cli(dir.path(), &[])).unwrap(), ExitCode::Success);
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_save_and_delete() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    let out = out_dir.path().join("dupes.json");

    let code = run(cli(dir.path(), &["-s", "-o", out.to_str().unwrap(), "-d"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());

    // The saved record still lists both copies
    let saved: Vec<Vec<String>> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].len(), 2);
}

#[test]
fn test_format_filter_limits_deletion() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"same").unwrap();
    fs::write(dir.path().join("b.jpg"), b"same").unwrap();
    fs::write(dir.path().join("c.txt"), b"same").unwrap();

    let code = run(cli(dir.path(), &["-f", "photo", "-d"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.jpg").exists());
    assert!(!dir.path().join("b.jpg").exists());
    assert!(dir.path().join("c.txt").exists());
}

#[test]
fn test_bad_format_is_usage_error() {
    let dir = tempdir().unwrap();
    let err = run(cli(dir.path(), &["-f", "fotos"])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::UsageError);
    assert!(format!("{err:#}").contains("did you mean 'photos'"));
}

#[test]
fn test_missing_path_is_usage_error() {
    let dir = tempdir().unwrap();
    let err = run(cli(&dir.path().join("missing"), &[])).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::UsageError);
}

#[test]
fn test_missing_config_file_is_usage_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = run(cli(dir.path(), &["--config", missing.to_str().unwrap()])).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::UsageError);
}
