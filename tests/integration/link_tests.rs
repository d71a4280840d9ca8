//! Symlink and hard link handling.
#![cfg(unix)]

use dupesearch::actions::DeleteError;
use dupesearch::duplicates::DuplicateFinder;
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

#[test]
fn test_file_symlink_is_reported() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    fs::write(&target, b"linked content").unwrap();
    symlink(&target, dir.path().join("l.txt")).unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.duplicates().len(), 1);
    assert_eq!(finder.duplicates()[0].len(), 2);
}

#[test]
fn test_symlink_to_kept_file_is_not_deleted() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    fs::write(&target, b"linked content").unwrap();
    let link = dir.path().join("l.txt");
    symlink(&target, &link).unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    let report = finder.delete_duplicates().unwrap();

    // "l.txt" is the shorter path, so it is kept; its target must survive
    assert!(target.exists());
    assert!(link.exists());
    assert_eq!(report.success_count(), 0);
    assert!(matches!(
        report.failures[0].1,
        DeleteError::SharesKeptFile { .. }
    ));
}

#[test]
fn test_directory_symlink_not_followed() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("file.txt"), b"only once").unwrap();
    symlink(&real, dir.path().join("alias")).unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.progress().file_count(), 1);
    assert!(finder.duplicates().is_empty());
}

#[test]
fn test_dangling_symlink_is_a_scan_error() {
    let dir = tempdir().unwrap();
    symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
    fs::write(dir.path().join("real.txt"), b"x").unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.progress().file_count(), 1);
    assert_eq!(finder.scan_errors().len(), 1);
    assert!(finder.scan_errors()[0].path().ends_with("dangling"));
}

#[test]
fn test_hard_links_are_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.bin");
    fs::write(&original, b"shared inode").unwrap();
    fs::hard_link(&original, dir.path().join("hard.bin")).unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    assert_eq!(finder.duplicates().len(), 1);

    let report = finder.delete_duplicates().unwrap();
    assert_eq!(report.success_count(), 1);
    assert!(dir.path().join("hard.bin").exists());
    assert!(!original.exists());
}

#[test]
fn test_symlink_to_kept_file_is_deleted() {
    let dir = tempdir().unwrap();
    let kept = dir.path().join("a.txt");
    fs::write(&kept, b"linked content").unwrap();
    let link = dir.path().join("link_to_a.txt");
    symlink(&kept, &link).unwrap();

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    assert_eq!(finder.duplicates().len(), 1);
    assert_eq!(finder.duplicates()[0].keep_candidate(), Some(kept.as_path()));

    let report = finder.delete_duplicates().unwrap();

    // Only the link goes; the kept file and its data stay
    assert!(kept.exists());
    assert!(fs::symlink_metadata(&link).is_err());
    assert_eq!(report.success_count(), 1);
    assert!(report.failures.is_empty());
    assert_eq!(finder.progress().deleted_count(), 1);
}
