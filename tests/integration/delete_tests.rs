use dupesearch::actions::DeleteError;
use dupesearch::duplicates::{DuplicateFinder, DuplicateGroup, FinderError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_delete_keeps_one_file_per_group() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");
    write_file(&dir.path().join("c.txt"), b"world");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    let report = finder.delete_duplicates().unwrap();

    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());
    assert_eq!(finder.progress().deleted_count(), 1);
    assert_eq!(report.success_count(), 1);
    assert_eq!(report.bytes_freed, 5);
    assert!(report.all_succeeded());
}

#[test]
fn test_deleted_count_matches_group_sizes() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write_file(&dir.path().join(format!("x/copy{i}.dat")), b"group one");
    }
    for i in 0..3 {
        write_file(&dir.path().join(format!("y/z/copy{i}.dat")), b"group two!");
    }
    write_file(&dir.path().join("unique.dat"), b"only me");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    let groups: Vec<DuplicateGroup> = finder.duplicates().to_vec();
    let expected: usize = groups.iter().map(|g| g.len() - 1).sum();
    assert_eq!(expected, 5);

    finder.delete_duplicates().unwrap();
    assert_eq!(finder.progress().deleted_count(), expected);

    for group in &groups {
        let remaining: Vec<_> = group.paths.iter().filter(|p| p.exists()).collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(Some(remaining[0].as_path()), group.keep_candidate());
    }
    assert!(dir.path().join("unique.dat").exists());
}

#[test]
fn test_keep_candidate_is_shortest_path() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("deeply/nested/copy.bin"), b"payload");
    write_file(&dir.path().join("zz.bin"), b"payload");
    write_file(&dir.path().join("aaaa.bin"), b"payload");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    finder.delete_duplicates().unwrap();

    assert!(dir.path().join("zz.bin").exists());
    assert!(!dir.path().join("aaaa.bin").exists());
    assert!(!dir.path().join("deeply/nested/copy.bin").exists());
}

#[test]
fn test_second_delete_is_harmless() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    finder.delete_duplicates().unwrap();

    let again = finder.delete_duplicates().unwrap();
    assert_eq!(again.success_count(), 0);
    assert!(again.failures.iter().all(|(_, e)| e.is_not_found()));
    assert_eq!(finder.progress().deleted_count(), 1);
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_no_duplicates_deletes_nothing() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"one");
    write_file(&dir.path().join("b.txt"), b"two!");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    let report = finder.delete_duplicates().unwrap();

    assert_eq!(report.total_count(), 0);
    assert!(!report.all_failed());
    assert!(finder.progress().has_deleted());
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_missing_keep_candidate_skips_group() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("bb.txt"), b"hello");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    fs::remove_file(dir.path().join("a.txt")).unwrap();
    let report = finder.delete_duplicates().unwrap();

    assert!(dir.path().join("bb.txt").exists());
    assert_eq!(report.success_count(), 0);
    assert!(matches!(
        report.failures[0].1,
        DeleteError::AllCopiesWouldBeDeleted
    ));
    assert!(report.all_failed());
    assert_eq!(finder.progress().deleted_count(), 0);
}

#[test]
fn test_delete_before_scan_rejected() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    assert!(matches!(
        finder.delete_duplicates(),
        Err(FinderError::ScanNotFinished)
    ));
    assert!(!finder.progress().has_deleted());
}
