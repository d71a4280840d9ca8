use dupesearch::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn formats(exts: &[&str]) -> Option<HashSet<String>> {
    Some(exts.iter().map(|s| (*s).to_string()).collect())
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert!(finder.duplicates().is_empty());
    let summary = finder.summary().unwrap();
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");
    write_file(&dir.path().join("c.txt"), b"world");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    let root = finder.search_path().to_path_buf();
    assert_eq!(
        finder.duplicate_paths(),
        vec![vec![root.join("a.txt"), root.join("b.txt")]]
    );
    for path in &finder.duplicate_paths()[0] {
        assert!(path.is_absolute());
    }
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"content a");
    write_file(&dir.path().join("b.txt"), b"content b");
    write_file(&dir.path().join("c.txt"), b"content cc");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert!(finder.duplicates().is_empty());
    assert_eq!(finder.summary().unwrap().total_files, 3);
}

#[test]
fn test_processed_count_matches_file_count() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        // A mix of unique sizes and same-size files with different content
        let content = match i % 4 {
            0 => vec![b'a'; 64],
            1 => vec![b'b'; 64],
            2 => vec![b'c'; i],
            _ => vec![b'a'; 64],
        };
        write_file(&dir.path().join(format!("d{}/f{i}.bin", i % 3)), &content);
    }

    let finder = DuplicateFinder::new(dir.path(), None)
        .unwrap()
        .with_config(FinderConfig::default().with_io_threads(3));
    finder.find_duplicates().unwrap();

    let snap = finder.snapshot();
    assert_eq!(snap.file_count, 40);
    assert_eq!(snap.processed_count, snap.file_count);
    assert!(snap.has_found_files && snap.has_processed_files && snap.has_finished);
}

#[test]
fn test_groups_partition_paths() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a1", "alpha"),
        ("a2", "alpha"),
        ("a3", "alpha"),
        ("b1", "bravo"),
        ("b2", "bravo"),
        ("c1", "charlie"),
    ] {
        write_file(&dir.path().join(name), content.as_bytes());
    }

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    let groups = finder.duplicates();
    assert_eq!(groups.len(), 2);

    let mut seen = HashSet::new();
    for group in groups {
        assert!(group.len() >= 2);
        for path in &group.paths {
            assert!(seen.insert(path.clone()), "{} in two groups", path.display());
        }
    }
    assert_eq!(seen.len(), 5);
}

#[test]
fn test_photo_filter_counts_only_images() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.jpg"), b"pixels");
    write_file(&dir.path().join("b.png"), b"pixels");
    write_file(&dir.path().join("c.txt"), b"pixels");

    let filter = dupesearch::formats::parse_file_formats("photo").unwrap();
    let finder = DuplicateFinder::new(dir.path(), filter).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.progress().file_count(), 2);
    assert_eq!(finder.duplicates().len(), 1);
    assert!(finder.duplicates()[0]
        .paths
        .iter()
        .all(|p| p.extension().is_some_and(|e| e != "txt")));
}

#[test]
fn test_filter_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.JPG"), b"same");
    write_file(&dir.path().join("b.jpg"), b"same");

    let finder = DuplicateFinder::new(dir.path(), formats(&["JPG"])).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.duplicates().len(), 1);
}

#[test]
fn test_empty_files_grouped() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("empty1"), b"");
    write_file(&dir.path().join("empty2"), b"");

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();

    assert_eq!(finder.duplicates().len(), 1);
    assert_eq!(finder.duplicates()[0].size, 0);
    assert_eq!(finder.summary().unwrap().reclaimable_space, 0);
}

#[test]
fn test_large_files_across_chunk_boundaries() {
    let dir = tempdir().unwrap();
    let mut big: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    write_file(&dir.path().join("big1.bin"), &big);
    write_file(&dir.path().join("big2.bin"), &big);
    // Same size, differs only in the final byte
    if let Some(last) = big.last_mut() {
        *last ^= 0xFF;
    }
    write_file(&dir.path().join("big3.bin"), &big);

    let finder = DuplicateFinder::new(dir.path(), None)
        .unwrap()
        .with_config(FinderConfig::default().with_chunk_size(4096));
    finder.find_duplicates().unwrap();

    let groups = finder.duplicates();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(!groups[0]
        .paths
        .iter()
        .any(|p| p.ends_with("big3.bin")));
}

#[test]
fn test_invalid_roots_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    write_file(&file, b"x");

    assert!(matches!(
        DuplicateFinder::new(dir.path().join("missing"), None),
        Err(FinderError::PathNotFound(_))
    ));
    assert!(matches!(
        DuplicateFinder::new(&file, None),
        Err(FinderError::NotADirectory(_))
    ));
}

#[test]
fn test_relative_root_made_absolute() {
    let finder = DuplicateFinder::new(PathBuf::from("."), None).unwrap();
    assert!(finder.search_path().is_absolute());
}

#[test]
fn test_second_scan_rejected() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    assert!(matches!(
        finder.find_duplicates(),
        Err(FinderError::AlreadyScanned)
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"secret");
    write_file(&dir.path().join("b.txt"), b"secret");
    let locked = dir.path().join("c.txt");
    write_file(&locked, b"secret");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file
    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(dir.path(), None).unwrap();
    finder.find_duplicates().unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(finder.duplicates().len(), 1);
    assert_eq!(finder.duplicates()[0].len(), 2);
    assert_eq!(finder.scan_errors().len(), 1);
    assert!(finder.scan_errors()[0].path().ends_with("c.txt"));
    assert_eq!(finder.summary().unwrap().failed_files, 1);
    assert_eq!(finder.snapshot().processed_count, 3);
}
