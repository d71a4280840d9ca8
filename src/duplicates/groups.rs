//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! Detection runs in two grouping steps:
//!
//! 1. [`group_by_size`] buckets files by exact byte length. Files with a
//!    length nobody else shares cannot have a duplicate and are never read.
//! 2. [`group_by_content`] buckets the surviving, hashed files by
//!    `(size, digest)` and keeps only buckets with two or more members.
//!
//! # Example
//!
//! ```
//! use dupesearch::scanner::FileEntry;
//! use dupesearch::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! // Only groups with 2+ files are potential duplicates
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::{FileEntry, Hash};

/// A group of files with the same size.
#[derive(Debug, Clone)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size
    pub files: Vec<FileEntry>,
}

impl SizeGroup {
    /// Create an empty size group.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: FileEntry) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }
}

/// Confirmed group of byte-identical files.
///
/// Always holds at least two paths, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// BLAKE3 hash of the shared content
    pub hash: Hash,
    /// File size in bytes (shared by every member)
    pub size: u64,
    /// Absolute paths of the members, sorted
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group. Paths are sorted.
    #[must_use]
    pub fn new(hash: Hash, size: u64, mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        Self { hash, size, paths }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The path retained when the group is deduplicated.
    ///
    /// The shortest path string wins; ties go to the lexicographically
    /// smaller path.
    #[must_use]
    pub fn keep_candidate(&self) -> Option<&Path> {
        self.paths
            .iter()
            .min_by(|a, b| {
                a.as_os_str()
                    .len()
                    .cmp(&b.as_os_str().len())
                    .then_with(|| a.cmp(b))
            })
            .map(PathBuf::as_path)
    }

    /// Members other than the keep-candidate.
    pub fn removal_candidates(&self) -> impl Iterator<Item = &Path> + '_ {
        let keep = self.keep_candidate();
        self.paths
            .iter()
            .map(PathBuf::as_path)
            .filter(move |p| Some(*p) != keep)
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        crate::scanner::hash_to_hex(&self.hash)
    }
}

/// Statistics from the size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files grouped
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of zero-byte files encountered
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Files with different sizes cannot be duplicates, so only groups with two
/// or more members are returned. Zero-byte files are grouped like any other
/// size: every empty file is a duplicate of every other.
///
/// # Returns
///
/// - `Vec<SizeGroup>` - Size groups with 2+ files, largest size first
/// - `GroupingStats` - Statistics about the grouping operation
///
/// # Example
///
/// ```
/// use dupesearch::scanner::FileEntry;
/// use dupesearch::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].size, 100);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileEntry>) -> (Vec<SizeGroup>, GroupingStats) {
    let mut all_groups: HashMap<u64, SizeGroup> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }

        all_groups
            .entry(file.size)
            .or_insert_with(|| SizeGroup::new(file.size))
            .add(file);
    }

    stats.unique_sizes = all_groups.len();

    let mut groups: Vec<SizeGroup> = all_groups
        .into_values()
        .filter(|group| {
            if group.has_duplicates() {
                stats.potential_duplicates += group.len();
                stats.duplicate_groups += 1;
                log::debug!(
                    "Size group {} bytes: {} potential duplicates",
                    group.size,
                    group.len()
                );
                true
            } else {
                stats.eliminated_unique += group.len();
                if let Some(file) = group.files.first() {
                    log::trace!("Eliminated unique size {}: {}", group.size, file.path.display());
                }
                false
            }
        })
        .collect();

    // Largest first so the most expensive hashing starts early
    groups.sort_by(|a, b| b.size.cmp(&a.size));

    log::info!(
        "Size grouping: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (groups, stats)
}

/// Group hashed files by `(size, digest)`.
///
/// Buckets with fewer than two paths are dropped. Paths inside a group are
/// sorted and groups are ordered by their first path, so the result is
/// deterministic for a given set of inputs.
///
/// # Example
///
/// ```
/// use dupesearch::scanner::FileEntry;
/// use dupesearch::duplicates::group_by_content;
/// use std::path::PathBuf;
///
/// let hashed = vec![
///     (FileEntry::new(PathBuf::from("/b.txt"), 5), [1u8; 32]),
///     (FileEntry::new(PathBuf::from("/a.txt"), 5), [1u8; 32]),
///     (FileEntry::new(PathBuf::from("/c.txt"), 5), [2u8; 32]),
/// ];
///
/// let groups = group_by_content(hashed);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].paths, vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")]);
/// ```
#[must_use]
pub fn group_by_content(
    hashed: impl IntoIterator<Item = (FileEntry, Hash)>,
) -> Vec<DuplicateGroup> {
    let mut buckets: HashMap<(u64, Hash), Vec<PathBuf>> = HashMap::new();
    for (file, hash) in hashed {
        buckets.entry((file.size, hash)).or_default().push(file.path);
    }

    let mut groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|((size, hash), paths)| DuplicateGroup::new(hash, size, paths))
        .collect();

    groups.sort_by(|a, b| a.paths.first().cmp(&b.paths.first()));
    groups
}
