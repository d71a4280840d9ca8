//! Duplicate finder engine.
//!
//! # Overview
//!
//! [`DuplicateFinder`] owns one scan of one directory tree:
//! 1. **Walk** - Enumerate regular files under the root (see [`crate::scanner::walker`])
//! 2. **Size grouping** - Bucket by length; unique sizes are never read
//! 3. **Full hash** - BLAKE3 every file that shares its size, on a bounded rayon pool
//! 4. **Content grouping** - Bucket by `(size, digest)`, keep groups of 2+
//!
//! Every step advances the finder's [`ProgressState`], which another thread
//! can poll while [`DuplicateFinder::find_duplicates`] runs. Results are
//! published once, together with `has_finished`.
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::duplicates::DuplicateFinder;
//!
//! let finder = DuplicateFinder::new(".", None).unwrap();
//! finder.find_duplicates().unwrap();
//!
//! for group in finder.duplicates() {
//!     println!("{} copies of {} bytes", group.len(), group.size);
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::{group_by_content, group_by_size, DuplicateGroup};
use crate::actions::{delete_groups, DeleteReport};
use crate::progress::{ProgressSnapshot, ProgressState};
use crate::scanner::{FileEntry, Hash, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Read chunk size for hashing, in bytes.
    pub chunk_size: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            chunk_size: crate::scanner::DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the hashing chunk size (minimum 1).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Total number of files discovered
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files whose content was hashed
    pub hashed_files: usize,
    /// Number of files that could not be hashed
    pub failed_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the kept copy)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Percentage of scanned bytes that are redundant copies.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// `find_duplicates` was already called on this finder.
    #[error("This finder has already scanned its directory")]
    AlreadyScanned,

    /// Deletion was requested before a scan completed.
    #[error("No finished scan to delete from")]
    ScanNotFinished,

    /// The hashing thread pool could not be created.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An I/O error occurred while resolving the search path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Results published at the end of a scan.
#[derive(Debug)]
struct ScanOutcome {
    groups: Vec<DuplicateGroup>,
    errors: Vec<ScanError>,
    summary: ScanSummary,
}

/// Duplicate detection engine for one directory tree.
///
/// A finder scans exactly once. Every method takes `&self`, so the finder
/// can be shared with a monitoring thread (for example through
/// [`std::thread::scope`]) that polls [`DuplicateFinder::snapshot`] while
/// the scan or deletion runs.
///
/// # Example
///
/// ```no_run
/// use dupesearch::duplicates::DuplicateFinder;
/// use std::collections::HashSet;
///
/// let formats: HashSet<String> = ["jpg".to_string(), "png".to_string()].into();
/// let finder = DuplicateFinder::new("/home/user/Pictures", Some(formats)).unwrap();
/// finder.find_duplicates().unwrap();
///
/// let report = finder.delete_duplicates().unwrap();
/// println!("{}", report.summary());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    root: PathBuf,
    walker_config: WalkerConfig,
    config: FinderConfig,
    hasher: Hasher,
    progress: ProgressState,
    started: AtomicBool,
    outcome: OnceLock<ScanOutcome>,
}

impl DuplicateFinder {
    /// Create a finder for `search_path`.
    ///
    /// The path is made absolute. `file_formats` holds extensions without a
    /// leading dot; `None` or an empty set includes every file.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The path cannot be resolved
    pub fn new(
        search_path: impl AsRef<Path>,
        file_formats: Option<HashSet<String>>,
    ) -> Result<Self, FinderError> {
        let path = search_path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FinderError::PathNotFound(path.to_path_buf()),
            _ => FinderError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        let root = std::path::absolute(path).map_err(|e| FinderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = FinderConfig::default();
        Ok(Self {
            root,
            walker_config: WalkerConfig::with_formats(file_formats),
            hasher: Hasher::new().with_chunk_size(config.chunk_size),
            config,
            progress: ProgressState::new(),
            started: AtomicBool::new(false),
            outcome: OnceLock::new(),
        })
    }

    /// Replace the finder configuration.
    #[must_use]
    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.hasher = Hasher::new().with_chunk_size(config.chunk_size);
        self.config = config;
        self
    }

    /// Absolute root of the scan.
    #[must_use]
    pub fn search_path(&self) -> &Path {
        &self.root
    }

    /// Normalized extension filter, if any.
    #[must_use]
    pub fn file_formats(&self) -> Option<&HashSet<String>> {
        self.walker_config.file_formats.as_ref()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Live progress counters and flags.
    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// Point-in-time copy of the progress state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Scan the tree and publish the duplicate groups.
    ///
    /// Per-file walk and read failures do not stop the scan; they are
    /// available from [`DuplicateFinder::scan_errors`] afterwards.
    ///
    /// # Errors
    ///
    /// - `AlreadyScanned` if called more than once
    /// - `ThreadPool` if the hashing pool cannot be created
    pub fn find_duplicates(&self) -> Result<(), FinderError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(FinderError::AlreadyScanned);
        }

        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let mut errors = Vec::new();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .thread_name(|i| format!("dupesearch-hash-{i}"))
            .build()?;

        log::info!("Starting duplicate scan of {}", self.root.display());
        if let Some(formats) = self.file_formats() {
            let mut list: Vec<&str> = formats.iter().map(String::as_str).collect();
            list.sort_unstable();
            log::debug!("Extension filter: {}", list.join(", "));
        }

        // Walk and size grouping
        let walker = Walker::new(&self.root, self.walker_config.clone());
        let progress = &self.progress;
        let files = walker.walk().filter_map(|result| match result {
            Ok(file) => {
                progress.inc_files_found();
                Some(file)
            }
            Err(e) => {
                errors.push(e);
                None
            }
        });
        let (size_groups, size_stats) = group_by_size(files);
        progress.finish_finding_files();

        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.eliminated_by_size = size_stats.eliminated_unique;
        progress.add_processed(size_stats.eliminated_unique);

        log::info!(
            "Found {} files ({} total), {} walk error(s)",
            summary.total_files,
            summary.total_size_display(),
            errors.len()
        );

        // Full hash of every size-group member
        let candidates: Vec<FileEntry> = size_groups.into_iter().flat_map(|g| g.files).collect();
        log::info!("Hashing {} candidate files", candidates.len());

        let hasher = &self.hasher;
        let results: Vec<(FileEntry, Result<Hash, HashError>)> = pool.install(|| {
            candidates
                .into_par_iter()
                .map(|file| {
                    let result = hasher.full_hash(&file.path);
                    progress.add_processed(1);
                    (file, result)
                })
                .collect()
        });

        let mut hashed = Vec::with_capacity(results.len());
        for (file, result) in results {
            match result {
                Ok(hash) => hashed.push((file, hash)),
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    summary.failed_files += 1;
                    errors.push(ScanError::from(e));
                }
            }
        }
        summary.hashed_files = hashed.len();
        progress.finish_processing_files();

        // Content grouping
        let groups = group_by_content(hashed);
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        self.outcome
            .set(ScanOutcome {
                groups,
                errors,
                summary,
            })
            .map_err(|_| FinderError::AlreadyScanned)?;
        progress.finish();

        Ok(())
    }

    /// Delete every group member except its keep-candidate.
    ///
    /// Safe to call more than once; files already gone are reported as
    /// failures in the returned [`DeleteReport`] rather than errors.
    ///
    /// # Errors
    ///
    /// Returns `ScanNotFinished` if [`DuplicateFinder::find_duplicates`]
    /// has not completed.
    pub fn delete_duplicates(&self) -> Result<DeleteReport, FinderError> {
        let outcome = self.outcome.get().ok_or(FinderError::ScanNotFinished)?;
        Ok(delete_groups(&outcome.groups, &self.progress))
    }

    /// Final duplicate groups; empty until the scan has finished.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateGroup] {
        self.outcome.get().map_or(&[], |o| o.groups.as_slice())
    }

    /// Duplicate groups as plain path lists.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<Vec<PathBuf>> {
        self.duplicates().iter().map(|g| g.paths.clone()).collect()
    }

    /// Per-file errors collected during the scan.
    #[must_use]
    pub fn scan_errors(&self) -> &[ScanError] {
        self.outcome.get().map_or(&[], |o| o.errors.as_slice())
    }

    /// Scan statistics, once the scan has finished.
    #[must_use]
    pub fn summary(&self) -> Option<&ScanSummary> {
        self.outcome.get().map(|o| &o.summary)
    }
}
