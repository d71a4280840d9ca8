//! Shared progress state for the scan and delete phases.
//!
//! The engine owns a [`ProgressState`] and is the only writer. Any other
//! thread may poll it, either through the individual accessors or by taking
//! a [`ProgressSnapshot`], without blocking the worker.
//!
//! Counters only ever increase and flags only ever go from `false` to
//! `true`. Flags are stored with release ordering and loaded with acquire
//! ordering, so once a reader observes a flag it also observes every write
//! the worker made before setting it (including published results).
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::duplicates::DuplicateFinder;
//!
//! let finder = DuplicateFinder::new(".", None).unwrap();
//! std::thread::scope(|s| {
//!     s.spawn(|| finder.find_duplicates());
//!     while !finder.progress().has_finished() {
//!         let snapshot = finder.snapshot();
//!         println!("{}/{} files", snapshot.processed_count, snapshot.file_count);
//!         std::thread::sleep(std::time::Duration::from_millis(100));
//!     }
//! });
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Lock-free counters and phase flags for one finder.
#[derive(Debug, Default)]
pub struct ProgressState {
    file_count: AtomicUsize,
    processed_count: AtomicUsize,
    deleted_count: AtomicUsize,
    has_found_files: AtomicBool,
    has_processed_files: AtomicBool,
    has_finished: AtomicBool,
    has_deleted: AtomicBool,
}

/// A point-in-time copy of [`ProgressState`].
///
/// Fields are read individually, so a snapshot taken while the worker is
/// running may mix values from slightly different instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Files discovered so far
    pub file_count: usize,
    /// Files hashed or skipped as size-unique so far
    pub processed_count: usize,
    /// Files removed so far
    pub deleted_count: usize,
    /// Directory walk complete
    pub has_found_files: bool,
    /// Every discovered file evaluated
    pub has_processed_files: bool,
    /// Duplicate groups finalized
    pub has_finished: bool,
    /// A deletion pass has completed
    pub has_deleted: bool,
}

impl ProgressState {
    /// Create a fresh state with all counters at zero and all flags unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files discovered so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_count.load(Ordering::Relaxed)
    }

    /// Files hashed or skipped so far.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed_count.load(Ordering::Relaxed)
    }

    /// Files removed so far.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deleted_count.load(Ordering::Relaxed)
    }

    /// Whether the directory walk is complete.
    #[must_use]
    pub fn has_found_files(&self) -> bool {
        self.has_found_files.load(Ordering::Acquire)
    }

    /// Whether every discovered file has been evaluated.
    #[must_use]
    pub fn has_processed_files(&self) -> bool {
        self.has_processed_files.load(Ordering::Acquire)
    }

    /// Whether the duplicate groups are final.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.has_finished.load(Ordering::Acquire)
    }

    /// Whether a deletion pass has completed.
    #[must_use]
    pub fn has_deleted(&self) -> bool {
        self.has_deleted.load(Ordering::Acquire)
    }

    /// Read every field into a [`ProgressSnapshot`].
    ///
    /// Flags are loaded before counters so a set flag is never paired with
    /// a counter value older than the one it was published with.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let has_found_files = self.has_found_files();
        let has_processed_files = self.has_processed_files();
        let has_finished = self.has_finished();
        let has_deleted = self.has_deleted();
        ProgressSnapshot {
            file_count: self.file_count(),
            processed_count: self.processed_count(),
            deleted_count: self.deleted_count(),
            has_found_files,
            has_processed_files,
            has_finished,
            has_deleted,
        }
    }

    pub(crate) fn inc_files_found(&self) {
        self.file_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_processed(&self, count: usize) {
        self.processed_count.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn inc_deleted(&self) {
        self.deleted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn finish_finding_files(&self) {
        self.has_found_files.store(true, Ordering::Release);
    }

    pub(crate) fn finish_processing_files(&self) {
        self.has_processed_files.store(true, Ordering::Release);
    }

    pub(crate) fn finish(&self) {
        self.has_finished.store(true, Ordering::Release);
    }

    pub(crate) fn finish_deleting(&self) {
        self.has_deleted.store(true, Ordering::Release);
    }
}
