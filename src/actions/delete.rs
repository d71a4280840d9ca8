//! Permanent removal of duplicate files.
//!
//! # Overview
//!
//! For every [`DuplicateGroup`] the keep-candidate (shortest path, then
//! lexicographically smallest) is retained and every other member is
//! removed with [`std::fs::remove_file`]. There is no trash and no undo.
//!
//! # Safety
//!
//! - The keep-candidate is never touched.
//! - If the keep-candidate has vanished since the scan, nothing in its group
//!   is deleted.
//! - A member that resolves to the same file as the keep-candidate (a
//!   symlink and its target) is skipped.
//! - Failures are recorded per file and never stop the batch. A file that
//!   is already gone is a soft failure, so running the deleter twice is
//!   harmless.
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::actions::delete::permanent_delete;
//! use std::path::Path;
//!
//! match permanent_delete(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::progress::ProgressState;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path no longer refers to a file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// The member is the same file as the kept copy under another name.
    #[error("{path} refers to the kept file {keep}")]
    SharesKeptFile {
        /// Member that was skipped
        path: PathBuf,
        /// The retained path it resolves to
        keep: PathBuf,
    },

    /// Deleting would leave no copy (the kept file is gone).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::SharesKeptFile { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }

    /// Whether the file was simply already gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Bytes released (zero for a removed symlink).
    pub size: u64,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Outcome of a deletion pass.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, DeleteError)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl DeleteReport {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when at least one deletion was attempted and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.successes.is_empty() && !self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.success_count(),
                ByteSize::b(self.bytes_freed)
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                ByteSize::b(self.bytes_freed)
            )
        }
    }

    fn record(&mut self, path: &Path, result: Result<DeleteResult, DeleteError>) {
        match result {
            Ok(del) => {
                self.bytes_freed += del.size;
                self.successes.push(del);
            }
            Err(e) => {
                if e.is_not_found() {
                    log::debug!("Already gone: {}", path.display());
                } else {
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                }
                self.failures.push((path.to_path_buf(), e));
            }
        }
    }
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// A symlink is removed itself; its target is left alone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `NotAFile` if the path is now a directory
/// - `Io` for any other failure
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }

    let size = if metadata.file_type().is_symlink() {
        0
    } else {
        metadata.len()
    };

    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size))
}

/// Validate that a selection doesn't delete all copies.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if nothing in `group_paths` would
/// survive.
///
/// # Example
///
/// ```
/// use dupesearch::actions::delete::validate_preserves_copy;
/// use std::path::PathBuf;
///
/// let group = vec![
///     PathBuf::from("/original.txt"),
///     PathBuf::from("/copy1.txt"),
/// ];
///
/// assert!(validate_preserves_copy(&[PathBuf::from("/copy1.txt")], &group).is_ok());
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(
    selected_paths: &[PathBuf],
    group_paths: &[PathBuf],
) -> Result<(), DeleteError> {
    let selected_set: HashSet<&PathBuf> = selected_paths.iter().collect();
    let preserved_count = group_paths
        .iter()
        .filter(|p| !selected_set.contains(p))
        .count();

    if preserved_count == 0 {
        log::error!(
            "Attempted to delete all {} copies of a duplicate group",
            group_paths.len()
        );
        Err(DeleteError::AllCopiesWouldBeDeleted)
    } else {
        Ok(())
    }
}

/// Delete every non-kept member of one group into `report`.
fn delete_group(group: &DuplicateGroup, progress: &ProgressState, report: &mut DeleteReport) {
    let Some(keep) = group.keep_candidate() else {
        return;
    };
    let removals: Vec<PathBuf> = group.removal_candidates().map(Path::to_path_buf).collect();

    if let Err(e) = validate_preserves_copy(&removals, &group.paths) {
        for path in &removals {
            report.record(path, Err(DeleteError::AllCopiesWouldBeDeleted));
        }
        log::warn!("Skipping group {}: {}", group.hash_hex(), e);
        return;
    }

    // The kept copy must still exist before anything else goes
    let keep_resolved = match fs::canonicalize(keep) {
        Ok(p) => p,
        Err(e) => {
            log::warn!(
                "Kept file {} is no longer accessible ({}), skipping its group",
                keep.display(),
                e
            );
            for path in &removals {
                report.record(path, Err(DeleteError::AllCopiesWouldBeDeleted));
            }
            return;
        }
    };

    for path in &removals {
        // Removing a link to the kept file is fine; removing the file a kept link points at is not
        let is_symlink = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
        if !is_symlink && fs::canonicalize(path).is_ok_and(|p| p == keep_resolved) {
            report.record(
                path,
                Err(DeleteError::SharesKeptFile {
                    path: path.clone(),
                    keep: keep.to_path_buf(),
                }),
            );
            continue;
        }

        let result = permanent_delete(path);
        if result.is_ok() {
            progress.inc_deleted();
        }
        report.record(path, result);
    }
}

/// Delete all but the keep-candidate of every group.
///
/// Advances `deleted_count` once per removed file and sets `has_deleted`
/// when the pass is over.
pub fn delete_groups(groups: &[DuplicateGroup], progress: &ProgressState) -> DeleteReport {
    let mut report = DeleteReport::default();

    log::info!(
        "Deleting duplicates from {} group(s) ({} file(s))",
        groups.len(),
        groups.iter().map(DuplicateGroup::duplicate_count).sum::<usize>()
    );

    for group in groups {
        delete_group(group, progress, &mut report);
    }

    progress.finish_deleting();
    log::info!("{}", report.summary());

    report
}
