//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and yielding every regular file that passes the extension filter.
//!
//! # Link handling
//!
//! - Symbolic links are never followed into directories, so link cycles
//!   cannot cause infinite walks.
//! - A symbolic link that points at a regular file is reported like any other
//!   regular file, with the size of its target.
//! - Hard links are not detected; each directory entry is its own file.
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Returns a lazy iterator over [`FileEntry`] results. Errors on
    /// individual entries are yielded as [`ScanError`] values rather than
    /// stopping iteration.
    ///
    /// Children are sorted by file name, so the output order is stable for
    /// an unchanged tree.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .sort(true);

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    // Skip the root directory itself
                    if entry.depth == 0 {
                        return None;
                    }

                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }

                    let path = entry.path();

                    if !self.config.matches(&path) {
                        log::trace!("Skipping file due to format filter: {}", path.display());
                        return None;
                    }

                    self.process_file_entry(path, file_type.is_symlink())
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, &e)))
                }
            })
    }

    /// Resolve metadata for a candidate and create a FileEntry if it is a
    /// regular file.
    fn process_file_entry(
        &self,
        path: PathBuf,
        is_symlink: bool,
    ) -> Option<Result<FileEntry, ScanError>> {
        // Follows symlinks: a link to a file reports the target's size
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_io_error(&path, e))),
        };

        if metadata.is_dir() {
            log::trace!("Not following directory symlink: {}", path.display());
            return None;
        }

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        if is_symlink {
            log::trace!("Including file symlink: {}", path.display());
        }

        Some(Ok(FileEntry::new(path, metadata.len())))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: io::Error) -> ScanError {
        match error.kind() {
            io::ErrorKind::PermissionDenied => log::warn!("Permission denied: {}", path.display()),
            io::ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
            }
            _ => log::warn!("I/O error for {}: {}", path.display(), error),
        }
        ScanError::from_io(path, error)
    }

    /// Handle jwalk errors.
    fn handle_jwalk_error(&self, path: PathBuf, error: &jwalk::Error) -> ScanError {
        log::warn!("Walker error for {}: {}", path.display(), error);
        let kind = error
            .io_error()
            .map_or(io::ErrorKind::Other, io::Error::kind);
        ScanError::from_io(&path, io::Error::new(kind, error.to_string()))
    }
}
