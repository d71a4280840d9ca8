//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using jwalk, with an optional extension filter
//! - Streaming content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming, bounded memory)
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::scanner::{Walker, WalkerConfig};
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let formats: HashSet<String> = ["jpg".to_string(), "png".to_string()].into();
//! let walker = Walker::new(Path::new("."), WalkerConfig::with_formats(Some(formats)));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, DEFAULT_CHUNK_SIZE};
pub use walker::Walker;

/// A regular file discovered during the walk.
///
/// Immutable once created. The path is absolute when the walk root is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Lower-cased extensions without a leading dot.
    /// `None` or an empty set means every regular file is included.
    pub file_formats: Option<HashSet<String>>,
}

impl WalkerConfig {
    /// Create a configuration from an optional extension set.
    ///
    /// Extensions are normalized (trimmed, lower-cased, leading dots
    /// stripped), and an empty set collapses to "no filter".
    #[must_use]
    pub fn with_formats(formats: Option<HashSet<String>>) -> Self {
        let file_formats = formats
            .map(|set| {
                set.into_iter()
                    .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect::<HashSet<_>>()
            })
            .filter(|set| !set.is_empty());
        Self { file_formats }
    }

    /// Whether an extension filter is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.file_formats.is_some()
    }

    /// Check whether a path passes the extension filter.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let Some(formats) = &self.file_formats else {
            return true;
        };
        match path.extension() {
            Some(ext) => formats.contains(&ext.to_string_lossy().to_lowercase()),
            None => false,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    HashError(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error for the given path.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
            Self::HashError(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error for the given path.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
