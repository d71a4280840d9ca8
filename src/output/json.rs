//! JSON output for duplicate scan results.
//!
//! # Output Schema
//!
//! The document is the list of duplicate groups and nothing else: an array
//! of arrays of absolute path strings, indented with four spaces.
//!
//! ```json
//! [
//!     [
//!         "/photos/a.jpg",
//!         "/photos/backup/a.jpg"
//!     ]
//! ]
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::duplicates::DuplicateFinder;
//! use dupesearch::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(".", None).unwrap();
//! finder.find_duplicates().unwrap();
//!
//! let output = JsonOutput::new(finder.duplicates());
//! output.save_to_file(Path::new("duplicates.json")).unwrap();
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::duplicates::DuplicateGroup;

/// Indentation used for saved documents.
const INDENT: &[u8] = b"    ";

/// Serializable view of the duplicate groups.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct JsonOutput {
    /// One inner list of paths per group
    pub duplicates: Vec<Vec<String>>,
}

impl JsonOutput {
    /// Build the output from duplicate groups, preserving their order.
    ///
    /// # Example
    ///
    /// ```
    /// use dupesearch::duplicates::DuplicateGroup;
    /// use dupesearch::output::json::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     [0u8; 32],
    ///     1024,
    ///     vec![PathBuf::from("/file1.txt"), PathBuf::from("/file2.txt")],
    /// )];
    ///
    /// let output = JsonOutput::new(&groups);
    /// assert_eq!(output.to_json().unwrap(), r#"[["/file1.txt","/file2.txt"]]"#);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup]) -> Self {
        Self {
            duplicates: groups
                .iter()
                .map(|g| g.paths.iter().map(|p| p.to_string_lossy().into_owned()).collect())
                .collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize with four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, JsonOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| JsonOutputError::Encoding(e.to_string()))
    }

    /// Write the indented document to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), JsonOutputError> {
        let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Write the indented document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), JsonOutputError> {
        let file = File::create(path).map_err(|e| JsonOutputError::Create {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::info!(
            "Saved {} duplicate group(s) to {}",
            self.duplicates.len(),
            path.display()
        );
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The output file could not be created
    #[error("Cannot create {path}: {source}")]
    Create {
        /// Target file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8
    #[error("JSON output is not valid UTF-8: {0}")]
    Encoding(String),
}
