//! Output formatters for duplicate scan results.
//!
//! Results are persisted as JSON: an array of path arrays, one per group.
//!
//! # Example
//!
//! ```no_run
//! use dupesearch::duplicates::DuplicateFinder;
//! use dupesearch::output::JsonOutput;
//!
//! let finder = DuplicateFinder::new(".", None).unwrap();
//! finder.find_duplicates().unwrap();
//!
//! println!("{}", JsonOutput::new(finder.duplicates()).to_json_pretty().unwrap());
//! ```

pub mod json;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
