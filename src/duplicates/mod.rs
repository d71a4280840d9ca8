//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping
//! - Full content hashing of same-size files
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_content, group_by_size, DuplicateGroup, GroupingStats, SizeGroup};
