//! File actions module.
//!
//! Removes the redundant copies of each duplicate group, keeping the member
//! with the shortest path.
//!
//! ```no_run
//! use dupesearch::actions::delete_groups;
//! use dupesearch::progress::ProgressState;
//!
//! let progress = ProgressState::new();
//! let report = delete_groups(&[], &progress);
//! println!("{}", report.summary());
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_groups, permanent_delete, validate_preserves_copy, DeleteError, DeleteReport,
    DeleteResult,
};
