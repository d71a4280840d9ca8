//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupesearch application.
///
/// - 0: Success (including runs that found no duplicates)
/// - 1: General error (unexpected failure)
/// - 2: Usage error (bad path, bad format filter, bad configuration)
/// - 3: Every requested deletion failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Usage error: the input could not be used.
    UsageError = 2,
    /// Deletion failed: no requested file could be removed.
    DeleteFailed = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::UsageError => "DS002",
            Self::DeleteFailed => "DS003",
        }
    }

    /// Classify an application error.
    ///
    /// Errors caused by user input map to [`ExitCode::UsageError`];
    /// everything else is a general error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        use crate::config::ConfigError;
        use crate::duplicates::FinderError;
        use crate::formats::FormatError;

        let is_usage = err.chain().any(|cause| {
            cause.downcast_ref::<FormatError>().is_some()
                || cause.downcast_ref::<ConfigError>().is_some()
                || cause.downcast_ref::<FinderError>().is_some_and(|e| {
                    matches!(
                        e,
                        FinderError::PathNotFound(_) | FinderError::NotADirectory(_)
                    )
                })
        });

        if is_usage {
            Self::UsageError
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Underlying causes, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(ToString::to_string).collect(),
        }
    }
}
