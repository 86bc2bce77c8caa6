//! Exit codes and structured top-level errors.

use serde::Serialize;

/// Process exit codes.
///
/// - 0: completed, clusters found
/// - 1: unexpected failure
/// - 2: completed, nothing similar found (informational)
/// - 3: completed with non-fatal per-file errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and similarity clusters were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Scan completed but no clusters were found.
    NothingFound = 2,
    /// Completed, but some files failed to scan, move, or delete.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code prefix for log and JSON output.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "ID000",
            Self::GeneralError => "ID001",
            Self::NothingFound => "ID002",
            Self::PartialSuccess => "ID003",
        }
    }
}

/// Serializable error envelope for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Machine-readable code (e.g. "ID001").
    pub code: String,
    /// Numeric exit code.
    pub exit_code: i32,
    /// Human-readable message.
    pub message: String,
}

impl StructuredError {
    /// Wrap an application error with its exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
