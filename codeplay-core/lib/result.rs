//! The normalized outcome of a run.

use serde::{Deserialize, Serialize};

use crate::{CodeplayError, ExecuteResponse};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Exit code reported when the program's own exit code is unknown.
pub const FAILURE_EXIT_CODE: i64 = 1;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Represents one completed or failed run of a snippet.
///
/// `stdout`, `stderr` and `exit_code` belong to the sandboxed program. `error` is only set when
/// the run never produced program output: an unsupported language, a timeout, a non-success
/// response or a network failure. A program that exits non-zero or writes to stderr is a normal
/// outcome and leaves `error` empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Standard output of the program
    pub stdout: String,

    /// Standard error of the program
    pub stderr: String,

    /// Exit code of the program
    pub exit_code: i64,

    /// Transport or protocol failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ExecutionResult {
    /// Create a result for a run that failed before producing program output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: FAILURE_EXIT_CODE,
            error: Some(error.into()),
        }
    }

    /// Check if the run failed at the transport or protocol level
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check if the program produced no output at all
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<ExecuteResponse> for ExecutionResult {
    fn from(response: ExecuteResponse) -> Self {
        let run = response.run.unwrap_or_default();

        Self {
            stdout: run.stdout.unwrap_or_default(),
            stderr: run.stderr.unwrap_or_default(),
            exit_code: run.code.unwrap_or(FAILURE_EXIT_CODE),
            error: None,
        }
    }
}

impl From<CodeplayError> for ExecutionResult {
    fn from(error: CodeplayError) -> Self {
        Self::failure(error.to_string())
    }
}

impl From<&CodeplayError> for ExecutionResult {
    fn from(error: &CodeplayError) -> Self {
        Self::failure(error.to_string())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
