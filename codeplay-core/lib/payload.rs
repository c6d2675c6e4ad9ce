//! Payload definitions for the remote execution protocol.
//!
//! This module defines:
//! - The per-run [`ExecutionRequest`] built from a page's language id and snippet
//! - The JSON body posted to the execution service
//! - The JSON body the service answers with
//!
//! Every field of the response is optional on the wire. Missing fields are filled in when the
//! response is turned into an [`ExecutionResult`](crate::ExecutionResult).

use serde::{Deserialize, Serialize};

use crate::{CodeplayResult, Language};

//--------------------------------------------------------------------------------------------------
// Types: Requests
//--------------------------------------------------------------------------------------------------

/// A single run of a snippet, as requested by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Abstract language id, e.g. `python`
    pub language_id: String,

    /// The snippet as the reader left it
    pub source_code: String,
}

/// Request body posted to the execution service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Runtime name as the service knows it
    pub language: String,

    /// Exact runtime version
    pub version: String,

    /// Source files to run, the first one being the entry point
    pub files: Vec<SourceFile>,
}

/// A source file inside an [`ExecuteRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File contents
    pub content: String,
}

//--------------------------------------------------------------------------------------------------
// Types: Responses
//--------------------------------------------------------------------------------------------------

/// Response body of a successful call to the execution service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecuteResponse {
    /// Outcome of running the program
    #[serde(default)]
    pub run: Option<RunOutput>,
}

/// Output of the program run inside the sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RunOutput {
    /// Standard output
    #[serde(default)]
    pub stdout: Option<String>,

    /// Standard error
    #[serde(default)]
    pub stderr: Option<String>,

    /// Exit code, absent when the program was killed by a signal
    #[serde(default)]
    pub code: Option<i64>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ExecutionRequest {
    /// Create a new execution request
    pub fn new(language_id: impl Into<String>, source_code: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            source_code: source_code.into(),
        }
    }

    /// Resolve the language id against the runtime table.
    pub fn language(&self) -> CodeplayResult<Language> {
        self.language_id.parse()
    }

    /// Build the wire body for this request.
    ///
    /// Fails with [`CodeplayError::UnsupportedLanguage`](crate::CodeplayError::UnsupportedLanguage)
    /// when the language id is unknown. No I/O happens here.
    pub fn build(&self) -> CodeplayResult<ExecuteRequest> {
        let config = self.language()?.config();

        Ok(ExecuteRequest {
            language: config.runtime_name.to_string(),
            version: config.runtime_version.to_string(),
            files: vec![SourceFile {
                content: self.source_code.clone(),
            }],
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
