use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a codeplay-related operation.
pub type CodeplayResult<T> = Result<T, CodeplayError>;

/// An error that occurred while preparing or performing an execution.
#[derive(pretty_error_debug::Debug, Error)]
pub enum CodeplayError {
    /// The language id has no entry in the runtime table.
    #[error("Language \"{0}\" is not supported for execution.")]
    UnsupportedLanguage(String),

    /// The execution did not finish within the allotted time.
    #[error("Execution timed out ({}s limit).", format_seconds(*.0))]
    Timeout(std::time::Duration),

    /// The execution service answered with a non-success status.
    #[error("API error: {status} {reason}")]
    Api {
        /// The numeric HTTP status code
        status: u16,
        /// The status text accompanying the code
        reason: String,
    },

    /// The request could not be sent or its response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A body could not be encoded or decoded.
    #[error("Network error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CodeplayError {
    /// Creates an API error from a response status.
    pub fn api(status: reqwest::StatusCode) -> Self {
        Self::Api {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Whether a fresh run may succeed where this one failed.
    ///
    /// Only unsupported languages and configuration mistakes are permanent.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnsupportedLanguage(_) | Self::Config(_))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

/// Formats a duration as whole or fractional seconds, `10` for ten seconds and `0.5` for half a
/// second.
pub(crate) fn format_seconds(duration: std::time::Duration) -> String {
    let seconds = duration.as_millis() as f64 / 1000.0;
    format!("{}", seconds)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
