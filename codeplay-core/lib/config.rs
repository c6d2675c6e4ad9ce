//! Configuration for the execution client and sessions.
//!
//! Values come from, in order of precedence:
//! - The builder, for callers that wire things up in code
//! - Environment variables, optionally loaded from a `.env` file
//! - The defaults in [`codeplay_utils`]

use std::time::Duration;

use codeplay_utils::{
    env, CODEPLAY_API_URL_ENV_VAR, CODEPLAY_COOLDOWN_MS_ENV_VAR, CODEPLAY_TIMEOUT_MS_ENV_VAR,
    DEFAULT_API_URL, DEFAULT_COOLDOWN_MS, DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use getset::Getters;
use typed_builder::TypedBuilder;

use crate::{CodeplayError, CodeplayResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Settings for the remote execution client.
#[derive(Debug, Clone, Getters, TypedBuilder)]
#[getset(get = "pub with_prefix")]
pub struct ClientConfig {
    /// Endpoint the execution request is posted to
    #[builder(default = DEFAULT_API_URL.to_string(), setter(into))]
    api_url: String,

    /// Hard ceiling for one execution when the caller does not pick one
    #[builder(default = Duration::from_millis(DEFAULT_TIMEOUT_MS))]
    timeout: Duration,

    /// User agent sent with every request
    #[builder(default = DEFAULT_USER_AGENT.to_string(), setter(into))]
    user_agent: String,
}

/// Settings for an execution session.
#[derive(Debug, Clone, Getters, TypedBuilder)]
#[getset(get = "pub with_prefix")]
pub struct SessionConfig {
    /// Minimum gap between the start of two runs
    #[builder(default = Duration::from_millis(DEFAULT_COOLDOWN_MS))]
    cooldown: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ClientConfig {
    /// Create a configuration from environment variables
    ///
    /// Environment variables:
    /// - `CODEPLAY_API_URL`: Execution endpoint (default: the public Piston endpoint)
    /// - `CODEPLAY_TIMEOUT_MS`: Default execution timeout (default: 10000)
    pub fn from_env() -> CodeplayResult<Self> {
        load_dotenv();

        let api_url =
            env::get_non_empty_var(CODEPLAY_API_URL_ENV_VAR).unwrap_or(DEFAULT_API_URL.into());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(CodeplayError::Config(format!(
                "{} must be an http(s) URL, got: {}",
                CODEPLAY_API_URL_ENV_VAR, api_url
            )));
        }

        let timeout = parse_millis(CODEPLAY_TIMEOUT_MS_ENV_VAR)?
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));
        if timeout.is_zero() {
            return Err(CodeplayError::Config(format!(
                "{} must be greater than zero",
                CODEPLAY_TIMEOUT_MS_ENV_VAR
            )));
        }

        Ok(Self::builder().api_url(api_url).timeout(timeout).build())
    }
}

impl SessionConfig {
    /// Create a configuration from environment variables
    ///
    /// Environment variables:
    /// - `CODEPLAY_COOLDOWN_MS`: Minimum gap between two runs (default: 2000)
    pub fn from_env() -> CodeplayResult<Self> {
        load_dotenv();

        let cooldown = parse_millis(CODEPLAY_COOLDOWN_MS_ENV_VAR)?
            .unwrap_or(Duration::from_millis(DEFAULT_COOLDOWN_MS));

        Ok(Self::builder().cooldown(cooldown).build())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("loaded environment from {}", path.display());
    }
}

fn parse_millis(key: &str) -> CodeplayResult<Option<Duration>> {
    env::get_non_empty_var(key)
        .map(|value| {
            value.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                CodeplayError::Config(format!(
                    "{} must be a whole number of milliseconds, got: {}",
                    key, value
                ))
            })
        })
        .transpose()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
