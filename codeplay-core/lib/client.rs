//! Remote execution client.
//!
//! This module provides:
//! - The [`Executor`] seam the session controller runs snippets through
//! - [`RemoteExecutionClient`], which posts one request to the execution service
//!
//! A call to [`RemoteExecutionClient::execute`] always resolves to an [`ExecutionResult`]. Every
//! failure on the way (unknown language, timeout, non-success status, network or decoding
//! failure) is folded into the result's `error` field, so callers have a single branch to render.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    ClientConfig, CodeplayError, CodeplayResult, ExecuteRequest, ExecuteResponse,
    ExecutionRequest, ExecutionResult,
};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Something that can run a snippet and report its outcome.
///
/// Implementations must resolve exactly once and must not fail: every failure is reported
/// through [`ExecutionResult::error`].
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run the request, giving up after `timeout` or the executor's own default.
    async fn execute(
        &self,
        request: &ExecutionRequest,
        timeout: Option<Duration>,
    ) -> ExecutionResult;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Client for a Piston-compatible execution service.
#[derive(Debug, Clone)]
pub struct RemoteExecutionClient {
    config: ClientConfig,
    http: Client,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RemoteExecutionClient {
    /// Create a new client with its own connection pool.
    pub fn new(config: ClientConfig) -> CodeplayResult<Self> {
        let http = Client::builder()
            .user_agent(config.get_user_agent().as_str())
            .build()?;

        Ok(Self { config, http })
    }

    /// Create a new client configured from the environment.
    pub fn from_env() -> CodeplayResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a new client that shares an existing HTTP client.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run `source_code` as `language_id` on the execution service.
    ///
    /// `timeout` defaults to the configured timeout. An unsupported language resolves
    /// immediately without touching the network.
    ///
    /// ## Example
    /// ```no_run
    /// use codeplay_core::{ClientConfig, RemoteExecutionClient};
    ///
    /// # async fn example() -> codeplay_core::CodeplayResult<()> {
    /// let client = RemoteExecutionClient::new(ClientConfig::default())?;
    /// let result = client.execute("python", "print('hi')", None).await;
    /// match result.error {
    ///     Some(error) => eprintln!("{}", error),
    ///     None => print!("{}", result.stdout),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(
        &self,
        language_id: &str,
        source_code: &str,
        timeout: Option<Duration>,
    ) -> ExecutionResult {
        let request = ExecutionRequest::new(language_id, source_code);
        Executor::execute(self, &request, timeout).await
    }

    async fn try_execute(
        &self,
        request: &ExecutionRequest,
        timeout: Duration,
    ) -> CodeplayResult<ExecutionResult> {
        let body = request.build()?;

        tracing::debug!(
            "executing {} snippet ({} bytes) on {} {}",
            request.language_id,
            request.source_code.len(),
            body.language,
            body.version
        );

        // Dropping the send future on timeout aborts the in-flight request.
        tokio::time::timeout(timeout, self.send(&body))
            .await
            .map_err(|_| CodeplayError::Timeout(timeout))?
    }

    async fn send(&self, body: &ExecuteRequest) -> CodeplayResult<ExecutionResult> {
        let response = self
            .http
            .post(self.config.get_api_url().as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CodeplayError::api(status));
        }

        let bytes = response.bytes().await?;
        let response: ExecuteResponse = serde_json::from_slice(&bytes)?;

        Ok(response.into())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl Executor for RemoteExecutionClient {
    async fn execute(
        &self,
        request: &ExecutionRequest,
        timeout: Option<Duration>,
    ) -> ExecutionResult {
        let timeout = timeout.unwrap_or(*self.config.get_timeout());

        match self.try_execute(request, timeout).await {
            Ok(result) => {
                tracing::info!(
                    "{} snippet finished with exit code {}",
                    request.language_id,
                    result.exit_code
                );
                result
            }
            Err(e) => {
                tracing::warn!("{} snippet did not run: {}", request.language_id, e);
                e.into()
            }
        }
    }
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Arc<T> {
    async fn execute(
        &self,
        request: &ExecutionRequest,
        timeout: Option<Duration>,
    ) -> ExecutionResult {
        (**self).execute(request, timeout).await
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
