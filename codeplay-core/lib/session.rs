//! Execution session controller.
//!
//! One [`ExecutionSession`] backs one interactive code block for as long as the block is open.
//! It owns the block's [`SessionState`], lets at most one run be in flight, and refuses runs that
//! start less than the configured cooldown after the previous one. Refused runs change nothing.
//!
//! State is published through a [`watch`] channel so the output panel can re-render on every
//! transition:
//!
//! ```text
//! Idle --run()--> Running --(result)--> Idle
//!  ^                                     |
//!  +-------------- reset() --------------+
//! ```

use std::{sync::Arc, time::Duration};

use scopeguard::ScopeGuard;
use tokio::{sync::watch, time::Instant};

use crate::{ExecutionRequest, ExecutionResult, Executor, RemoteExecutionClient, SessionConfig};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Observable state of an execution session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Result of the last run, `None` before the first run, while running, and after a reset
    pub current_result: Option<ExecutionResult>,

    /// Whether a run is in flight
    pub is_running: bool,

    /// When the last accepted run started
    pub last_run_at: Option<Instant>,
}

/// What happened to a call to [`ExecutionSession::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The snippet ran; the result is also stored in the session state.
    Completed(ExecutionResult),

    /// Ignored because the previous run started too recently.
    CoolingDown {
        /// Time left until a run is accepted again
        remaining: Duration,
    },

    /// Ignored because a run is already in flight.
    AlreadyRunning,
}

/// Per-code-block execution controller.
pub struct ExecutionSession<E = RemoteExecutionClient> {
    executor: Arc<E>,
    language_id: String,
    config: SessionConfig,
    timeout: Option<Duration>,
    state: watch::Sender<SessionState>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<E: Executor> ExecutionSession<E> {
    /// Create a new idle session running snippets as `language_id`.
    pub fn new(executor: Arc<E>, language_id: impl Into<String>, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionState::default());

        Self {
            executor,
            language_id: language_id.into(),
            config,
            timeout: None,
            state,
        }
    }

    /// Use `timeout` for every run instead of the executor's default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run `source_code` unless a run is in flight or the cooldown has not elapsed.
    ///
    /// The cooldown is measured from the start of the previous accepted run. A refused call
    /// leaves the state untouched. If the returned future is dropped before it completes, the
    /// session goes back to idle without a result.
    pub async fn run(&self, source_code: &str) -> RunOutcome {
        let now = Instant::now();
        let cooldown = *self.config.get_cooldown();
        let mut refused = None;

        self.state.send_if_modified(|state| {
            if state.is_running {
                refused = Some(RunOutcome::AlreadyRunning);
                return false;
            }

            if let Some(last_run_at) = state.last_run_at {
                let elapsed = now.saturating_duration_since(last_run_at);
                if elapsed < cooldown {
                    refused = Some(RunOutcome::CoolingDown {
                        remaining: cooldown - elapsed,
                    });
                    return false;
                }
            }

            state.is_running = true;
            state.current_result = None;
            state.last_run_at = Some(now);
            true
        });

        if let Some(outcome) = refused {
            tracing::debug!("ignoring {} run: {:?}", self.language_id, outcome);
            return outcome;
        }

        let running = scopeguard::guard(&self.state, |state| {
            tracing::debug!("{} run dropped before completion", self.language_id);
            state.send_modify(|state| state.is_running = false);
        });

        let request = ExecutionRequest::new(self.language_id.as_str(), source_code);
        let result = self.executor.execute(&request, self.timeout).await;

        ScopeGuard::into_inner(running).send_modify(|state| {
            state.current_result = Some(result.clone());
            state.is_running = false;
        });

        RunOutcome::Completed(result)
    }

    /// Clear the current result.
    ///
    /// The cooldown keeps running, so a reset never grants an extra run.
    pub fn reset(&self) {
        self.state
            .send_if_modified(|state| state.current_result.take().is_some());
    }

    /// Check if a call to [`run`](Self::run) would be accepted right now
    pub fn can_run(&self) -> bool {
        !self.is_running() && self.cooldown_remaining().is_zero()
    }

    /// Time left before the cooldown allows another run
    pub fn cooldown_remaining(&self) -> Duration {
        let cooldown = *self.config.get_cooldown();
        match self.state.borrow().last_run_at {
            Some(last_run_at) => cooldown.saturating_sub(last_run_at.elapsed()),
            None => Duration::ZERO,
        }
    }
}

impl<E> ExecutionSession<E> {
    /// Get the language id snippets are run as
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Check if a run is in flight
    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running
    }

    /// Get the result of the last run, if any
    pub fn current_result(&self) -> Option<ExecutionResult> {
        self.state.borrow().current_result.clone()
    }

    /// Get a snapshot of the session state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Executor that answers after `delay` and counts its calls.
    struct StubExecutor {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    impl StubExecutor {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Executor for StubExecutor {
        async fn execute(
            &self,
            request: &ExecutionRequest,
            _timeout: Option<Duration>,
        ) -> ExecutionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            ExecutionResult {
                stdout: request.source_code.clone(),
                stderr: String::new(),
                exit_code: 0,
                error: None,
            }
        }
    }

    fn session(executor: &Arc<StubExecutor>) -> ExecutionSession<StubExecutor> {
        ExecutionSession::new(executor.clone(), "python", SessionConfig::default())
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_run_stores_result() {
        let executor = StubExecutor::new(Duration::from_millis(100));
        let session = session(&executor);

        let outcome = session.run("print('hi')").await;

        let expected = ExecutionResult {
            stdout: "print('hi')".to_string(),
            stderr: String::new(),
            exit_code: 0,
            error: None,
        };
        assert_eq!(outcome, RunOutcome::Completed(expected.clone()));
        assert_eq!(session.current_result(), Some(expected));
        assert!(!session.is_running());
        assert!(session.state().last_run_at.is_some());
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_cooldown_ignores_second_run() {
        let executor = StubExecutor::new(Duration::from_millis(100));
        let session = session(&executor);

        session.run("first").await;
        let before = session.state();

        tokio::time::advance(Duration::from_millis(500)).await;
        let outcome = session.run("second").await;

        assert!(matches!(outcome, RunOutcome::CoolingDown { remaining } if remaining == Duration::from_millis(1400)));
        assert_eq!(executor.calls(), 1);
        assert_eq!(session.state(), before);
        assert!(!session.can_run());
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_cooldown_starts_at_issue_time() {
        let executor = StubExecutor::new(Duration::from_millis(3_000));
        let session = session(&executor);

        session.run("slow").await;
        assert!(session.can_run());

        let outcome = session.run("again").await;
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(executor.calls(), 2);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_run_allowed_after_cooldown() {
        let executor = StubExecutor::new(Duration::from_millis(10));
        let session = session(&executor);

        session.run("one").await;
        tokio::time::advance(Duration::from_millis(2_000)).await;
        assert_eq!(session.cooldown_remaining(), Duration::ZERO);

        let outcome = session.run("two").await;
        assert!(matches!(outcome, RunOutcome::Completed(ref r) if r.stdout == "two"));
        assert_eq!(executor.calls(), 2);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_single_run_in_flight() {
        let executor = StubExecutor::new(Duration::from_millis(500));
        let session = ExecutionSession::new(
            executor.clone(),
            "go",
            SessionConfig::builder().cooldown(Duration::ZERO).build(),
        );

        let (first, second) = tokio::join!(session.run("a"), async {
            tokio::task::yield_now().await;
            assert!(session.is_running());
            assert_eq!(session.current_result(), None);
            session.run("b").await
        });

        assert!(matches!(first, RunOutcome::Completed(_)));
        assert_eq!(second, RunOutcome::AlreadyRunning);
        assert_eq!(executor.calls(), 1);
        assert_eq!(executor.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_reset_keeps_cooldown() {
        let executor = StubExecutor::new(Duration::from_millis(10));
        let session = session(&executor);

        session.reset();
        assert_eq!(session.state(), SessionState::default());

        session.run("x").await;
        assert!(session.current_result().is_some());

        session.reset();
        assert_eq!(session.current_result(), None);
        assert!(session.state().last_run_at.is_some());

        session.reset();
        assert_eq!(session.current_result(), None);

        assert!(matches!(
            session.run("y").await,
            RunOutcome::CoolingDown { .. }
        ));
        assert_eq!(executor.calls(), 1);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_dropped_run_returns_to_idle() {
        let executor = StubExecutor::new(Duration::from_secs(60));
        let session = session(&executor);

        let outcome =
            tokio::time::timeout(Duration::from_millis(100), session.run("forever")).await;
        assert!(outcome.is_err());

        assert!(!session.is_running());
        assert_eq!(session.current_result(), None);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_subscribers_see_transitions() {
        let executor = StubExecutor::new(Duration::from_millis(50));
        let session = session(&executor);
        let mut rx = session.subscribe();

        let watcher = async {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                let done = state.current_result.is_some();
                seen.push(state.is_running);
                if done {
                    break;
                }
            }
            seen
        };

        let (seen, _) = tokio::join!(watcher, session.run("hello"));
        assert_eq!(seen, vec![true, false]);
    }
}
