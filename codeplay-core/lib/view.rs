//! Presentation of an interactive code block.
//!
//! [`OutputView`] is what the output panel renders, derived purely from a [`SessionState`].
//! [`CodeBlock`] wires the toolbar actions (run, reset, edit) of one block to its session and to
//! the [`SourceStore`].

use std::{fmt, sync::Arc};

use crate::{
    content_id, ExecutionResult, ExecutionSession, Executor, Language, RemoteExecutionClient,
    RunOutcome, SessionConfig, SessionState, SourceStore,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Text shown when a run finished without writing anything.
pub const NO_OUTPUT_TEXT: &str = "(no output)";

/// Text shown while a run is in flight.
pub const RUNNING_TEXT: &str = "Running...";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// What the output panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputView {
    /// Nothing has run yet, or the block was reset.
    Empty,

    /// A run is in flight.
    Running,

    /// The run failed before producing program output.
    Error {
        /// The message to show in the error banner
        message: String,

        /// An external playground to try the snippet in instead
        playground_url: Option<&'static str>,
    },

    /// The program ran. Both streams may be empty.
    Output {
        /// Standard output
        stdout: String,

        /// Standard error
        stderr: String,

        /// Exit code
        exit_code: i64,
    },
}

/// An interactive code block: the original snippet, the reader's edits and the session running
/// them.
pub struct CodeBlock<E = RemoteExecutionClient> {
    content_id: String,
    language_id: String,
    original_source: String,
    source: String,
    session: ExecutionSession<E>,
    store: Option<SourceStore>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OutputView {
    /// Derive the view for a session state.
    pub fn from_state(state: &SessionState, language_id: &str) -> Self {
        match &state.current_result {
            Some(result) => Self::from_result(result, language_id),
            None if state.is_running => Self::Running,
            None => Self::Empty,
        }
    }

    /// Derive the view for a finished run.
    pub fn from_result(result: &ExecutionResult, language_id: &str) -> Self {
        match &result.error {
            Some(message) => Self::Error {
                message: message.clone(),
                playground_url: language_id
                    .parse::<Language>()
                    .ok()
                    .map(|language| language.playground_url()),
            },
            None => Self::Output {
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
                exit_code: result.exit_code,
            },
        }
    }

    /// Check if the view is an error banner
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl<E: Executor> CodeBlock<E> {
    /// Open the editor for a snippet, restoring the reader's previous edits if any.
    pub async fn open(
        original_source: impl Into<String>,
        language_id: impl Into<String>,
        executor: Arc<E>,
        config: SessionConfig,
        store: Option<SourceStore>,
    ) -> Self {
        let original_source = original_source.into();
        let language_id = language_id.into();
        let content_id = content_id(&original_source);

        let mut source = original_source.clone();
        if let Some(store) = &store {
            match store.load(&content_id, &language_id).await {
                Ok(Some(saved)) => source = saved,
                Ok(None) => {}
                Err(e) => tracing::warn!("could not restore edits for {}: {}", content_id, e),
            }
        }

        let session = ExecutionSession::new(executor, language_id.as_str(), config);

        Self {
            content_id,
            language_id,
            original_source,
            source,
            session,
            store,
        }
    }

    /// Replace the snippet text with the reader's edit and persist it.
    pub async fn edit(&mut self, source: impl Into<String>) {
        self.source = source.into();

        if let Some(store) = &self.store {
            if let Err(e) = store
                .save(&self.content_id, &self.language_id, &self.source)
                .await
            {
                tracing::warn!("could not save edits for {}: {}", self.content_id, e);
            }
        }
    }

    /// Run the current snippet text.
    pub async fn run(&self) -> RunOutcome {
        self.session.run(&self.source).await
    }

    /// Restore the original snippet, forget persisted edits and clear the output.
    pub async fn reset(&mut self) {
        self.source = self.original_source.clone();

        if let Some(store) = &self.store {
            if let Err(e) = store.clear(&self.content_id, &self.language_id).await {
                tracing::warn!("could not clear edits for {}: {}", self.content_id, e);
            }
        }

        self.session.reset();
    }

    /// Check if the run button should be disabled
    pub fn is_run_disabled(&self) -> bool {
        !self.session.can_run()
    }
}

impl<E> CodeBlock<E> {
    /// Get the stable content id of the block
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Get the language id of the block
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Get the current snippet text, as shown in the editor and copied by the copy action
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the snippet the block was opened with
    pub fn original_source(&self) -> &str {
        &self.original_source
    }

    /// Check if the reader changed the snippet
    pub fn is_modified(&self) -> bool {
        self.source != self.original_source
    }

    /// Get the session running this block
    pub fn session(&self) -> &ExecutionSession<E> {
        &self.session
    }

    /// Get the output panel view
    pub fn view(&self) -> OutputView {
        OutputView::from_state(&self.session.state(), &self.language_id)
    }

    /// Leave edit mode. The session and its result go away; persisted edits stay.
    pub fn close(self) -> String {
        self.source
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for OutputView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Running => write!(f, "{}", RUNNING_TEXT),
            Self::Error {
                message,
                playground_url,
            } => {
                write!(f, "Error: {}", message)?;
                if let Some(url) = playground_url {
                    write!(f, "\nTry it on {}", url)?;
                }
                Ok(())
            }
            Self::Output { stdout, stderr, .. } if stdout.is_empty() && stderr.is_empty() => {
                write!(f, "{}", NO_OUTPUT_TEXT)
            }
            Self::Output { stdout, stderr, .. } => {
                write!(f, "{}", stdout)?;
                if !stdout.is_empty() && !stderr.is_empty() && !stdout.ends_with('\n') {
                    writeln!(f)?;
                }
                write!(f, "{}", stderr)
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
