//! Session controller.
//!
//! [`SessionController`] runs at most one parse at a time. It feeds stream
//! chunks to a fresh [`StreamParser`](crate::parser::StreamParser), relays
//! events to the caller's [`SessionHandlers`], sends structural commands to
//! the file model immediately, and routes content through the
//! [`UpdateCoalescer`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle --start--> Active --End/Error--> Idle
//!                   |
//!                 start (ignored)
//! ```
//!
//! Teardown happens before `on_end`/`on_error` run, so a handler may start
//! the next session from inside its callback.

mod session_state;

pub use session_state::{SessionPhase, ThinkingBuffer};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::coalescer::UpdateCoalescer;
use crate::config::ControllerConfig;
use crate::error::{SessionError, SessionResult};
use crate::parser::ParseEvent;
use crate::traits::{FileModel, ModelHandle, SessionHandlers};
use crate::transport::TextStream;
use session_state::Session;

/// How a session ended, as seen by whoever awaited it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stream finished gracefully and `on_end` ran.
    Completed,
    /// `on_error` ran with this error.
    Failed(SessionError),
    /// Another session was active; nothing happened.
    Rejected,
}

/// What dispatching one event means for the session.
enum Flow {
    Continue,
    Ended,
}

struct ControllerInner {
    config: ControllerConfig,
    model: ModelHandle,
    coalescer: UpdateCoalescer,
    phase: Mutex<SessionPhase>,
}

/// Single-flight driver for artifact streams.
///
/// Cheap to clone; clones share the same guard, model binding and
/// coalescer.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

impl SessionController {
    pub fn new(model: Arc<dyn FileModel>) -> Self {
        Self::with_config(ControllerConfig::default(), model)
    }

    pub fn with_config(config: ControllerConfig, model: Arc<dyn FileModel>) -> Self {
        let model = ModelHandle::new(model);
        let coalescer = UpdateCoalescer::new(config.settle_window, model.clone());
        Self {
            inner: Arc::new(ControllerInner {
                config,
                model,
                coalescer,
                phase: Mutex::new(SessionPhase::Idle),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Point all future commands, including a pending coalesced commit, at
    /// a different model.
    pub fn bind_model(&self, model: Arc<dyn FileModel>) {
        self.inner.model.bind(model);
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase_guard()
    }

    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// Start a session on a spawned task.
    ///
    /// Returns `None` without touching anything when a session is already
    /// active. Must be called from within a tokio runtime.
    pub fn start<H>(&self, stream: TextStream, handlers: H) -> Option<JoinHandle<SessionOutcome>>
    where
        H: SessionHandlers + 'static,
    {
        let session_id = self.try_begin()?;
        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.drive(session_id, stream, handlers).await
        }))
    }

    /// Run a session to completion on the current task.
    pub async fn run<H>(&self, stream: TextStream, handlers: H) -> SessionOutcome
    where
        H: SessionHandlers,
    {
        match self.try_begin() {
            Some(session_id) => self.drive(session_id, stream, handlers).await,
            None => SessionOutcome::Rejected,
        }
    }

    /// Cancel any pending coalesced commit. An active session keeps running.
    pub fn shutdown(&self) {
        self.inner.coalescer.cancel();
    }

    fn phase_guard(&self) -> MutexGuard<'_, SessionPhase> {
        match self.inner.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Claim the single-flight guard.
    fn try_begin(&self) -> Option<Uuid> {
        let mut phase = self.phase_guard();
        if let SessionPhase::Active { session_id } = *phase {
            tracing::debug!(%session_id, "session already active; ignoring start");
            return None;
        }

        let session_id = Uuid::new_v4();
        *phase = SessionPhase::Active { session_id };
        drop(phase);

        self.inner.coalescer.cancel();
        tracing::debug!(%session_id, "session started");
        Some(session_id)
    }

    fn release(&self, session_id: Uuid) {
        self.inner.coalescer.cancel();
        let mut phase = self.phase_guard();
        if phase.session_id() == Some(session_id) {
            *phase = SessionPhase::Idle;
        }
    }

    async fn drive<H>(
        &self,
        session_id: Uuid,
        mut stream: TextStream,
        mut handlers: H,
    ) -> SessionOutcome
    where
        H: SessionHandlers,
    {
        let mut session = Session::new(session_id, self.inner.config.parser);

        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(err) => {
                    return self.fail(&mut session, SessionError::Transport(err), &mut handlers)
                }
            };
            tracing::trace!(%session_id, len = chunk.len(), "chunk received");

            let events = session.parser.feed(&chunk);
            if let Some(outcome) = self.dispatch_all(&mut session, events, &mut handlers) {
                return outcome;
            }
        }

        let events = session.parser.finish();
        match self.dispatch_all(&mut session, events, &mut handlers) {
            Some(outcome) => outcome,
            None => self.complete(&mut session, &mut handlers),
        }
    }

    /// Dispatch events in order inside the failure boundary. Returns the
    /// outcome once the session has ended.
    fn dispatch_all<H>(
        &self,
        session: &mut Session,
        events: Vec<ParseEvent>,
        handlers: &mut H,
    ) -> Option<SessionOutcome>
    where
        H: SessionHandlers,
    {
        for event in events {
            let kind = event.kind();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.dispatch(&mut *session, event, &mut *handlers)
            }));

            let error = match result {
                Ok(Ok(Flow::Continue)) => continue,
                Ok(Ok(Flow::Ended)) => return Some(self.complete(session, handlers)),
                Ok(Err(err)) => err,
                Err(payload) => {
                    let err = SessionError::from_panic(payload);
                    tracing::warn!(
                        session_id = %session.id,
                        event = kind,
                        reason = %err.reason(),
                        "dispatch panicked"
                    );
                    err
                }
            };
            return Some(self.fail(session, error, handlers));
        }
        None
    }

    fn dispatch<H>(
        &self,
        session: &mut Session,
        event: ParseEvent,
        handlers: &mut H,
    ) -> SessionResult<Flow>
    where
        H: SessionHandlers,
    {
        let model = &self.inner.model;

        match event {
            ParseEvent::Chunk(text) => {
                let thinking = session.thinking.push(&text);
                handlers.on_thinking(thinking);
            }
            ParseEvent::ArtifactStart => {
                session.thinking.finalize();
                handlers.on_thinking("");
                handlers.on_artifact_start();
            }
            ParseEvent::FileStart { file, artifact } => {
                model.replace_files(&artifact.files);
                model.set_active_file(&file.id);
                session.active_file = Some(file.id.clone());
                handlers.on_file_start(&file, &artifact);
            }
            ParseEvent::FileContent { file } => {
                if session.active_file.as_deref() == Some(file.id.as_str()) {
                    self.inner
                        .coalescer
                        .post(file.id.clone(), file.content.clone());
                } else {
                    tracing::trace!(file_id = %file.id, "content for inactive file not committed");
                }
                handlers.on_file_content(&file.content, &file);
            }
            ParseEvent::ArtifactEnd(artifact) => {
                self.inner.coalescer.cancel();
                model.replace_files(&artifact.files);
                handlers.on_artifact_end(&artifact);
            }
            ParseEvent::End => return Ok(Flow::Ended),
            ParseEvent::Error(err) => return Err(SessionError::Parse(err)),
        }
        Ok(Flow::Continue)
    }

    /// Drop parse state and release the guard.
    fn teardown(&self, session: &mut Session) {
        session.parser.reset();
        session.active_file = None;
        self.release(session.id);
    }

    fn complete<H>(&self, session: &mut Session, handlers: &mut H) -> SessionOutcome
    where
        H: SessionHandlers,
    {
        self.teardown(session);
        let session_id = session.id;
        tracing::debug!(%session_id, "session completed");

        if catch_unwind(AssertUnwindSafe(|| handlers.on_end())).is_err() {
            tracing::warn!(%session_id, "on_end handler panicked");
        }
        SessionOutcome::Completed
    }

    fn fail<H>(&self, session: &mut Session, error: SessionError, handlers: &mut H) -> SessionOutcome
    where
        H: SessionHandlers,
    {
        self.teardown(session);
        let session_id = session.id;
        tracing::warn!(
            %session_id,
            category = %error.category(),
            reason = %error.reason(),
            "session failed"
        );

        if catch_unwind(AssertUnwindSafe(|| handlers.on_error(&error))).is_err() {
            tracing::warn!(%session_id, "on_error handler panicked");
        }
        SessionOutcome::Failed(error)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase())
            .field("config", &self.inner.config)
            .finish()
    }
}
