//! Caller-facing session callbacks.

use crate::artifact::{Artifact, FileNode};
use crate::error::SessionError;

/// Callbacks a caller passes to `SessionController::start`.
///
/// Every method has a no-op default so callers implement only what they
/// render. Methods run on the session task, synchronously with parsing.
///
/// # Example
///
/// ```
/// use artifact_stream::traits::SessionHandlers;
///
/// struct Thinking(String);
///
/// impl SessionHandlers for Thinking {
///     fn on_thinking(&mut self, text: &str) {
///         self.0 = text.to_string();
///     }
/// }
/// ```
pub trait SessionHandlers: Send {
    /// The full preamble so far. Receives `""` once when the artifact
    /// starts, signaling the preamble is finished.
    fn on_thinking(&mut self, _text: &str) {}

    fn on_artifact_start(&mut self) {}

    /// The artifact closed; `artifact` is the authoritative final snapshot.
    fn on_artifact_end(&mut self, _artifact: &Artifact) {}

    fn on_file_start(&mut self, _file: &FileNode, _artifact: &Artifact) {}

    /// Full content of `file` since its start.
    fn on_file_content(&mut self, _content: &str, _file: &FileNode) {}

    fn on_error(&mut self, _error: &SessionError) {}

    fn on_end(&mut self) {}
}

/// Handlers that ignore everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandlers;

impl SessionHandlers for NoopHandlers {}

impl<H: SessionHandlers + ?Sized> SessionHandlers for Box<H> {
    fn on_thinking(&mut self, text: &str) {
        (**self).on_thinking(text)
    }

    fn on_artifact_start(&mut self) {
        (**self).on_artifact_start()
    }

    fn on_artifact_end(&mut self, artifact: &Artifact) {
        (**self).on_artifact_end(artifact)
    }

    fn on_file_start(&mut self, file: &FileNode, artifact: &Artifact) {
        (**self).on_file_start(file, artifact)
    }

    fn on_file_content(&mut self, content: &str, file: &FileNode) {
        (**self).on_file_content(content, file)
    }

    fn on_error(&mut self, error: &SessionError) {
        (**self).on_error(error)
    }

    fn on_end(&mut self) {
        (**self).on_end()
    }
}
