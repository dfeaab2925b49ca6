//! Recording doubles for the file model and session handlers.
//!
//! Both capture every call in order behind an `Arc`, so a test can keep one
//! clone for assertions while the pipeline owns the other.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::artifact::{Artifact, FileNode};
use crate::error::SessionError;
use crate::traits::{FileModel, SessionHandlers};

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A command received by [`RecordingFileModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCommand {
    ReplaceFiles(Vec<FileNode>),
    SetActiveFile(String),
    UpdateFileContent { file_id: String, content: String },
}

/// File model that records commands instead of applying them.
#[derive(Debug, Clone, Default)]
pub struct RecordingFileModel {
    commands: Arc<Mutex<Vec<ModelCommand>>>,
}

impl RecordingFileModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received so far, in order.
    pub fn commands(&self) -> Vec<ModelCommand> {
        lock_unpoisoned(&self.commands).clone()
    }

    /// Only the `update_file_content` commands, as `(file_id, content)`.
    pub fn content_updates(&self) -> Vec<(String, String)> {
        lock_unpoisoned(&self.commands)
            .iter()
            .filter_map(|cmd| match cmd {
                ModelCommand::UpdateFileContent { file_id, content } => {
                    Some((file_id.clone(), content.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// The file list from the most recent `replace_files`.
    pub fn last_files(&self) -> Option<Vec<FileNode>> {
        lock_unpoisoned(&self.commands)
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                ModelCommand::ReplaceFiles(files) => Some(files.clone()),
                _ => None,
            })
    }

    pub fn clear(&self) {
        lock_unpoisoned(&self.commands).clear();
    }
}

impl FileModel for RecordingFileModel {
    fn replace_files(&self, files: &[FileNode]) {
        lock_unpoisoned(&self.commands).push(ModelCommand::ReplaceFiles(files.to_vec()));
    }

    fn set_active_file(&self, file_id: &str) {
        lock_unpoisoned(&self.commands).push(ModelCommand::SetActiveFile(file_id.to_string()));
    }

    fn update_file_content(&self, file_id: &str, content: &str) {
        lock_unpoisoned(&self.commands).push(ModelCommand::UpdateFileContent {
            file_id: file_id.to_string(),
            content: content.to_string(),
        });
    }
}

/// A callback received by [`RecordingHandlers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerCall {
    Thinking(String),
    ArtifactStart,
    ArtifactEnd(Artifact),
    FileStart { file: FileNode, artifact: Artifact },
    FileContent { content: String, file: FileNode },
    Error(SessionError),
    End,
}

/// Session handlers that record every callback.
///
/// `panic_on_file_start` makes the handler fault on purpose, for exercising
/// the controller's failure boundary.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandlers {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
    panic_on_file_start: bool,
}

impl RecordingHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers that panic the first time a file starts.
    pub fn panicking_on_file_start() -> Self {
        Self {
            panic_on_file_start: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HandlerCall> {
        lock_unpoisoned(&self.calls).clone()
    }

    /// Every `on_thinking` payload in order.
    pub fn thinking(&self) -> Vec<String> {
        lock_unpoisoned(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HandlerCall::Thinking(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<SessionError> {
        lock_unpoisoned(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HandlerCall::Error(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn ended(&self) -> bool {
        lock_unpoisoned(&self.calls).contains(&HandlerCall::End)
    }

    fn record(&self, call: HandlerCall) {
        lock_unpoisoned(&self.calls).push(call);
    }
}

impl SessionHandlers for RecordingHandlers {
    fn on_thinking(&mut self, text: &str) {
        self.record(HandlerCall::Thinking(text.to_string()));
    }

    fn on_artifact_start(&mut self) {
        self.record(HandlerCall::ArtifactStart);
    }

    fn on_artifact_end(&mut self, artifact: &Artifact) {
        self.record(HandlerCall::ArtifactEnd(artifact.clone()));
    }

    fn on_file_start(&mut self, file: &FileNode, artifact: &Artifact) {
        if self.panic_on_file_start {
            self.panic_on_file_start = false;
            panic!("handler failed on {}", file.path);
        }
        self.record(HandlerCall::FileStart {
            file: file.clone(),
            artifact: artifact.clone(),
        });
    }

    fn on_file_content(&mut self, content: &str, file: &FileNode) {
        self.record(HandlerCall::FileContent {
            content: content.to_string(),
            file: file.clone(),
        });
    }

    fn on_error(&mut self, error: &SessionError) {
        self.record(HandlerCall::Error(error.clone()));
    }

    fn on_end(&mut self) {
        self.record(HandlerCall::End);
    }
}
