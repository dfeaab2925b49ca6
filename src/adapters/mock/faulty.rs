//! File model double that panics on purpose.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::artifact::FileNode;
use crate::traits::FileModel;

use super::recording::RecordingFileModel;

/// Which command makes [`PanickingFileModel`] fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFault {
    ReplaceFiles,
    SetActiveFile,
    UpdateFileContent,
}

/// Panics on the first call of the chosen command, then records every
/// command like [`RecordingFileModel`].
#[derive(Debug, Clone)]
pub struct PanickingFileModel {
    fault: ModelFault,
    tripped: Arc<AtomicBool>,
    recorder: RecordingFileModel,
}

impl PanickingFileModel {
    pub fn new(fault: ModelFault) -> Self {
        Self {
            fault,
            tripped: Arc::new(AtomicBool::new(false)),
            recorder: RecordingFileModel::new(),
        }
    }

    /// The commands accepted after (and apart from) the faulting one.
    pub fn recorder(&self) -> &RecordingFileModel {
        &self.recorder
    }

    pub fn tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    fn maybe_fault(&self, command: ModelFault) {
        if command == self.fault && !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("file model failed in {:?}", command);
        }
    }
}

impl FileModel for PanickingFileModel {
    fn replace_files(&self, files: &[FileNode]) {
        self.maybe_fault(ModelFault::ReplaceFiles);
        self.recorder.replace_files(files);
    }

    fn set_active_file(&self, file_id: &str) {
        self.maybe_fault(ModelFault::SetActiveFile);
        self.recorder.set_active_file(file_id);
    }

    fn update_file_content(&self, file_id: &str, content: &str) {
        self.maybe_fault(ModelFault::UpdateFileContent);
        self.recorder.update_file_content(file_id, content);
    }
}
