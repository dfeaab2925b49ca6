//! File model decorator that logs every command.

use crate::artifact::FileNode;
use crate::traits::FileModel;

/// Wraps another model and logs each command through `tracing` before
/// forwarding it.
#[derive(Debug, Clone, Default)]
pub struct TracingFileModel<M> {
    inner: M,
}

impl<M: FileModel> TracingFileModel<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M: FileModel> FileModel for TracingFileModel<M> {
    fn replace_files(&self, files: &[FileNode]) {
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        tracing::info!(count = files.len(), ?paths, "replace_files");
        self.inner.replace_files(files);
    }

    fn set_active_file(&self, file_id: &str) {
        tracing::info!(file_id, "set_active_file");
        self.inner.set_active_file(file_id);
    }

    fn update_file_content(&self, file_id: &str, content: &str) {
        tracing::debug!(file_id, len = content.len(), "update_file_content");
        self.inner.update_file_content(file_id, content);
    }
}
