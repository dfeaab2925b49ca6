//! File model command interface.
//!
//! The file model is the UI's system of record for file content and
//! selection. The pipeline only ever writes to it; nothing here reads state
//! back.

use std::sync::{Arc, RwLock};

use crate::artifact::FileNode;

/// Commands the pipeline issues to the file model.
///
/// Implementations must tolerate being called from the session task and
/// from the coalescer's timer task, hence `Send + Sync` and `&self`.
pub trait FileModel: Send + Sync {
    /// Replace the whole file list with this ordered snapshot.
    fn replace_files(&self, files: &[FileNode]);

    /// Select the file the editor should show.
    fn set_active_file(&self, file_id: &str);

    /// Set the content of one file. Low priority; a later `replace_files`
    /// may supersede it.
    fn update_file_content(&self, file_id: &str, content: &str);
}

/// Model that drops every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFileModel;

impl FileModel for NullFileModel {
    fn replace_files(&self, _files: &[FileNode]) {}
    fn set_active_file(&self, _file_id: &str) {}
    fn update_file_content(&self, _file_id: &str, _content: &str) {}
}

/// Shared, rebindable reference to the current file model.
///
/// Hosts that rebuild their model (or its update callbacks) rebind the handle
/// instead of restarting the pipeline. Every command resolves the handle at
/// the moment it is issued, so a late coalescer commit reaches whichever
/// model is bound when the timer fires.
#[derive(Clone)]
pub struct ModelHandle {
    inner: Arc<RwLock<Arc<dyn FileModel>>>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn FileModel>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// Swap the bound model.
    pub fn bind(&self, model: Arc<dyn FileModel>) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = model;
    }

    /// The model bound right now.
    pub fn current(&self) -> Arc<dyn FileModel> {
        let guard = match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&guard)
    }
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new(Arc::new(NullFileModel))
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle").finish_non_exhaustive()
    }
}

impl FileModel for ModelHandle {
    fn replace_files(&self, files: &[FileNode]) {
        self.current().replace_files(files);
    }

    fn set_active_file(&self, file_id: &str) {
        self.current().set_active_file(file_id);
    }

    fn update_file_content(&self, file_id: &str, content: &str) {
        self.current().update_file_content(file_id, content);
    }
}
