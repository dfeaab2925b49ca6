//! In-memory file model.
//!
//! Applies commands to a plain file list plus an active selection. Suitable
//! as the system of record for headless hosts and as a realistic model in
//! tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::artifact::FileNode;
use crate::traits::FileModel;

#[derive(Debug, Default)]
struct ModelState {
    files: Vec<FileNode>,
    active: Option<String>,
    content_updates: usize,
}

/// Thread-safe in-memory [`FileModel`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileModel {
    state: Arc<Mutex<ModelState>>,
}

impl InMemoryFileModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ModelState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Snapshot of the current file list.
    pub fn files(&self) -> Vec<FileNode> {
        self.state().files.clone()
    }

    pub fn file(&self, id: &str) -> Option<FileNode> {
        self.state().files.iter().find(|f| f.id == id).cloned()
    }

    pub fn active_file(&self) -> Option<String> {
        self.state().active.clone()
    }

    /// How many `update_file_content` commands were applied.
    pub fn content_update_count(&self) -> usize {
        self.state().content_updates
    }
}

impl FileModel for InMemoryFileModel {
    fn replace_files(&self, files: &[FileNode]) {
        self.state().files = files.to_vec();
    }

    fn set_active_file(&self, file_id: &str) {
        self.state().active = Some(file_id.to_string());
    }

    fn update_file_content(&self, file_id: &str, content: &str) {
        let mut state = self.state();
        state.content_updates += 1;
        match state.files.iter_mut().find(|f| f.id == file_id) {
            Some(file) => file.content = content.to_string(),
            None => tracing::trace!(file_id, "content update for unknown file ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_then_update() {
        let model = InMemoryFileModel::new();
        model.replace_files(&[FileNode::new("a", "a.ts"), FileNode::new("b", "b.ts")]);
        model.set_active_file("b");
        model.update_file_content("b", "let b = 2;");

        assert_eq!(model.active_file().as_deref(), Some("b"));
        assert_eq!(model.file("b").unwrap().content, "let b = 2;");
        assert_eq!(model.file("a").unwrap().content, "");
        assert_eq!(model.content_update_count(), 1);
    }

    #[test]
    fn test_update_unknown_file_is_ignored() {
        let model = InMemoryFileModel::new();
        model.update_file_content("ghost", "boo");
        assert!(model.files().is_empty());
    }

    #[test]
    fn test_replace_is_authoritative() {
        let model = InMemoryFileModel::new();
        model.replace_files(&[FileNode::new("a", "a.ts")]);
        model.update_file_content("a", "partial");

        let mut done = FileNode::new("a", "a.ts");
        done.append("final");
        done.complete();
        model.replace_files(&[done.clone()]);
        assert_eq!(model.files(), vec![done]);
    }
}
