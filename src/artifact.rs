//! Artifact data model.
//!
//! An [`Artifact`] is the structured payload reconstructed from the stream:
//! an ordered list of [`FileNode`]s whose content grows while the generator
//! writes them.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a single file inside an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Declared but no content has been accepted yet.
    #[default]
    Pending,
    /// Content is still arriving.
    Streaming,
    /// The file end marker was seen; content is final.
    Complete,
}

/// A named file inside an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Stable identifier (the `id` attribute, or the path when absent)
    pub id: String,
    pub path: String,
    pub content: String,
    pub status: FileStatus,
}

impl FileNode {
    /// Create a pending file with empty content.
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content: String::new(),
            status: FileStatus::Pending,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == FileStatus::Complete
    }

    /// Append streamed text.
    ///
    /// Completed files are immutable; appends to them are ignored and
    /// return false.
    pub fn append(&mut self, text: &str) -> bool {
        if self.is_complete() {
            return false;
        }
        self.status = FileStatus::Streaming;
        self.content.push_str(text);
        true
    }

    /// Mark the file as complete. Content is frozen from here on.
    pub fn complete(&mut self) {
        self.status = FileStatus::Complete;
    }
}

/// The structured payload following the preamble.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub files: Vec<FileNode>,
}

impl Artifact {
    pub fn new(id: Option<String>, title: Option<String>) -> Self {
        Self {
            id,
            title,
            files: Vec::new(),
        }
    }

    /// Look up a file by id.
    pub fn file(&self, id: &str) -> Option<&FileNode> {
        self.files.iter().find(|f| f.id == id)
    }

    /// The most recently started file, if any.
    pub fn last_file(&self) -> Option<&FileNode> {
        self.files.last()
    }

    pub(crate) fn last_file_mut(&mut self) -> Option<&mut FileNode> {
        self.files.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_is_pending_and_empty() {
        let file = FileNode::new("a", "src/a.ts");
        assert_eq!(file.status, FileStatus::Pending);
        assert!(file.content.is_empty());
    }

    #[test]
    fn test_append_moves_to_streaming() {
        let mut file = FileNode::new("a", "a.ts");
        assert!(file.append("const"));
        assert!(file.append(" x"));
        assert_eq!(file.status, FileStatus::Streaming);
        assert_eq!(file.content, "const x");
    }

    #[test]
    fn test_complete_file_is_immutable() {
        let mut file = FileNode::new("a", "a.ts");
        file.append("done");
        file.complete();
        assert!(!file.append(" more"));
        assert_eq!(file.content, "done");
        assert!(file.is_complete());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let mut file = FileNode::new("a", "a.ts");
        file.complete();
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["path"], "a.ts");
    }

    #[test]
    fn test_artifact_lookup() {
        let mut artifact = Artifact::new(Some("demo".into()), None);
        artifact.files.push(FileNode::new("one", "one.ts"));
        artifact.files.push(FileNode::new("two", "two.ts"));
        assert_eq!(artifact.file("two").map(|f| f.path.as_str()), Some("two.ts"));
        assert!(artifact.file("three").is_none());
        assert_eq!(artifact.last_file().map(|f| f.id.as_str()), Some("two"));

        let json = serde_json::to_value(&artifact).unwrap();
        assert!(json.get("title").is_none());
        assert_eq!(json["id"], "demo");
    }
}
