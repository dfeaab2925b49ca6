//! Parser states and emitted lifecycle events.

use crate::artifact::{Artifact, FileNode};
use crate::error::ParseError;

/// Position of the parser in the stream grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    /// Nothing consumed yet
    #[default]
    BeforePreamble,
    /// Consuming thinking text ahead of the artifact
    InPreamble,
    /// Between files inside the artifact envelope
    InArtifact,
    /// Inside a file envelope, accumulating content
    InFile,
    /// Artifact closed, or the stream ended gracefully
    Done,
    Failed,
}

impl ParseState {
    /// Whether the parser will still react to input.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParseState::Done | ParseState::Failed)
    }
}

/// Lifecycle events in emission order.
///
/// Valid sequences are
/// `Chunk* ArtifactStart (FileStart FileContent*)* ArtifactEnd End?`,
/// with `Error` allowed at any point as the final event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// Preamble text, exactly as it arrived (a delta, not the accumulation).
    Chunk(String),
    ArtifactStart,
    /// A new file became current. `artifact` lists every file known so far.
    FileStart { file: FileNode, artifact: Artifact },
    /// The current file grew. `file.content` is the full content since
    /// its `FileStart`.
    FileContent { file: FileNode },
    /// The artifact closed. This snapshot is authoritative.
    ArtifactEnd(Artifact),
    /// The stream ended gracefully.
    End,
    Error(ParseError),
}

impl ParseEvent {
    /// Structural events are everything except text deltas.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ParseEvent::Chunk(_) | ParseEvent::FileContent { .. })
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseEvent::Chunk(_) => "chunk",
            ParseEvent::ArtifactStart => "artifact_start",
            ParseEvent::FileStart { .. } => "file_start",
            ParseEvent::FileContent { .. } => "file_content",
            ParseEvent::ArtifactEnd(_) => "artifact_end",
            ParseEvent::End => "end",
            ParseEvent::Error(_) => "error",
        }
    }
}
