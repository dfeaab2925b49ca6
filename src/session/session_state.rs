//! Per-controller and per-session state.

use uuid::Uuid;

use crate::config::ParserConfig;
use crate::parser::StreamParser;

/// Single-flight guard for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Ready to accept `start`
    #[default]
    Idle,
    /// A session is in flight; `start` is ignored
    Active { session_id: Uuid },
}

impl SessionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Active { .. })
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            SessionPhase::Active { session_id } => Some(*session_id),
            SessionPhase::Idle => None,
        }
    }
}

/// Preamble text accumulated ahead of the artifact.
///
/// Cleared exactly once, when the artifact starts; appends after that are
/// ignored.
#[derive(Debug, Default)]
pub struct ThinkingBuffer {
    text: String,
    finalized: bool,
}

impl ThinkingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta and return the full preamble so far.
    pub fn push(&mut self, delta: &str) -> &str {
        if !self.finalized {
            self.text.push_str(delta);
        }
        &self.text
    }

    /// Clear the buffer for good. Returns false if it was already finalized.
    pub fn finalize(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        self.text.clear();
        true
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Everything one session owns. Dropped when the session ends.
#[derive(Debug)]
pub(crate) struct Session {
    pub id: Uuid,
    pub parser: StreamParser,
    pub thinking: ThinkingBuffer,
    /// The file this session last selected in the model
    pub active_file: Option<String>,
}

impl Session {
    pub fn new(id: Uuid, config: ParserConfig) -> Self {
        Self {
            id,
            parser: StreamParser::with_config(config),
            thinking: ThinkingBuffer::new(),
            active_file: None,
        }
    }
}
