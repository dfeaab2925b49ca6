//! Unified error type delivered to session handlers.

use thiserror::Error;

use super::category::ErrorCategory;
use super::parse::ParseError;
use super::transport::TransportError;

/// Why a session ended in `on_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A handler or the file model panicked while an event was dispatched.
    #[error("dispatch fault: {reason}")]
    Dispatch { reason: String },
}

impl SessionError {
    /// Build a dispatch error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        SessionError::Dispatch { reason }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Parse(_) => ErrorCategory::Structural,
            SessionError::Transport(_) => ErrorCategory::Transport,
            SessionError::Dispatch { .. } => ErrorCategory::Internal,
        }
    }

    /// Human-readable reason string, without the category prefix.
    pub fn reason(&self) -> String {
        match self {
            SessionError::Parse(e) => e.to_string(),
            SessionError::Transport(e) => e.to_string(),
            SessionError::Dispatch { reason } => reason.clone(),
        }
    }
}
