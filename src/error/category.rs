//! Error category classification for session failures.
//!
//! Callers receive a reason string plus a coarse category; the core does not
//! otherwise distinguish structural from transport causes.

use std::fmt;

/// High-level categorization of session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The stream violated the artifact grammar (unterminated envelope,
    /// unexpected marker, nested artifact).
    Structural,

    /// The underlying stream failed to deliver data.
    Transport,

    /// A handler or file model faulted while an event was being dispatched.
    Internal,
}

impl ErrorCategory {
    /// Returns true if restarting with the same input could plausibly succeed.
    ///
    /// A structurally broken stream stays broken; a dropped connection or a
    /// transient fault in a collaborator might not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Transport | ErrorCategory::Internal)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Structural => "structural",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Structural => "The generated output was malformed",
            ErrorCategory::Transport => "The output stream was interrupted",
            ErrorCategory::Internal => "The editor failed to apply an update",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
