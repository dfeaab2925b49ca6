//! Pipeline configuration.
//!
//! Use the builder methods to customize behavior, or [`ControllerConfig::from_env`]
//! to pick up overrides from the environment.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use artifact_stream::config::ControllerConfig;
//!
//! let config = ControllerConfig::default()
//!     .with_settle_window(Duration::from_millis(33))
//!     .with_max_marker_len(1024);
//! assert_eq!(config.parser.max_marker_len, 1024);
//! ```

use std::time::Duration;

/// Default debounce window, roughly one display frame.
pub const DEFAULT_SETTLE_WINDOW_MS: u64 = 16;

/// Default upper bound for a single unclosed marker.
pub const DEFAULT_MAX_MARKER_LEN: usize = 4096;

/// Environment variable overriding the settling window in milliseconds.
pub const SETTLE_MS_ENV: &str = "ARTIFACT_STREAM_SETTLE_MS";

/// Environment variable overriding the marker length bound in bytes.
pub const MAX_MARKER_LEN_ENV: &str = "ARTIFACT_STREAM_MAX_MARKER_LEN";

/// Parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Bytes a marker may span, `<` through `>` (bounds the carry-over buffer)
    pub max_marker_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_marker_len: DEFAULT_MAX_MARKER_LEN,
        }
    }
}

/// Configuration for a [`SessionController`](crate::session::SessionController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Coalescer debounce interval
    pub settle_window: Duration,
    pub parser: ParserConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            settle_window: Duration::from_millis(DEFAULT_SETTLE_WINDOW_MS),
            parser: ParserConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `ARTIFACT_STREAM_SETTLE_MS` and
    /// `ARTIFACT_STREAM_MAX_MARKER_LEN` when set to valid values.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>(SETTLE_MS_ENV) {
            config.settle_window = Duration::from_millis(ms);
        }
        if let Some(len) = read_env::<usize>(MAX_MARKER_LEN_ENV).filter(|len| *len > 0) {
            config.parser.max_marker_len = len;
        }
        config
    }

    /// Set the coalescer settling window.
    pub fn with_settle_window(mut self, window: Duration) -> Self {
        self.settle_window = window;
        self
    }

    /// Set the maximum length of an unclosed marker.
    pub fn with_max_marker_len(mut self, len: usize) -> Self {
        self.parser.max_marker_len = len;
        self
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.settle_window, Duration::from_millis(16));
        assert_eq!(config.parser.max_marker_len, 4096);
    }

    #[test]
    fn test_builder() {
        let config = ControllerConfig::new()
            .with_settle_window(Duration::from_millis(5))
            .with_max_marker_len(64);
        assert_eq!(config.settle_window, Duration::from_millis(5));
        assert_eq!(config.parser.max_marker_len, 64);
    }
}
