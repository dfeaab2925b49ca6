//! Error types for the artifact stream pipeline.
//!
//! - **Structural errors** ([`ParseError`]): the stream broke the artifact grammar
//! - **Transport errors** ([`TransportError`]): the stream itself failed
//! - **Session errors** ([`SessionError`]): what handlers receive in `on_error`
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Structural | Malformed marker sequence | No |
//! | Transport | Read failure, invalid UTF-8 | Yes |
//! | Internal | Handler or model panicked | Yes |
//!
//! Rejected `start` calls are not errors. Every error is recoverable: the
//! controller is startable again as soon as `on_error` returns.

mod category;
mod parse;
mod session;
mod transport;

pub use category::ErrorCategory;
pub use parse::ParseError;
pub use session::SessionError;
pub use transport::TransportError;

/// Result alias for fallible session operations.
pub type SessionResult<T> = Result<T, SessionError>;
