//! Trait abstractions at the pipeline's seams.
//!
//! - [`FileModel`] - write-only command target owned by the UI layer
//! - [`SessionHandlers`] - caller callbacks for one session
//!
//! Both are injected, so hosts and tests swap implementations freely.

pub mod file_model;
pub mod handlers;

pub use file_model::{FileModel, ModelHandle, NullFileModel};
pub use handlers::{NoopHandlers, SessionHandlers};
