//! Concrete implementations of the trait abstractions.
//!
//! - [`InMemoryFileModel`] - applies commands to an in-memory file list
//! - [`TracingFileModel`] - logs commands before forwarding them
//! - [`mock`] - recording doubles for tests

pub mod memory_model;
pub mod mock;
pub mod tracing_model;

pub use memory_model::InMemoryFileModel;
pub use tracing_model::TracingFileModel;
