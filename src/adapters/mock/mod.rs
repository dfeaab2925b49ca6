//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`RecordingFileModel`] - captures every file model command in order
//! - [`RecordingHandlers`] - captures every session callback in order
//! - [`PanickingFileModel`] - faults once on a chosen command

pub mod faulty;
pub mod recording;

pub use faulty::{ModelFault, PanickingFileModel};
pub use recording::{HandlerCall, ModelCommand, RecordingFileModel, RecordingHandlers};
