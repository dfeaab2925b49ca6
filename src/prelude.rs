//! Prelude module for convenient imports.
//!
//! ```ignore
//! use artifact_stream::prelude::*;
//! ```

pub use crate::artifact::{Artifact, FileNode, FileStatus};
pub use crate::config::{ControllerConfig, ParserConfig};
pub use crate::error::{ErrorCategory, ParseError, SessionError, TransportError};
pub use crate::parser::{ParseEvent, ParseState, StreamParser};
pub use crate::session::{SessionController, SessionOutcome};
pub use crate::traits::{FileModel, SessionHandlers};
pub use crate::transport::TextStream;
