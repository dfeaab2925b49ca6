//! Streaming artifact parser.
//!
//! [`StreamParser`] is a pure state machine: feed it chunks in arrival order
//! and it returns the lifecycle events those chunks complete. It holds the
//! unresolved tail of the input in a carry-over buffer, so a marker split
//! across any number of chunks is only reported once it is whole.
//!
//! ```text
//! thinking text <artifact title="demo">
//!   <file path="a.ts">const x = 1</file>
//! </artifact>
//! ```

mod events;
mod markers;

pub use events::{ParseEvent, ParseState};

use crate::artifact::{Artifact, FileNode};
use crate::config::ParserConfig;
use crate::error::ParseError;
use markers::{
    scan_artifact_open, scan_for, tag_boundary, Scan, Tag, TagBoundary, ARTIFACT_TAG, FILE_CLOSE,
    FILE_TAG,
};

/// Outcome of a single state step.
enum Step {
    /// Made a transition; try again with what is left.
    Continue,
    /// Waiting on more input.
    NeedMore,
}

/// Incremental parser for one stream.
#[derive(Debug, Default)]
pub struct StreamParser {
    config: ParserConfig,
    state: ParseState,
    /// Input not yet attributed to text or a marker
    buffer: String,
    artifact: Option<Artifact>,
    ended: bool,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// The artifact built so far. Cleared when parsing fails.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Bytes held back waiting for a marker to resolve.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Discard all state and start over at `BeforePreamble`.
    pub fn reset(&mut self) {
        self.state = ParseState::BeforePreamble;
        self.buffer.clear();
        self.artifact = None;
        self.ended = false;
    }

    /// Consume one chunk and return the events it completes.
    ///
    /// After an `Error` event (or once the stream finished) further chunks
    /// produce nothing. Text after the artifact closes is ignored.
    pub fn feed(&mut self, chunk: &str) -> Vec<ParseEvent> {
        let mut events = Vec::new();
        if self.state.is_terminal() || self.ended {
            return events;
        }

        self.buffer.push_str(chunk);
        loop {
            let step = match self.state {
                ParseState::BeforePreamble | ParseState::InPreamble => {
                    self.step_preamble(&mut events)
                }
                ParseState::InArtifact => self.step_artifact(&mut events),
                ParseState::InFile => self.step_file(&mut events),
                ParseState::Done | ParseState::Failed => {
                    self.buffer.clear();
                    Ok(Step::NeedMore)
                }
            };

            match step {
                Ok(Step::Continue) => continue,
                Ok(Step::NeedMore) => break,
                Err(err) => {
                    self.fail(err, &mut events);
                    break;
                }
            }
        }
        events
    }

    /// Signal end of input.
    ///
    /// A stream ending in the preamble or after the artifact closed is
    /// graceful and yields `End` (once). Ending inside the artifact or a
    /// file is an error.
    pub fn finish(&mut self) -> Vec<ParseEvent> {
        let mut events = Vec::new();
        if self.ended || self.state == ParseState::Failed {
            return events;
        }

        match self.state {
            ParseState::BeforePreamble | ParseState::InPreamble => {
                // A held-back partial marker turned out to be plain text
                let tail = std::mem::take(&mut self.buffer);
                self.emit_preamble(tail, &mut events);
                self.state = ParseState::Done;
            }
            ParseState::Done => {}
            ParseState::InArtifact => {
                self.fail(ParseError::UnterminatedArtifact, &mut events);
                return events;
            }
            ParseState::InFile => {
                let path = self
                    .artifact
                    .as_ref()
                    .and_then(Artifact::last_file)
                    .map(|f| f.path.clone())
                    .unwrap_or_default();
                self.fail(ParseError::UnterminatedFile { path }, &mut events);
                return events;
            }
            ParseState::Failed => return events,
        }

        self.ended = true;
        tracing::trace!("stream finished gracefully");
        events.push(ParseEvent::End);
        events
    }

    fn step_preamble(&mut self, events: &mut Vec<ParseEvent>) -> Result<Step, ParseError> {
        match scan_artifact_open(&self.buffer) {
            Scan::Absent => {
                let text = std::mem::take(&mut self.buffer);
                self.emit_preamble(text, events);
                Ok(Step::NeedMore)
            }
            Scan::Partial(start) => {
                let text: String = self.buffer.drain(..start).collect();
                self.emit_preamble(text, events);
                Ok(Step::NeedMore)
            }
            Scan::Found(start) => {
                let text: String = self.buffer.drain(..start).collect();
                self.emit_preamble(text, events);

                match tag_boundary(&self.buffer, 0, self.config.max_marker_len) {
                    TagBoundary::Closed(end) => {
                        let raw: String = self.buffer.drain(..end).collect();
                        self.open_artifact(&raw, events);
                        Ok(Step::Continue)
                    }
                    TagBoundary::Interrupted(next) => {
                        // `<artifact` never closed before another `<`; it was text
                        let text: String = self.buffer.drain(..next).collect();
                        self.emit_preamble(text, events);
                        Ok(Step::Continue)
                    }
                    TagBoundary::TooLong(window) => {
                        // Prose that mentions `<artifact`; relay it and rescan after it
                        let text: String = self.buffer.drain(..window).collect();
                        tracing::trace!(len = text.len(), "oversized artifact candidate kept as text");
                        self.emit_preamble(text, events);
                        Ok(Step::Continue)
                    }
                    TagBoundary::Open => Ok(Step::NeedMore),
                }
            }
        }
    }

    fn step_artifact(&mut self, events: &mut Vec<ParseEvent>) -> Result<Step, ParseError> {
        let Some(lt) = self.buffer.find('<') else {
            // Whitespace and stray text between files carry no meaning
            self.buffer.clear();
            return Ok(Step::NeedMore);
        };
        self.buffer.drain(..lt);

        let limit = self.config.max_marker_len;
        let end = match tag_boundary(&self.buffer, 0, limit) {
            TagBoundary::Closed(end) => end,
            TagBoundary::Interrupted(next) => {
                self.buffer.drain(..next);
                return Ok(Step::Continue);
            }
            TagBoundary::TooLong(_) => return Err(ParseError::MarkerTooLong { limit }),
            TagBoundary::Open => return Ok(Step::NeedMore),
        };

        let raw: String = self.buffer.drain(..end).collect();
        let Some(tag) = Tag::parse(&raw) else {
            tracing::trace!(raw = %raw, "ignoring non-marker text inside artifact");
            return Ok(Step::Continue);
        };

        match (tag.name.as_str(), tag.closing) {
            (ARTIFACT_TAG, true) => {
                self.close_artifact(events);
                Ok(Step::Continue)
            }
            (FILE_TAG, false) => {
                self.open_file(&tag, events)?;
                Ok(Step::Continue)
            }
            (FILE_TAG, true) => Err(ParseError::UnmatchedFileEnd),
            (ARTIFACT_TAG, false) => Err(ParseError::NestedArtifact),
            _ => Err(ParseError::UnexpectedMarker { tag: tag.raw }),
        }
    }

    fn step_file(&mut self, events: &mut Vec<ParseEvent>) -> Result<Step, ParseError> {
        match scan_for(&self.buffer, FILE_CLOSE) {
            Scan::Found(pos) => {
                let text: String = self.buffer.drain(..pos).collect();
                self.buffer.drain(..FILE_CLOSE.len());
                self.append_content(&text, events);
                self.close_file();
                Ok(Step::Continue)
            }
            Scan::Partial(pos) => {
                let text: String = self.buffer.drain(..pos).collect();
                self.append_content(&text, events);
                Ok(Step::NeedMore)
            }
            Scan::Absent => {
                let text = std::mem::take(&mut self.buffer);
                self.append_content(&text, events);
                Ok(Step::NeedMore)
            }
        }
    }

    fn emit_preamble(&mut self, text: String, events: &mut Vec<ParseEvent>) {
        if text.is_empty() {
            return;
        }
        self.state = ParseState::InPreamble;
        events.push(ParseEvent::Chunk(text));
    }

    fn open_artifact(&mut self, raw: &str, events: &mut Vec<ParseEvent>) {
        let (id, title) = match Tag::parse(raw) {
            Some(tag) => (
                tag.attribute("id").map(str::to_string),
                tag.attribute("title").map(str::to_string),
            ),
            None => (None, None),
        };
        tracing::debug!(id = ?id, title = ?title, "artifact started");

        self.artifact = Some(Artifact::new(id, title));
        self.state = ParseState::InArtifact;
        events.push(ParseEvent::ArtifactStart);

        // `<artifact/>` declares an empty artifact
        if raw.ends_with("/>") {
            self.close_artifact(events);
        }
    }

    fn close_artifact(&mut self, events: &mut Vec<ParseEvent>) {
        self.state = ParseState::Done;
        self.buffer.clear();
        if let Some(artifact) = &self.artifact {
            tracing::debug!(files = artifact.files.len(), "artifact finished");
            events.push(ParseEvent::ArtifactEnd(artifact.clone()));
        }
    }

    fn open_file(&mut self, tag: &Tag, events: &mut Vec<ParseEvent>) -> Result<(), ParseError> {
        let path = tag
            .attribute("path")
            .ok_or_else(|| ParseError::MissingAttribute {
                tag: FILE_TAG.to_string(),
                attribute: "path".to_string(),
            })?;
        let id = tag.attribute("id").unwrap_or(path);

        let mut file = FileNode::new(id, path);
        if tag.self_closing {
            file.complete();
        }
        tracing::debug!(id = %file.id, path = %file.path, "file started");

        let Some(artifact) = self.artifact.as_mut() else {
            return Err(ParseError::UnexpectedMarker {
                tag: tag.raw.clone(),
            });
        };
        artifact.files.push(file.clone());
        events.push(ParseEvent::FileStart {
            file,
            artifact: artifact.clone(),
        });

        if !tag.self_closing {
            self.state = ParseState::InFile;
        }
        Ok(())
    }

    fn append_content(&mut self, text: &str, events: &mut Vec<ParseEvent>) {
        if text.is_empty() {
            return;
        }
        let Some(file) = self.artifact.as_mut().and_then(Artifact::last_file_mut) else {
            return;
        };
        if file.append(text) {
            tracing::trace!(id = %file.id, len = file.content.len(), "file content grew");
            events.push(ParseEvent::FileContent { file: file.clone() });
        }
    }

    fn close_file(&mut self) {
        if let Some(file) = self.artifact.as_mut().and_then(Artifact::last_file_mut) {
            file.complete();
        }
        self.state = ParseState::InArtifact;
    }

    fn fail(&mut self, err: ParseError, events: &mut Vec<ParseEvent>) {
        tracing::debug!(error = %err, state = ?self.state, "parse failed");
        self.state = ParseState::Failed;
        self.buffer.clear();
        self.artifact = None;
        events.push(ParseEvent::Error(err));
    }
}
