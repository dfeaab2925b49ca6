//! Common test utilities for integration tests.
//!
//! Fixtures for artifact transcripts, helpers for chunking input every which
//! way, and hand-fed streams for driving sessions step by step.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::*;
//!
//! let events = parse_chunks(&split_at(TRANSCRIPT, &[10, 42]));
//! assert_eq!(structural(&events), structural(&parse_chunks(&[TRANSCRIPT])));
//! ```

#![allow(dead_code)]

use artifact_stream::error::TransportError;
use artifact_stream::parser::{ParseEvent, StreamParser};
use artifact_stream::transport::TextStream;
use futures::channel::mpsc;

pub use artifact_stream::adapters::mock::{
    HandlerCall, ModelCommand, RecordingFileModel, RecordingHandlers,
};

/// A transcript with preamble, two files and markup inside file content.
pub const TRANSCRIPT: &str = concat!(
    "Let me think… I'll add a component.\n",
    "<artifact id=\"todo\" title=\"Todo &amp; list\">\n",
    "  <file path=\"src/App.tsx\">export const App = () => <div>{items}</div>;\n</file>\n",
    "  <file id=\"styles\" path=\"src/app.css\">.app { color: red; }</file>\n",
    "</artifact>\n",
    "Done."
);

/// The chunks of the basic single-file session.
pub fn basic_chunks() -> Vec<&'static str> {
    vec![
        "thinking…",
        "<artifact>",
        "<file path=\"a.ts\">",
        "const x=1",
        "</file>",
        "</artifact>",
    ]
}

/// Feed the chunks in order, then finish.
pub fn parse_chunks<S: AsRef<str>>(chunks: &[S]) -> Vec<ParseEvent> {
    let mut parser = StreamParser::new();
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(parser.feed(chunk.as_ref()));
    }
    events.extend(parser.finish());
    events
}

/// Only the events whose sequence must not depend on chunking.
pub fn structural(events: &[ParseEvent]) -> Vec<ParseEvent> {
    events.iter().filter(|e| e.is_structural()).cloned().collect()
}

/// Concatenated preamble deltas.
pub fn preamble_text(events: &[ParseEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            ParseEvent::Chunk(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Every char boundary strictly inside `text`.
pub fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices().map(|(i, _)| i).filter(|&i| i > 0).collect()
}

/// Split `text` at the given ascending byte offsets.
pub fn split_at(text: &str, cuts: &[usize]) -> Vec<String> {
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        pieces.push(text[start..cut].to_string());
        start = cut;
    }
    pieces.push(text[start..].to_string());
    pieces
}

/// One chunk per character.
pub fn char_chunks(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}

pub type ChunkSender = mpsc::UnboundedSender<Result<String, TransportError>>;

/// A stream the test feeds by hand. Dropping the sender ends the stream.
pub fn channel_stream() -> (ChunkSender, TextStream) {
    let (tx, rx) = mpsc::unbounded();
    (tx, Box::pin(rx))
}

pub fn send(tx: &ChunkSender, chunk: &str) {
    tx.unbounded_send(Ok(chunk.to_string()))
        .expect("session stream receiver dropped");
}

/// Model commands without the debounced content commits, whose presence
/// depends on scheduling.
pub fn structural_commands(model: &RecordingFileModel) -> Vec<ModelCommand> {
    model
        .commands()
        .into_iter()
        .filter(|cmd| !matches!(cmd, ModelCommand::UpdateFileContent { .. }))
        .collect()
}
