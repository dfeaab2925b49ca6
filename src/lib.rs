//! Artifact Stream - incremental reconstruction of streamed LLM artifacts
//!
//! A generator streams a thinking preamble followed by an `<artifact>`
//! envelope of `<file>` entries. This crate turns that chunked text into
//! lifecycle events and drives a file model at a bounded update rate:
//!
//! - [`parser`] - pure state machine from chunks to events
//! - [`session`] - single-flight controller with error recovery
//! - [`coalescer`] - latest-wins debounce for content commits
//! - [`traits`] - the file model and handler seams

pub mod adapters;
pub mod artifact;
pub mod cli;
pub mod coalescer;
pub mod config;
pub mod error;
pub mod parser;
pub mod prelude;
pub mod session;
pub mod traits;
pub mod transport;
