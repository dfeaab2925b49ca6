//! Text stream plumbing between a transport and the session controller.
//!
//! The controller consumes a [`TextStream`]: ordered text chunks, or a
//! [`TransportError`] if the source fails. This module builds such streams
//! from prepared chunks, from raw byte streams, and from a whole document
//! replayed at a fixed pace.

use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::error::TransportError;

/// The stream a session consumes.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// A stream yielding the given chunks, then ending.
pub fn from_chunks<I, S>(chunks: I) -> TextStream
where
    I: IntoIterator<Item = S>,
    I::IntoIter: Send + 'static,
    S: Into<String>,
{
    Box::pin(stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok::<String, TransportError>(chunk.into())),
    ))
}

/// Decode a byte stream into text chunks.
///
/// Network chunks split multi-byte characters freely; incomplete UTF-8
/// sequences at the end of a chunk are carried into the next one. An invalid
/// sequence, or bytes still carried when the source ends, yield
/// [`TransportError::InvalidUtf8`]. Source errors yield
/// [`TransportError::Read`]. The stream ends after the first error.
pub fn text_chunks<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    let decoder = Utf8Decoder {
        inner: Box::pin(bytes),
        carry: Vec::new(),
        offset: 0,
        finished: false,
    };

    Box::pin(stream::unfold(decoder, |mut decoder| async move {
        if decoder.finished {
            return None;
        }
        loop {
            match decoder.inner.next().await {
                Some(Ok(chunk)) => {
                    decoder.carry.extend_from_slice(chunk.as_ref());
                    match decoder.decode_ready() {
                        Ok(text) if text.is_empty() => continue,
                        Ok(text) => return Some((Ok(text), decoder)),
                        Err(err) => {
                            decoder.finished = true;
                            return Some((Err(err), decoder));
                        }
                    }
                }
                Some(Err(e)) => {
                    decoder.finished = true;
                    return Some((Err(TransportError::read(e)), decoder));
                }
                None => {
                    decoder.finished = true;
                    if decoder.carry.is_empty() {
                        return None;
                    }
                    let err = TransportError::InvalidUtf8 {
                        offset: decoder.offset,
                    };
                    return Some((Err(err), decoder));
                }
            }
        }
    }))
}

/// Replay a whole document as chunks of at most `chunk_size` bytes, pausing
/// `delay` before each one. Chunks never split a character.
pub fn replay(text: impl Into<String>, chunk_size: usize, delay: Duration) -> TextStream {
    let chunks = split_chunks(&text.into(), chunk_size);
    Box::pin(stream::iter(chunks).then(move |chunk| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok::<String, TransportError>(chunk)
    }))
}

/// Split text into pieces of at most `chunk_size` bytes on char boundaries.
///
/// A character wider than `chunk_size` gets a piece of its own.
pub fn split_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + chunk_size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(text[start..end].to_string());
        start = end;
    }
    chunks
}

struct Utf8Decoder<S> {
    inner: Pin<Box<S>>,
    /// Bytes received but not yet decoded
    carry: Vec<u8>,
    /// Bytes decoded so far, for error offsets
    offset: usize,
    finished: bool,
}

impl<S> Utf8Decoder<S> {
    /// Take the longest valid UTF-8 prefix out of the carry buffer.
    fn decode_ready(&mut self) -> Result<String, TransportError> {
        let valid = match std::str::from_utf8(&self.carry) {
            Ok(_) => self.carry.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(TransportError::InvalidUtf8 {
                    offset: self.offset + e.valid_up_to(),
                })
            }
        };

        let rest = self.carry.split_off(valid);
        let ready = std::mem::replace(&mut self.carry, rest);
        self.offset += ready.len();
        String::from_utf8(ready).map_err(|e| TransportError::InvalidUtf8 {
            offset: self.offset + e.utf8_error().valid_up_to(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(stream: TextStream) -> Vec<Result<String, TransportError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_from_chunks_preserves_order() {
        let items = collect(from_chunks(vec!["a", "b", "c"])).await;
        assert_eq!(items, vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
    }

    #[tokio::test]
    async fn test_split_multibyte_character_is_carried() {
        // "…" is E2 80 A6
        let bytes: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"think\xE2".to_vec()),
            Ok(b"\x80".to_vec()),
            Ok(b"\xA6<art".to_vec()),
        ];
        let items = collect(text_chunks(stream::iter(bytes))).await;
        assert_eq!(
            items,
            vec![Ok("think".into()), Ok("…<art".into())]
        );
    }

    #[tokio::test]
    async fn test_bytes_chunks_decode() {
        let body: Vec<Result<bytes::Bytes, std::io::Error>> = vec![
            Ok(bytes::Bytes::from_static(b"<artifact>")),
            Ok(bytes::Bytes::from_static(b"<file path=\"caf\xc3")),
            Ok(bytes::Bytes::from_static(b"\xa9.txt\">")),
        ];
        let text: Vec<String> = text_chunks(stream::iter(body))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(text.concat(), "<artifact><file path=\"caf\u{e9}.txt\">");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_transport_error() {
        let bytes: Vec<Result<Vec<u8>, std::io::Error>> =
            vec![Ok(b"ok".to_vec()), Ok(b"\xFFbad".to_vec()), Ok(b"more".to_vec())];
        let items = collect(text_chunks(stream::iter(bytes))).await;
        assert_eq!(
            items,
            vec![
                Ok("ok".into()),
                Err(TransportError::InvalidUtf8 { offset: 2 })
            ]
        );
    }

    #[tokio::test]
    async fn test_truncated_sequence_at_end_is_error() {
        let bytes: Vec<Result<Vec<u8>, std::io::Error>> = vec![Ok(b"ab\xE2\x80".to_vec())];
        let items = collect(text_chunks(stream::iter(bytes))).await;
        assert_eq!(
            items,
            vec![Ok("ab".into()), Err(TransportError::InvalidUtf8 { offset: 2 })]
        );
    }

    #[tokio::test]
    async fn test_source_error_ends_stream() {
        let bytes: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"fine".to_vec()),
            Err("connection reset".to_string()),
            Ok(b"never".to_vec()),
        ];
        let items = collect(text_chunks(stream::iter(bytes))).await;
        assert_eq!(
            items,
            vec![
                Ok("fine".into()),
                Err(TransportError::Read("connection reset".into()))
            ]
        );
    }

    #[test]
    fn test_split_chunks_respects_char_boundaries() {
        assert_eq!(split_chunks("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(split_chunks("a…b", 2), vec!["a…", "b"]);
        assert_eq!(split_chunks("", 3), Vec::<String>::new());
        assert_eq!(split_chunks("xy", 0), vec!["x", "y"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_yields_all_text() {
        let chunks: Vec<String> = replay("hello world", 3, Duration::from_millis(10))
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.concat(), "hello world");
        assert_eq!(chunks.len(), 4);
    }
}
