//! Marker recognition for the artifact wire grammar.
//!
//! These helpers work on the parser's carry-over buffer. They never consume
//! input themselves; they report where a marker starts, whether it is
//! complete, or whether the buffer ends in something that could still grow
//! into one.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const ARTIFACT_OPEN: &str = "<artifact";
pub(crate) const FILE_CLOSE: &str = "</file>";

pub(crate) const ARTIFACT_TAG: &str = "artifact";
pub(crate) const FILE_TAG: &str = "file";

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^<(/)?([A-Za-z][A-Za-z0-9_:-]*)(.*?)(/)?>$").expect("static tag regex")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("static attribute regex")
});

/// Result of searching the buffer for a fixed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// The marker starts at this byte offset.
    Found(usize),
    /// The buffer ends with a proper prefix of the marker starting here.
    Partial(usize),
    /// Neither; the whole buffer is plain text.
    Absent,
}

/// Search for an exact marker, falling back to a possible partial tail.
pub(crate) fn scan_for(haystack: &str, needle: &str) -> Scan {
    if let Some(pos) = haystack.find(needle) {
        return Scan::Found(pos);
    }
    match partial_suffix(haystack, needle) {
        Some(pos) => Scan::Partial(pos),
        None => Scan::Absent,
    }
}

/// Search for the artifact open marker.
///
/// `<artifact` only counts when followed by whitespace, `>` or `/`, so
/// `<artifacts>` in the preamble stays text. A match at the very end of the
/// buffer is reported as partial since the next byte is still unknown.
pub(crate) fn scan_artifact_open(haystack: &str) -> Scan {
    let bytes = haystack.as_bytes();
    for (pos, _) in haystack.match_indices(ARTIFACT_OPEN) {
        match bytes.get(pos + ARTIFACT_OPEN.len()) {
            None => return Scan::Partial(pos),
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {
                return Scan::Found(pos)
            }
            Some(_) => {}
        }
    }
    match partial_suffix(haystack, ARTIFACT_OPEN) {
        Some(pos) => Scan::Partial(pos),
        None => Scan::Absent,
    }
}

/// Offset of the longest buffer suffix that is a proper prefix of `needle`.
///
/// Markers are ASCII and start with `<`, so any match lands on a char
/// boundary.
fn partial_suffix(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    let start = hay.len().saturating_sub(needle.len().saturating_sub(1));
    (start..hay.len()).find(|&pos| needle.starts_with(&hay[pos..]))
}

/// Where an open `<` at `start` ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagBoundary {
    /// The tag closes; the value is the offset just past `>`.
    Closed(usize),
    /// Another unquoted `<` appeared first at this offset.
    Interrupted(usize),
    /// No `>` yet, and the tag could still close within the limit.
    Open,
    /// `limit` bytes from `start` hold no `>`; the value is the offset where
    /// that window ends.
    TooLong(usize),
}

/// Find the end of the tag beginning at `start`, skipping quoted values.
///
/// A tag, `<` through `>` inclusive, spans at most `limit` bytes. The answer
/// only depends on the first `limit` bytes from `start`, so it is the same
/// however the input was chunked.
pub(crate) fn tag_boundary(haystack: &str, start: usize, limit: usize) -> TagBoundary {
    let bytes = haystack.as_bytes();
    let window_end = start.saturating_add(limit.max(1));
    let mut quote: Option<u8> = None;
    for (pos, &b) in bytes
        .iter()
        .enumerate()
        .take(window_end)
        .skip(start + 1)
    {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return TagBoundary::Closed(pos + 1),
                b'<' => return TagBoundary::Interrupted(pos),
                _ => {}
            },
        }
    }
    if bytes.len() >= window_end {
        TagBoundary::TooLong(floor_char_boundary(haystack, window_end))
    } else {
        TagBoundary::Open
    }
}

/// Largest char boundary at or below `pos`.
fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// A complete `<...>` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub name: String,
    pub closing: bool,
    pub self_closing: bool,
    pub attributes: Vec<(String, String)>,
    pub raw: String,
}

impl Tag {
    /// Parse a full marker such as `<file path="a.ts">`.
    ///
    /// Returns `None` when the text is not shaped like a tag at all.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = TAG_RE.captures(raw)?;
        let body = caps.get(3).map_or("", |m| m.as_str());
        let attributes = ATTR_RE
            .captures_iter(body)
            .map(|attr| {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .map_or("", |m| m.as_str());
                (attr[1].to_string(), decode_entities(value))
            })
            .collect();

        Some(Self {
            name: caps[2].to_string(),
            closing: caps.get(1).is_some(),
            self_closing: caps.get(4).is_some(),
            attributes,
            raw: raw.to_string(),
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
