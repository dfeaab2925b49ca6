//! Structural errors raised by the stream parser.

use thiserror::Error;

/// The stream violated the artifact grammar.
///
/// Any of these terminates the session; the partially built artifact is
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("artifact opened inside another artifact")]
    NestedArtifact,

    #[error("file end marker without a matching file start")]
    UnmatchedFileEnd,

    #[error("unexpected marker `{tag}` inside artifact")]
    UnexpectedMarker { tag: String },

    #[error("marker `{tag}` is missing required attribute `{attribute}`")]
    MissingAttribute { tag: String, attribute: String },

    #[error("marker exceeds {limit} bytes without closing `>`")]
    MarkerTooLong { limit: usize },

    #[error("stream ended before the artifact was closed")]
    UnterminatedArtifact,

    #[error("stream ended inside file `{path}`")]
    UnterminatedFile { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_details() {
        let err = ParseError::UnterminatedFile {
            path: "src/main.ts".to_string(),
        };
        assert_eq!(err.to_string(), "stream ended inside file `src/main.ts`");

        let err = ParseError::MissingAttribute {
            tag: "file".to_string(),
            attribute: "path".to_string(),
        };
        assert!(err.to_string().contains("`path`"));
    }
}
