// Chunk-boundary behavior of the stream parser.
// Any split of an input must give the same structural events as the
// single-chunk parse, and content snapshots may only grow.

mod common;

use artifact_stream::artifact::FileStatus;
use artifact_stream::config::ParserConfig;
use artifact_stream::error::ParseError;
use artifact_stream::parser::{ParseEvent, StreamParser};
use common::*;

#[test]
fn test_basic_session_events() {
    let events = parse_chunks(&basic_chunks());

    assert_eq!(events[0], ParseEvent::Chunk("thinking…".into()));
    assert_eq!(events[1], ParseEvent::ArtifactStart);
    let ParseEvent::FileStart { file, artifact } = &events[2] else {
        panic!("expected file start, got {:?}", events[2]);
    };
    assert_eq!(file.path, "a.ts");
    assert_eq!(file.id, "a.ts");
    assert_eq!(artifact.files.len(), 1);
    let ParseEvent::FileContent { file } = &events[3] else {
        panic!("expected file content, got {:?}", events[3]);
    };
    assert_eq!(file.content, "const x=1");
    let ParseEvent::ArtifactEnd(artifact) = &events[4] else {
        panic!("expected artifact end, got {:?}", events[4]);
    };
    assert_eq!(artifact.files.len(), 1);
    assert_eq!(artifact.files[0].content, "const x=1");
    assert_eq!(artifact.files[0].status, FileStatus::Complete);
    assert_eq!(events[5], ParseEvent::End);
    assert_eq!(events.len(), 6);
}

#[test]
fn test_artifact_marker_split_mid_token() {
    let split = parse_chunks(&[
        "<art",
        "ifact><file path=\"b.ts\">",
        "ab",
        "c",
        "</file></artifact>",
    ]);
    let whole = parse_chunks(&["<artifact><file path=\"b.ts\">abc</file></artifact>"]);

    assert_eq!(structural(&split), structural(&whole));
    assert!(preamble_text(&split).is_empty());

    let ParseEvent::ArtifactEnd(artifact) = &split[split.len() - 2] else {
        panic!("expected artifact end, got {:?}", split[split.len() - 2]);
    };
    assert_eq!(artifact.files[0].content, "abc");
}

#[test]
fn test_every_two_way_split_matches_single_chunk() {
    let reference = parse_chunks(&[TRANSCRIPT]);
    let expected = structural(&reference);

    for cut in boundaries(TRANSCRIPT) {
        let events = parse_chunks(&split_at(TRANSCRIPT, &[cut]));
        assert_eq!(structural(&events), expected, "split at byte {}", cut);
        assert_eq!(preamble_text(&events), preamble_text(&reference));
    }
}

#[test]
fn test_three_way_splits_near_each_other() {
    let expected = structural(&parse_chunks(&[TRANSCRIPT]));
    let cuts = boundaries(TRANSCRIPT);

    // Close pairs of cuts land inside the same marker
    for (i, &first) in cuts.iter().enumerate() {
        for &second in cuts.iter().skip(i + 1).take(12) {
            let events = parse_chunks(&split_at(TRANSCRIPT, &[first, second]));
            assert_eq!(
                structural(&events),
                expected,
                "split at bytes {} and {}",
                first,
                second
            );
        }
    }
}

#[test]
fn test_char_by_char_matches_single_chunk() {
    let reference = parse_chunks(&[TRANSCRIPT]);
    let events = parse_chunks(&char_chunks(TRANSCRIPT));

    assert_eq!(structural(&events), structural(&reference));
    assert_eq!(
        preamble_text(&events),
        "Let me think… I'll add a component.\n"
    );
}

#[test]
fn test_content_snapshots_only_grow() {
    let events = parse_chunks(&char_chunks(TRANSCRIPT));

    let mut previous: Option<(String, String)> = None;
    let mut seen = 0;
    for event in &events {
        match event {
            ParseEvent::FileStart { .. } => previous = None,
            ParseEvent::FileContent { file } => {
                if let Some((id, content)) = &previous {
                    assert_eq!(id, &file.id);
                    assert!(file.content.starts_with(content.as_str()));
                }
                previous = Some((file.id.clone(), file.content.clone()));
                seen += 1;
            }
            _ => {}
        }
    }
    assert!(seen > 0, "expected content events");
}

#[test]
fn test_final_snapshot_of_transcript() {
    let events = parse_chunks(&char_chunks(TRANSCRIPT));
    let artifact = events
        .iter()
        .find_map(|e| match e {
            ParseEvent::ArtifactEnd(artifact) => Some(artifact.clone()),
            _ => None,
        })
        .expect("artifact end");

    assert_eq!(artifact.id.as_deref(), Some("todo"));
    assert_eq!(artifact.title.as_deref(), Some("Todo & list"));
    assert_eq!(artifact.files.len(), 2);
    assert_eq!(artifact.files[0].id, "src/App.tsx");
    assert_eq!(
        artifact.files[0].content,
        "export const App = () => <div>{items}</div>;\n"
    );
    assert_eq!(artifact.files[1].id, "styles");
    assert_eq!(artifact.files[1].path, "src/app.css");
    assert!(artifact
        .files
        .iter()
        .all(|f| f.status == FileStatus::Complete));
    assert_eq!(events.last(), Some(&ParseEvent::End));
}

#[test]
fn test_errors_do_not_depend_on_chunking() {
    let inputs = [
        "<artifact><artifact>",
        "<artifact><file path=\"a\">x</file></file>",
        "pre <artifact><file path=\"a\">never closed",
        "<artifact><file path=\"a\">x</file>",
        "<artifact><file id=\"only-id\">x</file></artifact>",
    ];
    for input in inputs {
        let whole = parse_chunks(&[input]);
        let chars = parse_chunks(&char_chunks(input));
        assert!(
            matches!(whole.last(), Some(ParseEvent::Error(_))),
            "{}",
            input
        );
        assert_eq!(whole.last(), chars.last(), "{}", input);
        assert!(!chars.contains(&ParseEvent::End), "{}", input);
    }
}

fn parse_with_limit<S: AsRef<str>>(limit: usize, chunks: &[S]) -> Vec<ParseEvent> {
    let mut parser = StreamParser::with_config(ParserConfig {
        max_marker_len: limit,
    });
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(parser.feed(chunk.as_ref()));
    }
    events.extend(parser.finish());
    events
}

#[test]
fn test_marker_bound_applies_across_chunks() {
    let input = format!("<artifact><file path=\"{}\">x</file></artifact>", "p".repeat(40));
    let expected = vec![
        ParseEvent::ArtifactStart,
        ParseEvent::Error(ParseError::MarkerTooLong { limit: 32 }),
    ];

    assert_eq!(structural(&parse_with_limit(32, &[input.as_str()])), expected);
    assert_eq!(structural(&parse_with_limit(32, &char_chunks(&input))), expected);
    for cut in boundaries(&input) {
        let events = parse_with_limit(32, &split_at(&input, &[cut]));
        assert_eq!(structural(&events), expected, "split at byte {}", cut);
    }
}

#[test]
fn test_oversized_preamble_candidate_does_not_depend_on_chunking() {
    let input = format!(
        "<artifact title=\"{}\"></artifact> then <artifact><file path=\"a\">x</file></artifact>",
        "x".repeat(64)
    );
    let whole = parse_with_limit(32, &[input.as_str()]);
    let expected = structural(&whole);
    assert_eq!(expected.first(), Some(&ParseEvent::ArtifactStart));
    assert_eq!(expected.last(), Some(&ParseEvent::End));

    assert_eq!(structural(&parse_with_limit(32, &char_chunks(&input))), expected);
    for cut in boundaries(&input) {
        let events = parse_with_limit(32, &split_at(&input, &[cut]));
        assert_eq!(structural(&events), expected, "split at byte {}", cut);
        assert_eq!(preamble_text(&events), preamble_text(&whole));
    }
}

#[test]
fn test_preamble_mentioning_artifact_streams_and_ends() {
    let mut parser = StreamParser::new();
    let opening = "I will emit an <artifact containing the files. ";
    let filler = "more reasoning text here. ";

    let mut events = parser.feed(opening);
    for _ in 0..200 {
        events.extend(parser.feed(filler));
    }

    // The candidate is ruled out once it passes the marker bound
    assert!(!events.iter().any(|e| matches!(e, ParseEvent::Error(_))));
    assert_eq!(parser.pending_len(), 0);
    assert_eq!(
        preamble_text(&events),
        format!("{}{}", opening, filler.repeat(200))
    );

    assert_eq!(parser.finish(), vec![ParseEvent::End]);
}
