//! Annotation stitching: partition a text into plain and linked segments.
//!
//! Spans are consumed in ascending start order (stable, so the service's
//! order breaks ties). Offsets are character offsets and are clamped to the
//! text; a span reaching back before the previous span's end is clamped to
//! start there, and dropped if nothing of it remains. Empty plain segments
//! are never emitted, so concatenating the result always gives back the
//! original text.

use tracing::debug;

use crate::types::{Segment, Span};

pub fn stitch(text: &str, spans: &[Span]) -> Vec<Segment> {
    // byte offset of every char boundary, including the end of the text
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let byte_at = |offset: usize| boundaries[offset.min(char_len)];

    let mut sorted: Vec<&Span> = spans.iter().collect();
    sorted.sort_by_key(|span| span.start);

    let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut prev_end = 0;

    for span in sorted {
        let start = span.start.clamp(prev_end, char_len);
        let end = span.end.min(char_len);
        if end <= start {
            debug!(
                start = span.start,
                end = span.end,
                entity = %span.entity_name,
                "Dropping overlapping or empty span"
            );
            continue;
        }

        if start > prev_end {
            segments.push(Segment::text(&text[byte_at(prev_end)..byte_at(start)]));
        }
        segments.push(Segment::entity(
            &text[byte_at(start)..byte_at(end)],
            span.entity_name.as_str(),
        ));
        prev_end = end;
    }

    if prev_end < char_len {
        segments.push(Segment::text(&text[byte_at(prev_end)..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::segments_text;

    #[test]
    fn test_gaps_between_spans() {
        let spans = vec![Span::new(0, 2, "AB"), Span::new(6, 8, "EF")];
        assert_eq!(
            stitch("ab cd ef", &spans),
            vec![
                Segment::entity("ab", "AB"),
                Segment::text(" cd "),
                Segment::entity("ef", "EF"),
            ]
        );
    }

    #[test]
    fn test_no_spans_returns_whole_text() {
        assert_eq!(
            stitch("just text", &[]),
            vec![Segment::text("just text")]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(stitch("", &[]).is_empty());
    }

    #[test]
    fn test_span_covering_whole_text() {
        let spans = vec![Span::new(0, 5, "Paris")];
        assert_eq!(stitch("Paris", &spans), vec![Segment::entity("Paris", "Paris")]);
    }

    #[test]
    fn test_unsorted_spans_are_ordered() {
        let text = "Dexter is an American television drama.";
        let spans = vec![
            Span::new(13, 21, "United_States"),
            Span::new(0, 6, "Dexter_(TV_series)"),
        ];

        let segments = stitch(text, &spans);
        assert_eq!(
            segments,
            vec![
                Segment::entity("Dexter", "Dexter_(TV_series)"),
                Segment::text(" is an "),
                Segment::entity("American", "United_States"),
                Segment::text(" television drama."),
            ]
        );
        assert_eq!(segments_text(&segments), text);
    }

    #[test]
    fn test_equal_starts_keep_service_order() {
        let spans = vec![Span::new(0, 3, "First"), Span::new(0, 3, "Second")];
        let segments = stitch("abc", &spans);
        assert_eq!(segments, vec![Segment::entity("abc", "First")]);
    }

    #[test]
    fn test_overlap_is_clamped() {
        let spans = vec![Span::new(0, 4, "A"), Span::new(2, 6, "B"), Span::new(3, 5, "C")];
        let segments = stitch("abcdefgh", &spans);
        assert_eq!(
            segments,
            vec![
                Segment::entity("abcd", "A"),
                Segment::entity("ef", "B"),
                Segment::text("gh"),
            ]
        );
        assert_eq!(segments_text(&segments), "abcdefgh");
    }

    #[test]
    fn test_offsets_past_end_are_clamped() {
        let spans = vec![Span::new(2, 40, "Tail"), Span::new(50, 60, "Gone")];
        assert_eq!(
            stitch("abcd", &spans),
            vec![Segment::text("ab"), Segment::entity("cd", "Tail")]
        );
    }

    #[test]
    fn test_offsets_count_characters() {
        let text = "Zürich é Genève";
        let spans = vec![Span::new(0, 6, "Zürich"), Span::new(9, 15, "Geneva")];
        let segments = stitch(text, &spans);
        assert_eq!(
            segments,
            vec![
                Segment::entity("Zürich", "Zürich"),
                Segment::text(" é "),
                Segment::entity("Genève", "Geneva"),
            ]
        );
    }
}
