//! Dexter API request and response types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::stitch;

// =============================================================================
// Requests
// =============================================================================

/// HTTP verb used to dispatch a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Get => f.write_str("GET"),
            Verb::Post => f.write_str("POST"),
        }
    }
}

/// An entity or category, given either by numeric id or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Id(i64),
    Title(String),
}

impl From<i64> for EntityRef {
    fn from(id: i64) -> Self {
        EntityRef::Id(id)
    }
}

impl From<i32> for EntityRef {
    fn from(id: i32) -> Self {
        EntityRef::Id(id.into())
    }
}

impl From<&str> for EntityRef {
    fn from(title: &str) -> Self {
        EntityRef::Title(title.to_string())
    }
}

impl From<String> for EntityRef {
    fn from(title: String) -> Self {
        EntityRef::Title(title)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Id(id) => write!(f, "#{}", id),
            EntityRef::Title(title) => f.write_str(title),
        }
    }
}

/// Options for the `annotate` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateOptions {
    /// Return entity names (`wn`) alongside ids
    pub wikiname: bool,

    /// Minimum confidence for a spot to be linked (`min-conf`)
    pub min_conf: f64,

    /// Maximum number of spots (`n`)
    pub max_spots: u32,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            wikiname: false,
            min_conf: 0.5,
            max_spots: 50,
        }
    }
}

impl AnnotateOptions {
    pub fn wikiname(mut self, wikiname: bool) -> Self {
        self.wikiname = wikiname;
        self
    }

    pub fn min_conf(mut self, min_conf: f64) -> Self {
        self.min_conf = min_conf;
        self
    }

    pub fn max_spots(mut self, max_spots: u32) -> Self {
        self.max_spots = max_spots;
        self
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// A linked mention in the annotated text. Offsets count characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,

    /// Title of the linked entity
    #[serde(rename = "wikiname")]
    pub entity_name: String,

    /// Numeric id of the linked entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<i64>,

    /// Linking confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Span {
    pub fn new(start: usize, end: usize, entity_name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            entity_name: entity_name.into(),
            entity: None,
            score: None,
        }
    }
}

/// Response of `annotate`: the original text and its linked spans.
///
/// The text is read from `document.fields.body.value`, spans from `spots`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotatedDocument {
    #[serde(rename = "document", deserialize_with = "body_value")]
    pub text: String,
    #[serde(rename = "spots", default)]
    pub spans: Vec<Span>,
}

impl AnnotatedDocument {
    pub fn new(text: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    /// Partition the text into plain and annotated segments.
    pub fn stitch(&self) -> Vec<Segment> {
        stitch::stitch(&self.text, &self.spans)
    }
}

#[derive(Deserialize)]
struct RawDocument {
    fields: RawFields,
}

#[derive(Deserialize)]
struct RawFields {
    body: RawBody,
}

#[derive(Deserialize)]
struct RawBody {
    value: String,
}

fn body_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawDocument::deserialize(deserializer).map(|doc| doc.fields.body.value)
}

/// One piece of a partitioned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// Text not covered by any annotation
    Text(String),
    /// A mention and the entity it links to
    Entity { mention: String, entity: String },
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    pub fn entity(mention: impl Into<String>, entity: impl Into<String>) -> Self {
        Segment::Entity {
            mention: mention.into(),
            entity: entity.into(),
        }
    }

    /// The covered substring.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Entity { mention, .. } => mention,
        }
    }
}

/// Reassemble the text a partition was built from.
pub fn segments_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotated_document_reads_nested_body() {
        let raw = json!({
            "document": {"fields": {"body": {"value": "Dexter is a drama."}}},
            "spots": [
                {"mention": "dexter", "start": 0, "end": 6, "wikiname": "Dexter_(TV_series)", "entity": 8429, "score": 0.9}
            ],
            "querytime": 12
        });

        let doc: AnnotatedDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.text, "Dexter is a drama.");
        assert_eq!(doc.spans.len(), 1);
        assert_eq!(doc.spans[0].entity_name, "Dexter_(TV_series)");
        assert_eq!(doc.spans[0].entity, Some(8429));
    }

    #[test]
    fn test_annotated_document_without_spots() {
        let raw = json!({"document": {"fields": {"body": {"value": "nothing"}}}});
        let doc: AnnotatedDocument = serde_json::from_value(raw).unwrap();
        assert!(doc.spans.is_empty());
    }

    #[test]
    fn test_top_level_text_is_rejected() {
        let raw = json!({"text": "flat", "spots": []});
        assert!(serde_json::from_value::<AnnotatedDocument>(raw).is_err());
    }

    #[test]
    fn test_entity_ref_conversions() {
        assert_eq!(EntityRef::from(42), EntityRef::Id(42));
        assert_eq!(EntityRef::from("Paris"), EntityRef::Title("Paris".into()));
        assert_eq!(EntityRef::Id(7).to_string(), "#7");
    }

    #[test]
    fn test_segment_serializes_as_string_or_pair() {
        let segments = vec![Segment::entity("ab", "AB"), Segment::text(" cd")];
        assert_eq!(
            serde_json::to_value(&segments).unwrap(),
            json!([{"mention": "ab", "entity": "AB"}, " cd"])
        );
        assert_eq!(segments_text(&segments), "ab cd");
    }
}
