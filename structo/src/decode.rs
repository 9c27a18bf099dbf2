//! Response decoding: thought splitting and typed deserialization.
//!
//! Two independent operations live here. [`split_thought`] separates a
//! `<think>…</think>` reasoning preamble from the final answer; it is
//! pure text processing and knows nothing about JSON. [`decode_response`]
//! turns schema-constrained response text into a typed value, falling
//! back to extracting an embedded JSON object when the model wrapped its
//! answer in markdown or prose.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::DecodeError;

/// Opening marker of a thought block.
const THINK_OPEN: &str = "<think>";
/// Closing marker of a thought block.
const THINK_CLOSE: &str = "</think>";

/// Result of splitting a thought block from raw text.
///
/// A total function of the input: malformed marker placement yields
/// [`NotFound`](ThoughtSplit::NotFound) with the raw text intact, never
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThoughtSplit {
    /// Both markers were present, in order.
    Found {
        /// Trimmed text strictly between the markers.
        thought: String,
        /// Trimmed text strictly after the closing marker.
        answer: String,
    },
    /// A marker was missing or out of order.
    NotFound {
        /// The input, unchanged.
        raw: String,
    },
}

impl ThoughtSplit {
    /// The thought, when one was found.
    pub fn thought(&self) -> Option<&str> {
        match self {
            Self::Found { thought, .. } => Some(thought),
            Self::NotFound { .. } => None,
        }
    }

    /// The text to treat as the answer: the part after the thought
    /// block, or the whole input when no block was found.
    pub fn answer(&self) -> &str {
        match self {
            Self::Found { answer, .. } => answer,
            Self::NotFound { raw } => raw,
        }
    }

    /// Recover the raw input of a [`NotFound`](ThoughtSplit::NotFound).
    pub fn into_raw(self) -> Option<String> {
        match self {
            Self::Found { .. } => None,
            Self::NotFound { raw } => Some(raw),
        }
    }
}

/// Split a leading `<think>…</think>` block from raw model output.
///
/// Text before the opening marker is discarded; both halves are trimmed
/// of surrounding whitespace. Missing or out-of-order markers yield
/// [`ThoughtSplit::NotFound`] carrying the input unchanged.
pub fn split_thought(raw: &str) -> ThoughtSplit {
    let open = raw.find(THINK_OPEN);
    let close = raw.find(THINK_CLOSE);

    match (open, close) {
        (Some(open), Some(close)) if open + THINK_OPEN.len() <= close => {
            let thought = raw[open + THINK_OPEN.len()..close].trim().to_string();
            let answer = raw[close + THINK_CLOSE.len()..].trim().to_string();
            ThoughtSplit::Found { thought, answer }
        }
        _ => ThoughtSplit::NotFound {
            raw: raw.to_string(),
        },
    }
}

/// Deserialize schema-constrained response text into `T`.
///
/// Tries the text verbatim first. If that fails, one fallback pass
/// extracts a fenced or embedded JSON object before giving up. On
/// failure the returned [`DecodeError`] carries the full raw text and
/// the underlying parse error.
pub fn decode_response<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let direct = serde_json::from_str::<T>(text.trim());
    let source = match direct {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if let Some(embedded) = extract_json(text) {
        if let Ok(value) = serde_json::from_str::<T>(&embedded) {
            return Ok(value);
        }
    }

    Err(DecodeError::Decode {
        target: std::any::type_name::<T>(),
        raw: text.to_string(),
        source,
    })
}

/// Pull a JSON object out of text that wraps it in markdown or prose.
fn extract_json(text: &str) -> Option<String> {
    let text = text.trim();

    // Fenced code block, with or without a language tag.
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &rest[body_start..];
        if let Some(end) = body.find("```") {
            let candidate = body[..end].trim();
            if serde_json::from_str::<JsonValue>(candidate).is_ok() {
                return Some(candidate.to_string());
            }
        }
    }

    // Balanced-object scan, retried from each `{` so a stray brace in
    // surrounding prose cannot mask the real object.
    for (start, _) in text.char_indices().filter(|(_, ch)| *ch == '{') {
        if let Some(candidate) = balanced_object(&text[start..]) {
            if serde_json::from_str::<JsonValue>(candidate).is_ok() {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// The balanced `{…}` prefix of `text`, tracking string literals.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pet {
        id: i64,
        name: String,
        tags: Vec<String>,
        owner: Option<Owner>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Owner {
        name: String,
    }

    #[test]
    fn test_split_with_both_markers() {
        let split = split_thought("<think>reasoning</think>answer text");
        assert_eq!(
            split,
            ThoughtSplit::Found {
                thought: "reasoning".to_string(),
                answer: "answer text".to_string(),
            }
        );
    }

    #[test]
    fn test_split_trims_both_halves() {
        let split = split_thought("<think>\n  step one\n  step two\n</think>\n\n  final  ");
        assert_eq!(split.thought(), Some("step one\n  step two"));
        assert_eq!(split.answer(), "final");
    }

    #[test]
    fn test_split_discards_text_before_opening_marker() {
        let split = split_thought("preamble <think>t</think>a");
        assert_eq!(split.thought(), Some("t"));
        assert_eq!(split.answer(), "a");
    }

    #[rstest]
    #[case::no_opening_marker("no markers here</think>rest")]
    #[case::no_closing_marker("<think>endless reasoning")]
    #[case::out_of_order_markers("</think>backwards<think>")]
    #[case::no_markers_at_all("plain answer")]
    #[case::empty_input("")]
    fn test_split_malformed_input_is_not_found(#[case] raw: &str) {
        let split = split_thought(raw);
        assert_eq!(
            split,
            ThoughtSplit::NotFound {
                raw: raw.to_string(),
            }
        );
        assert_eq!(split.answer(), raw);
        assert_eq!(split.thought(), None);
        assert_eq!(split.into_raw().as_deref(), Some(raw));
    }

    #[test]
    fn test_split_empty_thought_and_answer() {
        let split = split_thought("<think></think>");
        assert_eq!(
            split,
            ThoughtSplit::Found {
                thought: String::new(),
                answer: String::new(),
            }
        );
    }

    #[test]
    fn test_decode_round_trips_nested_value() {
        let pet = Pet {
            id: 7,
            name: "Rex".to_string(),
            tags: vec!["good".to_string(), "dog".to_string()],
            owner: Some(Owner {
                name: "Ada".to_string(),
            }),
        };
        let json = r#"{"id": 7, "name": "Rex", "tags": ["good", "dog"],
                       "owner": {"name": "Ada"}}"#;
        assert_eq!(decode_response::<Pet>(json).unwrap(), pet);
    }

    #[test]
    fn test_decode_extracts_from_fenced_block() {
        let text = "Here you go:\n```json\n{\"id\": 1, \"name\": \"x\", \"tags\": [], \"owner\": null}\n```\nDone.";
        let pet = decode_response::<Pet>(text).unwrap();
        assert_eq!(pet.id, 1);
        assert_eq!(pet.name, "x");
    }

    #[test]
    fn test_decode_extracts_embedded_object() {
        let text = r#"The answer is {"id": 2, "name": "y", "tags": [], "owner": null} as requested."#;
        let pet = decode_response::<Pet>(text).unwrap();
        assert_eq!(pet.id, 2);
    }

    #[test]
    fn test_decode_failure_carries_raw_text() {
        let err = decode_response::<Pet>("the model rambled instead").unwrap_err();
        let DecodeError::Decode { raw, .. } = err;
        assert_eq!(raw, "the model rambled instead");
    }

    #[test]
    fn test_decode_ignores_braces_inside_strings() {
        let text = r#"note "{" then {"id": 3, "name": "z", "tags": ["{a}"], "owner": null}"#;
        let pet = decode_response::<Pet>(text).unwrap();
        assert_eq!(pet.tags, vec!["{a}".to_string()]);
    }
}
