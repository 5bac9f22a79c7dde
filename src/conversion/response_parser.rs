//! Model text to client JSON conversion
//!
//! The model is told to answer with bare JSON but regularly wraps it in
//! markdown fences or adds a sentence around it. Parsing is attempted in
//! stages, each on a more aggressively cleaned text:
//!
//! 1. the text as returned
//! 2. the text with every fence marker removed
//! 3. the first balanced JSON value of the expected kind
//!
//! A decoded value of the wrong kind counts as a failure. When every stage
//! fails the use case's fallback value is returned, so callers always get
//! JSON of the shape they declared.

use crate::core::constants::sentinel;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Triple backticks plus an optional language tag (```json, ```c++, ...)
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[A-Za-z0-9_+#-]*").expect("fence pattern is valid")
});

/// JSON kind a use case expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    Object,
    Array,
}

impl ExpectedShape {
    fn matches(self, value: &Value) -> bool {
        match self {
            ExpectedShape::Object => value.is_object(),
            ExpectedShape::Array => value.is_array(),
        }
    }

    fn delimiters(self) -> (char, char) {
        match self {
            ExpectedShape::Object => ('{', '}'),
            ExpectedShape::Array => ('[', ']'),
        }
    }
}

/// Use cases whose model reply is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Object with the optimal/brute-force solution keys
    OptimalCode,
    /// Array of problem titles
    SimilarProblems,
    /// Array of `{name, year}` objects
    CompaniesAsked,
}

impl ResponseKind {
    pub fn shape(self) -> ExpectedShape {
        match self {
            ResponseKind::OptimalCode => ExpectedShape::Object,
            ResponseKind::SimilarProblems | ResponseKind::CompaniesAsked => ExpectedShape::Array,
        }
    }

    /// Value returned when the reply cannot be parsed
    pub fn fallback(self, raw: &str) -> Value {
        match self {
            ResponseKind::OptimalCode => json!({
                "error": sentinel::UNPARSEABLE_JSON,
                "raw": raw,
            }),
            ResponseKind::SimilarProblems => json!([sentinel::UNPARSEABLE_SIMILAR, raw]),
            ResponseKind::CompaniesAsked => json!([]),
        }
    }
}

/// Parse a model reply for `kind`, falling back instead of failing
pub fn parse_response(kind: ResponseKind, raw: &str) -> Value {
    match parse_structured(raw, kind.shape()) {
        Some(value) => value,
        None => {
            warn!(
                "{:?} reply is not valid JSON ({} bytes), returning fallback",
                kind,
                raw.len()
            );
            debug!("Unparseable reply: {}", raw);
            kind.fallback(raw)
        }
    }
}

/// Decode `raw` as JSON of the given shape, cleaning it up if needed
pub fn parse_structured(raw: &str, shape: ExpectedShape) -> Option<Value> {
    if let Some(value) = decode(raw, shape) {
        return Some(value);
    }

    let cleaned = strip_fences(raw);
    if let Some(value) = decode(&cleaned, shape) {
        debug!("Parsed reply after stripping code fences");
        return Some(value);
    }

    let value = decode_embedded(&cleaned, shape)?;
    debug!("Parsed reply after extracting embedded JSON");
    Some(value)
}

/// First balanced body, by opener position, that decodes to `shape`. Prose
/// like "[LeetCode]" ahead of the real value is skipped.
fn decode_embedded(text: &str, shape: ExpectedShape) -> Option<Value> {
    let (open, close) = shape.delimiters();
    text.match_indices(open)
        .filter_map(|(start, _)| extract_balanced(&text[start..], open, close))
        .find_map(|body| decode(body, shape))
}

/// Remove every fence marker, keeping the text between them
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text, "").into_owned()
}

fn decode(text: &str, shape: ExpectedShape) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| shape.matches(value))
}

/// Slice from the first `open` to its matching `close`, skipping delimiters
/// inside JSON strings. `None` if the value never closes.
fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + offset + ch.len_utf8()]);
            }
        }
    }

    None
}
