//! Generation response normalizer: turns a raw model reply into a validated value.
//!
//! Fallback ladder, first success wins:
//! 1. blank reply → `EmptyResponse`
//! 2. strip an outer code fence (and its language tag)
//! 3. direct parse against the expected shape
//! 4. objects/arrays: parse the earliest balanced `{...}` / `[...]` block
//! 5. objects: `Key: value` line extraction over the caller's key set
//! 6. objects: the caller's default mapping (degraded success); everything else fails
//!
//! The ladder is a pure function of the reply text. No stage retries the
//! generation call.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::LlmError;

pub mod extract;

use extract::{balanced_spans, extract_keyed_lines, strip_code_fence};

/// Failure kinds a generation step can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation service returned an empty reply")]
    EmptyResponse,

    #[error("reply could not be parsed into the expected shape")]
    UnparsableResponse,

    #[error("expected {expected} items, got {actual}")]
    WrongCardinality { expected: usize, actual: usize },

    #[error("value {value} is outside [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("generation service unavailable: {0}")]
    Unavailable(String),
}

impl GenerationError {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::EmptyResponse => "EMPTY_RESPONSE",
            GenerationError::UnparsableResponse => "UNPARSABLE_RESPONSE",
            GenerationError::WrongCardinality { .. } => "WRONG_CARDINALITY",
            GenerationError::OutOfRange { .. } => "OUT_OF_RANGE",
            GenerationError::Unavailable(_) => "GENERATION_UNAVAILABLE",
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::Unavailable(err.to_string())
    }
}

/// Result of any generation step: a validated value or a typed failure.
pub type GenerationOutcome<T> = Result<T, GenerationError>;

/// Contract for a JSON object reply.
#[derive(Debug, Clone, Default)]
pub struct ObjectShape<'a> {
    /// Keys searched by the line-extraction stage.
    pub keys: &'a [&'a str],
    /// Returned as a degraded success when every other stage fails.
    pub default: Option<Map<String, Value>>,
}

impl<'a> ObjectShape<'a> {
    pub fn strict(keys: &'a [&'a str]) -> Self {
        Self {
            keys,
            default: None,
        }
    }

    pub fn with_default(keys: &'a [&'a str], default: Map<String, Value>) -> Self {
        Self {
            keys,
            default: Some(default),
        }
    }
}

/// The structural contract a reply is expected to satisfy.
#[derive(Debug, Clone)]
pub enum Shape<'a> {
    JsonObject(ObjectShape<'a>),
    JsonArray { len: Option<usize> },
    BareInteger { min: i64, max: i64 },
    FreeText,
}

/// A reply that satisfied its `Shape`.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Integer(i64),
    Text(String),
}

/// Normalizes `raw` against `shape`, dispatching to the typed entry points.
pub fn normalize(raw: &str, shape: &Shape<'_>) -> GenerationOutcome<Normalized> {
    match shape {
        Shape::JsonObject(object) => normalize_object(raw, object).map(Normalized::Object),
        Shape::JsonArray { len } => normalize_array(raw, *len).map(Normalized::Array),
        Shape::BareInteger { min, max } => {
            normalize_integer(raw, *min, *max).map(Normalized::Integer)
        }
        Shape::FreeText => normalize_text(raw).map(Normalized::Text),
    }
}

/// Stages 1–2: rejects blank replies and strips an outer code fence.
fn prepare(raw: &str) -> GenerationOutcome<&str> {
    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

pub fn normalize_object(raw: &str, shape: &ObjectShape<'_>) -> GenerationOutcome<Map<String, Value>> {
    let text = prepare(raw)?;

    if let Some(map) = parse_object(text) {
        return Ok(map);
    }

    if let Some(map) = balanced_spans(text, b'{', b'}').find_map(parse_object) {
        debug!("Recovered JSON object from surrounding prose");
        return Ok(map);
    }

    let keyed = extract_keyed_lines(text, shape.keys);
    if !keyed.is_empty() {
        debug!("Recovered {} keys by line extraction", keyed.len());
        return Ok(keyed);
    }

    match &shape.default {
        Some(default) => {
            warn!("Reply was not usable as a JSON object; falling back to default mapping");
            Ok(default.clone())
        }
        None => Err(GenerationError::UnparsableResponse),
    }
}

pub fn normalize_array(raw: &str, len: Option<usize>) -> GenerationOutcome<Vec<Value>> {
    let text = prepare(raw)?;

    let items = parse_array(text)
        .or_else(|| balanced_spans(text, b'[', b']').find_map(parse_array))
        .ok_or(GenerationError::UnparsableResponse)?;

    match len {
        Some(expected) if items.len() != expected => Err(GenerationError::WrongCardinality {
            expected,
            actual: items.len(),
        }),
        _ => Ok(items),
    }
}

pub fn normalize_integer(raw: &str, min: i64, max: i64) -> GenerationOutcome<i64> {
    let text = prepare(raw)?;
    let value = text
        .parse::<i64>()
        .map_err(|_| GenerationError::UnparsableResponse)?;
    check_range(value, min, max)
}

pub fn normalize_text(raw: &str) -> GenerationOutcome<String> {
    prepare(raw).map(str::to_owned)
}

/// Reads an integral field from a normalized object and range-checks it.
///
/// Accepts JSON integers, integral floats (`85.0`) and numeric strings; any
/// other value, or a missing field, is `UnparsableResponse`. Never clamps.
pub fn integer_field(
    map: &Map<String, Value>,
    key: &str,
    min: i64,
    max: i64,
) -> GenerationOutcome<i64> {
    let value = match map.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(GenerationError::UnparsableResponse)?;
    check_range(value, min, max)
}

fn check_range(value: i64, min: i64, max: i64) -> GenerationOutcome<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(GenerationError::OutOfRange { value, min, max })
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JOB_KEYS: &[&str] = &["RequiredSkills", "ExperienceLevel"];

    fn placeholder() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("RequiredSkills".into(), json!("Not specified"));
        map
    }

    #[test]
    fn test_blank_reply_is_empty_response() {
        for shape in [
            Shape::FreeText,
            Shape::JsonArray { len: None },
            Shape::BareInteger { min: 0, max: 100 },
            Shape::JsonObject(ObjectShape::with_default(JOB_KEYS, placeholder())),
        ] {
            assert_eq!(normalize("  \n ", &shape), Err(GenerationError::EmptyResponse));
        }
        assert_eq!(normalize_text("```json\n```"), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_code_fenced_object_is_unwrapped() {
        let raw = "```json\n{\"About Me\":\"Hi\"}\n```";
        let map = normalize_object(raw, &ObjectShape::strict(&[])).unwrap();
        assert_eq!(Value::Object(map), json!({"About Me": "Hi"}));
    }

    #[test]
    fn test_object_inside_prose_is_recovered() {
        let raw = "Here is your JSON:\n{\"ExperienceLevel\": \"Senior\"}\nLet me know!";
        let map = normalize_object(raw, &ObjectShape::strict(JOB_KEYS)).unwrap();
        assert_eq!(map["ExperienceLevel"], json!("Senior"));
    }

    #[test]
    fn test_keyed_lines_used_when_no_json_present() {
        let raw = "Required Skills: Rust\nExperience Level: Mid";
        let map = normalize_object(raw, &ObjectShape::strict(JOB_KEYS)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["ExperienceLevel"], json!("Mid"));
    }

    #[test]
    fn test_degraded_success_returns_default_mapping() {
        let shape = ObjectShape::with_default(JOB_KEYS, placeholder());
        let map = normalize_object("Not JSON at all", &shape).unwrap();
        assert_eq!(map, placeholder());
    }

    #[test]
    fn test_strict_object_without_any_match_is_unparsable() {
        let result = normalize_object("Not JSON at all", &ObjectShape::strict(JOB_KEYS));
        assert_eq!(result, Err(GenerationError::UnparsableResponse));
    }

    #[test]
    fn test_json_array_reply_is_not_an_object() {
        let result = normalize_object("[1, 2]", &ObjectShape::strict(&[]));
        assert_eq!(result, Err(GenerationError::UnparsableResponse));
    }

    #[test]
    fn test_earlier_stage_wins_over_later_stages() {
        // Parses directly; the keyed line inside the string value must not leak in.
        let raw = "{\"ExperienceLevel\": \"Senior\\nRequiredSkills: Go\"}";
        let map = normalize_object(raw, &ObjectShape::with_default(JOB_KEYS, placeholder())).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["ExperienceLevel"], json!("Senior\nRequiredSkills: Go"));
    }

    #[test]
    fn test_array_cardinality_enforced() {
        assert_eq!(
            normalize("[1,2,3]", &Shape::JsonArray { len: Some(10) }),
            Err(GenerationError::WrongCardinality {
                expected: 10,
                actual: 3
            })
        );
    }

    #[test]
    fn test_array_recovered_from_wrapper_object() {
        let raw = "{\"questions\": [\"Q1\", \"Q2\"]}";
        let items = normalize_array(raw, Some(2)).unwrap();
        assert_eq!(items, vec![json!("Q1"), json!("Q2")]);
    }

    #[test]
    fn test_array_without_brackets_is_unparsable() {
        assert_eq!(
            normalize_array("1. Tell me about yourself", Some(1)),
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[test]
    fn test_integer_range_enforced() {
        let shape = Shape::BareInteger { min: 0, max: 100 };
        assert_eq!(
            normalize("150", &shape),
            Err(GenerationError::OutOfRange {
                value: 150,
                min: 0,
                max: 100
            })
        );
        assert_eq!(normalize("85", &shape), Ok(Normalized::Integer(85)));
        assert_eq!(normalize(" 0 ", &shape), Ok(Normalized::Integer(0)));
        assert_eq!(normalize("100", &shape), Ok(Normalized::Integer(100)));
    }

    #[test]
    fn test_non_numeric_integer_is_unparsable() {
        assert_eq!(
            normalize_integer("Score: 85", 0, 100),
            Err(GenerationError::UnparsableResponse)
        );
        assert_eq!(
            normalize_integer("85.5", 0, 100),
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[test]
    fn test_integer_field_accepts_common_encodings() {
        let map = json!({"a": 70, "b": 70.0, "c": "70", "d": "seventy", "e": -1})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(integer_field(&map, "a", 0, 100), Ok(70));
        assert_eq!(integer_field(&map, "b", 0, 100), Ok(70));
        assert_eq!(integer_field(&map, "c", 0, 100), Ok(70));
        assert_eq!(
            integer_field(&map, "d", 0, 100),
            Err(GenerationError::UnparsableResponse)
        );
        assert_eq!(
            integer_field(&map, "e", 0, 100),
            Err(GenerationError::OutOfRange {
                value: -1,
                min: 0,
                max: 100
            })
        );
        assert_eq!(
            integer_field(&map, "missing", 0, 100),
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[test]
    fn test_free_text_is_trimmed_and_unfenced() {
        assert_eq!(
            normalize("```\nDear hiring manager,\n```", &Shape::FreeText),
            Ok(Normalized::Text("Dear hiring manager,".into()))
        );
        assert_eq!(normalize_text("  Hello  \n"), Ok("Hello".into()));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = "noise {\"RequiredSkills\": \"Rust\"} noise";
        let shape = ObjectShape::strict(JOB_KEYS);
        assert_eq!(normalize_object(raw, &shape), normalize_object(raw, &shape));
    }
}
