//! Low-level text scanners used by the fallback ladder.
//!
//! None of these allocate a parse result; they locate candidate slices of the
//! raw reply that the ladder then hands back to `serde_json`.

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

const FENCE: &str = "```";

/// Strips one outer code fence and an optional language tag on the opening line.
///
/// Only applies when the trimmed text both starts and ends with a fence marker;
/// otherwise the trimmed text is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if text.len() < FENCE.len() * 2 || !text.starts_with(FENCE) || !text.ends_with(FENCE) {
        return text;
    }

    let inner = &text[FENCE.len()..text.len() - FENCE.len()];
    let inner = match inner.split_once('\n') {
        Some((tag, body)) if is_language_tag(tag) => body,
        // single-line fence: ```json {"a": 1}```
        None => match inner.split_once(char::is_whitespace) {
            Some((tag, body))
                if is_language_tag(tag) && body.trim_start().starts_with(['{', '[']) =>
            {
                body
            }
            _ => inner,
        },
        _ => inner,
    };
    inner.trim()
}

fn is_language_tag(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty()
        || tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// Yields every balanced `open ... close` span, in order of its opening delimiter.
///
/// Delimiters inside JSON string literals are ignored. For each opening
/// delimiter the shortest balanced span starting there is returned, so the
/// first item is the outermost block that begins earliest in the text. An
/// opening delimiter that never closes encloses the rest of the text, so
/// nothing after it is yielded: a truncated object's nested members are not
/// candidates.
pub fn balanced_spans(text: &str, open: u8, close: u8) -> impl Iterator<Item = &str> + '_ {
    let bytes = text.as_bytes();
    let mut closed_until = 0usize;
    let mut truncated = false;
    bytes
        .iter()
        .enumerate()
        .filter(move |(_, b)| **b == open)
        .filter_map(move |(start, _)| {
            if truncated {
                return None;
            }
            match matching_close(&bytes[start..], open, close) {
                Some(len) => {
                    closed_until = closed_until.max(start + len);
                    Some(&text[start..start + len])
                }
                // inside an earlier closed span, e.g. a delimiter in a string literal
                None if start < closed_until => None,
                None => {
                    truncated = true;
                    None
                }
            }
        })
}

/// Length of the balanced span at the start of `bytes`, including both delimiters.
fn matching_close(bytes: &[u8], open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Line-oriented `Key: value` extraction for replies that are not JSON at all.
///
/// A key line may be decorated with bullets, quotes or heading marks and may
/// spell a camel-cased key with spaces (`Required Skills:` matches
/// `RequiredSkills`). Each value runs until the next key line. The first
/// occurrence of a key wins; keys with blank values are skipped. Key lines
/// nested deeper than the top-level object (a project's `"Name"`) are not
/// key lines, and a value that opens a JSON array or object but does not
/// parse (a truncated reply) is skipped.
pub fn extract_keyed_lines(text: &str, keys: &[&str]) -> Map<String, Value> {
    let mut found = Map::new();
    let Some(pattern) = key_line_regex(keys) else {
        return found;
    };

    let hits: Vec<(usize, usize, &str)> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let key = caps.get(1)?;
            Some((whole.start(), whole.end(), key.as_str()))
        })
        .filter(|(start, _, _)| nesting_depth(&text[..*start]) <= 1)
        .collect();

    for (idx, (_, value_start, matched)) in hits.iter().enumerate() {
        let value_end = hits
            .get(idx + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(text.len());
        let Some(canonical) = canonical_key(matched, keys) else {
            continue;
        };
        if found.contains_key(canonical) {
            continue;
        }
        if let Some(value) = clean_value(&text[*value_start..value_end]) {
            found.insert(canonical.to_string(), value);
        }
    }

    found
}

/// Unclosed `{`/`[` count at the end of `prefix`, ignoring string literals.
fn nesting_depth(prefix: &str) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for b in prefix.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

fn key_line_regex(keys: &[&str]) -> Option<Regex> {
    if keys.is_empty() {
        return None;
    }
    let alternatives = keys
        .iter()
        .map(|k| key_pattern(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r#"^[ \t\-*#>"'{{,]*({alternatives})["']?[ \t]*:[ \t]*"#);
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .ok()
}

/// `RequiredSkills` / `Required Skills` / `required_skills` → `Required[\s_]*Skills`
fn key_pattern(key: &str) -> String {
    split_words(key)
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join(r"[ \t_]*")
}

fn split_words(key: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if c == ' ' || c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn canonical_key<'k>(matched: &str, keys: &[&'k str]) -> Option<&'k str> {
    let folded = fold_key(matched);
    keys.iter().copied().find(|k| fold_key(k) == folded)
}

pub fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn clean_value(raw: &str) -> Option<Value> {
    let value = raw.trim().trim_end_matches(',').trim_end();
    let trimmed =
        value.trim_end_matches(|c: char| c == ',' || c == '}' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }

    // last member of the enclosing object carries its closing brace
    let without_outer_brace = value
        .strip_suffix('}')
        .map(|v| v.trim_end().trim_end_matches(',').trim_end());
    let candidates = [Some(value), without_outer_brace, Some(trimmed)];
    for candidate in candidates.into_iter().flatten() {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Null) => return None,
            Ok(parsed) => return Some(parsed),
            Err(_) => {}
        }
    }
    if trimmed.starts_with(['[', '{']) {
        return None;
    }

    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    (!unquoted.is_empty()).then(|| Value::String(unquoted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fence(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fence_without_tag() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fence(input), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fence_single_line() {
        assert_eq!(strip_code_fence("```json {\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fence_requires_both_markers() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_code_fence(input), input);
        assert_eq!(strip_code_fence("  plain text  "), "plain text");
    }

    #[test]
    fn test_strip_code_fence_keeps_first_line_that_is_not_a_tag() {
        let input = "```{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(input), "{\"a\": 1}");
    }

    #[test]
    fn test_balanced_spans_skips_braces_in_strings() {
        let text = r#"Sure! {"a": "has } brace", "b": {"c": 1}} trailing"#;
        let first = balanced_spans(text, b'{', b'}').next().unwrap();
        assert_eq!(first, r#"{"a": "has } brace", "b": {"c": 1}}"#);
    }

    #[test]
    fn test_balanced_spans_yields_inner_blocks_after_outer() {
        let text = r#"{"a": {"ok": true}, bad} tail"#;
        let spans: Vec<&str> = balanced_spans(text, b'{', b'}').collect();
        assert_eq!(spans, vec![r#"{"a": {"ok": true}, bad}"#, r#"{"ok": true}"#]);
    }

    #[test]
    fn test_balanced_spans_stop_at_unclosed_opener() {
        let text = r#"{"Name": "Ada", "Projects": [{"Name": "Folio"}, {"Name": "Ca"#;
        assert_eq!(balanced_spans(text, b'{', b'}').count(), 0);

        let text = r#"Note {"a": "}{"} then {"b": 1}"#;
        let spans: Vec<&str> = balanced_spans(text, b'{', b'}').collect();
        assert_eq!(spans, vec![r#"{"a": "}{"}"#, r#"{"b": 1}"#]);
    }

    #[test]
    fn test_balanced_spans_handles_escaped_quotes() {
        let text = r#"x ["say \"]\" now", 2] y"#;
        let first = balanced_spans(text, b'[', b']').next().unwrap();
        assert_eq!(first, r#"["say \"]\" now", 2]"#);
    }

    #[test]
    fn test_key_pattern_splits_camel_case() {
        assert_eq!(split_words("RequiredSkills"), vec!["Required", "Skills"]);
        assert_eq!(split_words("About Me"), vec!["About", "Me"]);
        assert_eq!(split_words("score"), vec!["score"]);
    }

    #[test]
    fn test_extract_keyed_lines_reads_multiline_values() {
        let text = "Here is the analysis:\n\
            Required Skills: Rust, SQL\n\
            and distributed systems\n\
            - experience level: Senior\n\
            SoftSkills: \"Communication\",\n";
        let keys = ["RequiredSkills", "ExperienceLevel", "SoftSkills", "PreferredSkills"];
        let found = extract_keyed_lines(text, &keys);

        assert_eq!(found.len(), 3);
        assert_eq!(
            found["RequiredSkills"],
            Value::String("Rust, SQL\nand distributed systems".into())
        );
        assert_eq!(found["ExperienceLevel"], Value::String("Senior".into()));
        assert_eq!(found["SoftSkills"], Value::String("Communication".into()));
        assert!(!found.contains_key("PreferredSkills"));
    }

    #[test]
    fn test_extract_keyed_lines_keeps_json_values() {
        let text = "\"Skills\": [\"Rust\", \"Go\"],\n\"About Me\": \"Builder\"\n}";
        let found = extract_keyed_lines(text, &["Skills", "About Me"]);
        assert_eq!(found["Skills"], serde_json::json!(["Rust", "Go"]));
        assert_eq!(found["About Me"], Value::String("Builder".into()));
    }

    #[test]
    fn test_extract_keyed_lines_ignores_nested_lines_and_truncated_values() {
        let text = "{\n  \"About Me\": \"Engineer\",\n  \"Projects\": [\n    {\"Name\": \"Folio\"},\n    {\"Name\": \"Ca";
        let found = extract_keyed_lines(text, &["Name", "About Me", "Projects"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found["About Me"], Value::String("Engineer".into()));
    }

    #[test]
    fn test_extract_keyed_lines_keeps_object_value_before_closing_brace() {
        let text = "{\n\"About Me\": \"Builder\",\n\"Skills\": {\"Languages\": [\"Rust\"]}\n}";
        let found = extract_keyed_lines(text, &["Skills", "About Me"]);
        assert_eq!(found["Skills"], serde_json::json!({"Languages": ["Rust"]}));
    }

    #[test]
    fn test_extract_keyed_lines_first_occurrence_wins() {
        let found = extract_keyed_lines("score: 40\nscore: 90", &["score"]);
        assert_eq!(found["score"], serde_json::json!(40));
    }

    #[test]
    fn test_extract_keyed_lines_without_matches_is_empty() {
        assert!(extract_keyed_lines("Not JSON at all", &["RequiredSkills"]).is_empty());
        assert!(extract_keyed_lines("RequiredSkills: Rust", &[]).is_empty());
    }
}
