// Shared prompt fragments and prompt-building utilities.
// Each feature keeps its own templates in generation/prompts.rs.
// This file contains cross-cutting fragments only.

/// Appended to every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt whose reply is displayed as-is.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Do NOT include any introductory or instructional text. \
    Do NOT include Markdown, asterisks, or bold/italic formatting. \
    Return only the content to be displayed.";

/// Fills `{name}` placeholders in a template in a single pass, so text inserted
/// for one placeholder is never rescanned. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let out = fill_template("{a} and {a} but {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x but y");
    }

    #[test]
    fn test_fill_template_leaves_unknown_placeholders() {
        assert_eq!(fill_template("{missing}", &[("a", "x")]), "{missing}");
        assert_eq!(fill_template("{\"k\": 1}", &[("a", "x")]), "{\"k\": 1}");
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_text() {
        let out = fill_template("{a} {b}", &[("a", "{b}"), ("b", "y")]);
        assert_eq!(out, "{b} y");
    }
}
