//! Delimiter-formatted answer parsing.
//!
//! Grammar: records separated by `;`, fields within a record separated by `|`.
//! Skill lists use commas or newlines instead. Every function here is total:
//! malformed input yields fewer records, never an error.

use tracing::debug;

/// Ordered field names of a record type and how many leading fields are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub fields: &'static [&'static str],
    /// Candidates with fewer parts than this are dropped.
    pub required: usize,
}

pub const WORK_EXPERIENCE_SCHEMA: FieldSchema = FieldSchema {
    fields: &["Company", "Designation", "Duration", "Description"],
    required: 3,
};

pub const PROJECT_SCHEMA: FieldSchema = FieldSchema {
    fields: &["Name", "Description"],
    required: 1,
};

pub const EDUCATION_SCHEMA: FieldSchema = FieldSchema {
    fields: &["Degree", "Institution", "Board", "Description"],
    required: 1,
};

const RECORD_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = '|';

/// One accepted record. Always holds exactly one value per schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: &'static [&'static str],
    values: Vec<String>,
}

impl Record {
    /// Values in schema order; missing optional fields are `""`.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of a named field, or `None` if the schema has no such field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .position(|f| *f == field)
            .map(|idx| self.values[idx].as_str())
    }
}

/// Splits `answer` into records according to `schema`.
///
/// Parts beyond the last schema field are folded back into the last field
/// with `|`, so a description containing a pipe is not truncated.
pub fn parse_delimited_records(answer: &str, schema: &FieldSchema) -> Vec<Record> {
    let mut dropped = 0usize;

    let records: Vec<Record> = answer
        .split(RECORD_SEPARATOR)
        .filter(|candidate| !candidate.trim().is_empty())
        .filter_map(|candidate| {
            let parts: Vec<&str> = candidate.split(FIELD_SEPARATOR).map(str::trim).collect();
            if parts.len() < schema.required.max(1) {
                dropped += 1;
                return None;
            }
            Some(Record {
                fields: schema.fields,
                values: fit_to_schema(&parts, schema.fields.len()),
            })
        })
        .collect();

    if dropped > 0 {
        debug!(
            "Dropped {} record candidate(s) with fewer than {} fields",
            dropped, schema.required
        );
    }
    records
}

fn fit_to_schema(parts: &[&str], width: usize) -> Vec<String> {
    let mut values: Vec<String> = parts.iter().take(width).map(|p| p.to_string()).collect();
    if parts.len() > width && width > 0 {
        values[width - 1] = parts[width - 1..].join("|");
    }
    values.resize(width, String::new());
    values
}

/// Comma- or newline-separated skill list; order and duplicates are kept.
pub fn parse_skill_list(answer: &str) -> Vec<String> {
    answer
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_experience_scenario() {
        let records = parse_delimited_records(
            "Acme|Engineer|2019-2021;Globex|Lead|2021-2023|Shipped X",
            &WORK_EXPERIENCE_SCHEMA,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Company"), Some("Acme"));
        assert_eq!(records[0].get("Description"), Some(""));
        assert_eq!(records[1].get("Designation"), Some("Lead"));
        assert_eq!(records[1].get("Description"), Some("Shipped X"));
    }

    #[test]
    fn test_short_candidates_are_dropped_not_errors() {
        let records =
            parse_delimited_records("Acme|Engineer; ;Initech|QA|2018", &WORK_EXPERIENCE_SCHEMA);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].values(), ["Initech", "QA", "2018", ""]);
    }

    #[test]
    fn test_parts_are_trimmed_and_empty_parts_count() {
        let records = parse_delimited_records("  Acme | | 2020  ", &WORK_EXPERIENCE_SCHEMA);
        assert_eq!(records[0].values(), ["Acme", "", "2020", ""]);
    }

    #[test]
    fn test_overflow_folds_into_last_field() {
        let records = parse_delimited_records("Folio|Rust|Axum|Postgres", &PROJECT_SCHEMA);
        assert_eq!(records[0].values(), ["Folio", "Rust|Axum|Postgres"]);
    }

    #[test]
    fn test_education_accepts_degree_only() {
        let records = parse_delimited_records(
            "Bachelor in Commerce|Hinduja College of Commerce, Mumbai|Maharashtra State Board|Top 10% of class; SSC",
            &EDUCATION_SCHEMA,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Board"), Some("Maharashtra State Board"));
        assert_eq!(records[1].values(), ["SSC", "", "", ""]);
    }

    #[test]
    fn test_unknown_field_is_none() {
        let records = parse_delimited_records("Folio", &PROJECT_SCHEMA);
        assert_eq!(records[0].get("Url"), None);
    }

    #[test]
    fn test_blank_answer_yields_nothing() {
        assert!(parse_delimited_records("", &PROJECT_SCHEMA).is_empty());
        assert!(parse_delimited_records(" ; ;\n", &PROJECT_SCHEMA).is_empty());
        assert!(parse_skill_list(" ,\n, ").is_empty());
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let input = "Acme|Engineer|2019;Globex|Lead";
        assert_eq!(
            parse_delimited_records(input, &WORK_EXPERIENCE_SCHEMA),
            parse_delimited_records(input, &WORK_EXPERIENCE_SCHEMA)
        );
    }

    #[test]
    fn test_skill_list_splits_on_commas_and_newlines() {
        assert_eq!(
            parse_skill_list("Rust, Go\nSQL,,Rust\n"),
            vec!["Rust", "Go", "SQL", "Rust"]
        );
    }

    #[test]
    fn test_skill_list_ignores_record_delimiters() {
        assert_eq!(parse_skill_list("C|C++; Java"), vec!["C|C++; Java"]);
    }
}
