//! Canonical structured resume used to render a portfolio.
//!
//! Every field is always present: strings default to `""`, lists to `[]`.
//! Construction from model output goes through `StructuredResume::from_map`,
//! which tolerates the key spellings and value types generation replies use.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::extract::fold_key;
use crate::parsing::records::{
    parse_delimited_records, parse_skill_list, FieldSchema, EDUCATION_SCHEMA, PROJECT_SCHEMA,
    WORK_EXPERIENCE_SCHEMA,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub designation: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Project {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub board: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StructuredResume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "About Me")]
    pub about_me: String,
    pub skills: Vec<String>,
    #[serde(alias = "Work Experience")]
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
}

/// Keys a generation reply may use for each resume section, canonical first.
pub const NAME_KEYS: &[&str] = &["Name", "Full Name"];
pub const ABOUT_ME_KEYS: &[&str] = &["About Me", "AboutMe", "Summary", "Profile"];
pub const SKILLS_KEYS: &[&str] = &["Skills", "Technical Skills"];
pub const WORK_EXPERIENCE_KEYS: &[&str] = &["Work Experience", "WorkExperience", "Experience"];
pub const PROJECTS_KEYS: &[&str] = &["Projects"];
pub const EDUCATION_KEYS: &[&str] = &["Education"];

/// Every key the resume line-extraction fallback searches for.
pub const RESUME_KEYS: &[&str] = &[
    "Name",
    "About Me",
    "Skills",
    "Work Experience",
    "Projects",
    "Education",
];

impl StructuredResume {
    /// Builds a resume from a loosely-typed object, defaulting anything missing.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            name: lookup(map, NAME_KEYS)
                .map(value_to_text)
                .filter(|s| !s.is_empty()),
            about_me: lookup(map, ABOUT_ME_KEYS)
                .map(value_to_text)
                .unwrap_or_default(),
            skills: lookup(map, SKILLS_KEYS).map(skills_from).unwrap_or_default(),
            work_experience: lookup(map, WORK_EXPERIENCE_KEYS)
                .map(|v| entries_from(v, &WORK_EXPERIENCE_SCHEMA, WorkExperience::from_value))
                .unwrap_or_default(),
            projects: lookup(map, PROJECTS_KEYS)
                .map(|v| entries_from(v, &PROJECT_SCHEMA, Project::from_value))
                .unwrap_or_default(),
            education: lookup(map, EDUCATION_KEYS)
                .map(|v| entries_from(v, &EDUCATION_SCHEMA, Education::from_value))
                .unwrap_or_default(),
        }
    }

    /// Pretty JSON for embedding in prompts.
    pub fn to_prompt_json(&self) -> String {
        // strings and string-keyed structs only; serialization cannot fail
        serde_json::to_string_pretty(self).expect("StructuredResume always serializes")
    }

    /// Shallow, field-wise overwrite from an enhancement reply.
    ///
    /// Only the declared resume sections are considered, and a section is
    /// replaced only when the reply carries it AND this resume has it. Every
    /// section except the optional `Name` is always present here, so `Name`
    /// is the one field an enhancement cannot introduce. Text and skills are
    /// replaced only by non-empty values; list sections only by a JSON array
    /// yielding at least one entry.
    pub fn merge_enhancement(&self, enhancement: &Map<String, Value>) -> Self {
        let mut merged = self.clone();

        if merged.name.is_some() {
            if let Some(name) = lookup(enhancement, NAME_KEYS)
                .map(value_to_text)
                .filter(|s| !s.is_empty())
            {
                merged.name = Some(name);
            }
        }
        if let Some(about_me) = lookup(enhancement, ABOUT_ME_KEYS)
            .map(value_to_text)
            .filter(|s| !s.is_empty())
        {
            merged.about_me = about_me;
        }
        if let Some(skills) = lookup(enhancement, SKILLS_KEYS)
            .map(skills_from)
            .filter(|skills| !skills.is_empty())
        {
            merged.skills = skills;
        }
        if let Some(entries) =
            replacement_entries(enhancement, WORK_EXPERIENCE_KEYS, WorkExperience::from_value)
        {
            merged.work_experience = entries;
        }
        if let Some(entries) = replacement_entries(enhancement, PROJECTS_KEYS, Project::from_value)
        {
            merged.projects = entries;
        }
        if let Some(entries) =
            replacement_entries(enhancement, EDUCATION_KEYS, Education::from_value)
        {
            merged.education = entries;
        }

        merged
    }
}

/// Entries of a list section in an enhancement reply, or `None` unless it is
/// a JSON array with at least one usable entry.
fn replacement_entries<T>(
    enhancement: &Map<String, Value>,
    keys: &[&str],
    from_value: impl Fn(&Value) -> Option<T>,
) -> Option<Vec<T>> {
    match lookup(enhancement, keys)? {
        Value::Array(items) => {
            let entries: Vec<T> = items.iter().filter_map(from_value).collect();
            (!entries.is_empty()).then_some(entries)
        }
        _ => None,
    }
}

impl WorkExperience {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                company: text_field(map, &["Company", "Organization", "Employer"]),
                designation: text_field(map, &["Designation", "Title", "Role", "Position"]),
                duration: text_field(map, &["Duration", "Dates", "Period"]),
                description: text_field(map, &["Description", "Responsibilities", "Details"]),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(Self {
                description: s.trim().to_string(),
                ..Self::default()
            }),
            _ => None,
        }
    }
}

impl Project {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                name: text_field(map, &["Name", "Title", "Project"]),
                description: text_field(map, &["Description", "Details", "Summary"]),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(Self {
                name: s.trim().to_string(),
                ..Self::default()
            }),
            _ => None,
        }
    }
}

impl Education {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                degree: text_field(map, &["Degree", "Qualification"]),
                institution: text_field(map, &["Institution", "School", "University", "College"]),
                board: text_field(map, &["Board", "University Board"]),
                description: text_field(map, &["Description", "Details", "Grade"]),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(Self {
                degree: s.trim().to_string(),
                ..Self::default()
            }),
            _ => None,
        }
    }
}

/// Case- and spacing-insensitive key lookup: `"work_experience"` finds `"Work Experience"`.
pub(crate) fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| {
        let wanted = fold_key(key);
        map.iter()
            .find(|(k, _)| fold_key(k) == wanted)
            .map(|(_, v)| v)
    })
}

fn text_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    lookup(map, keys).map(value_to_text).unwrap_or_default()
}

fn part(parts: &[String], idx: usize) -> String {
    parts.get(idx).cloned().unwrap_or_default()
}

/// Flattens any JSON value into display text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .values()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn skills_from(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => parse_skill_list(s),
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::String(s) => parse_skill_list(s),
                other => vec![value_to_text(other)],
            })
            .filter(|s| !s.is_empty())
            .collect(),
        // {"Languages": ["Rust"], "Tools": "Git, Docker"}
        Value::Object(groups) => groups.values().flat_map(skills_from).collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_text(other)],
    }
}

fn entries_from<T>(
    value: &Value,
    schema: &FieldSchema,
    from_value: impl Fn(&Value) -> Option<T>,
) -> Vec<T>
where
    T: FromParts,
{
    match value {
        Value::Array(items) => items.iter().filter_map(&from_value).collect(),
        Value::String(s) => parse_delimited_records(s, schema)
            .into_iter()
            .map(|record| T::from_parts(record.values()))
            .collect(),
        Value::Object(_) => from_value(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Construction from a delimiter-parsed record, fields in schema order.
pub trait FromParts {
    fn from_parts(parts: &[String]) -> Self;
}

impl FromParts for WorkExperience {
    fn from_parts(parts: &[String]) -> Self {
        Self {
            company: part(parts, 0),
            designation: part(parts, 1),
            duration: part(parts, 2),
            description: part(parts, 3),
        }
    }
}

impl FromParts for Project {
    fn from_parts(parts: &[String]) -> Self {
        Self {
            name: part(parts, 0),
            description: part(parts, 1),
        }
    }
}

impl FromParts for Education {
    fn from_parts(parts: &[String]) -> Self {
        Self {
            degree: part(parts, 0),
            institution: part(parts, 1),
            board: part(parts, 2),
            description: part(parts, 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_map_defaults_every_field() {
        let resume = StructuredResume::from_map(&Map::new());
        assert_eq!(resume, StructuredResume::default());

        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(
            json,
            json!({
                "AboutMe": "",
                "Skills": [],
                "WorkExperience": [],
                "Projects": [],
                "Education": []
            })
        );
    }

    #[test]
    fn test_from_map_reads_model_key_spellings() {
        let resume = StructuredResume::from_map(&map(json!({
            "About Me": "Backend engineer.",
            "skills": ["Rust", "SQL, Redis"],
            "Work Experience": [
                {"Company": "Acme", "Title": "Engineer", "Dates": "2019-2021",
                 "Responsibilities": ["Built APIs", "On-call"]}
            ],
            "Projects": [{"Name": "Folio", "Description": "Portfolio builder"}, "Side quest"],
            "Education": [{"Degree": "BSc", "University": "MIT"}]
        })));

        assert_eq!(resume.name, None);
        assert_eq!(resume.about_me, "Backend engineer.");
        assert_eq!(resume.skills, vec!["Rust", "SQL", "Redis"]);
        assert_eq!(
            resume.work_experience,
            vec![WorkExperience {
                company: "Acme".into(),
                designation: "Engineer".into(),
                duration: "2019-2021".into(),
                description: "Built APIs\nOn-call".into(),
            }]
        );
        assert_eq!(resume.projects.len(), 2);
        assert_eq!(resume.projects[1].name, "Side quest");
        assert_eq!(resume.projects[1].description, "");
        assert_eq!(resume.education[0].institution, "MIT");
        assert_eq!(resume.education[0].board, "");
    }

    #[test]
    fn test_from_map_tolerates_wrong_value_types() {
        let resume = StructuredResume::from_map(&map(json!({
            "Name": "",
            "AboutMe": null,
            "Skills": {"Languages": ["Rust"], "Tools": "Git, Docker"},
            "WorkExperience": "Acme|Engineer|2019-2021;Broken",
            "Projects": 42,
            "Education": {"Degree": "MSc"}
        })));

        assert_eq!(resume.name, None);
        assert_eq!(resume.about_me, "");
        assert_eq!(resume.skills, vec!["Rust", "Git", "Docker"]);
        assert_eq!(resume.work_experience.len(), 1);
        assert_eq!(resume.work_experience[0].company, "Acme");
        assert!(resume.projects.is_empty());
        assert_eq!(resume.education[0].degree, "MSc");
    }

    #[test]
    fn test_deserialize_accepts_both_key_styles() {
        let spaced: StructuredResume =
            serde_json::from_value(json!({"About Me": "Hi", "Work Experience": []})).unwrap();
        let compact: StructuredResume = serde_json::from_value(json!({"AboutMe": "Hi"})).unwrap();
        assert_eq!(spaced, compact);
    }

    #[test]
    fn test_merge_overwrites_only_present_sections() {
        let original = StructuredResume {
            name: None,
            about_me: "Old".into(),
            skills: vec!["Rust".into()],
            work_experience: vec![WorkExperience::from_parts(&["Acme".to_string()])],
            projects: vec![],
            education: vec![],
        };
        let merged = original.merge_enhancement(&map(json!({
            "About Me": "New",
            "Skills": ["Rust", "Kubernetes"],
            "Name": "Injected",
            "Hobbies": ["chess"]
        })));

        assert_eq!(merged.about_me, "New");
        assert_eq!(merged.skills, vec!["Rust", "Kubernetes"]);
        assert_eq!(merged.name, None);
        assert_eq!(merged.work_experience, original.work_experience);
    }

    #[test]
    fn test_prompt_json_uses_canonical_keys() {
        let resume = StructuredResume {
            about_me: "Builder".into(),
            skills: vec!["Rust".into()],
            ..StructuredResume::default()
        };
        let json = resume.to_prompt_json();
        assert!(json.contains("\"AboutMe\": \"Builder\""));
        assert!(!json.contains("\"Name\""));
    }

    #[test]
    fn test_merge_replaces_existing_name() {
        let original = StructuredResume {
            name: Some("Ada".into()),
            ..StructuredResume::default()
        };
        let merged = original.merge_enhancement(&map(json!({"name": "Ada Lovelace"})));
        assert_eq!(merged.name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_merge_with_empty_map_is_identity() {
        let original = StructuredResume {
            about_me: "Same".into(),
            skills: vec!["Go".into()],
            ..StructuredResume::default()
        };
        assert_eq!(original.merge_enhancement(&Map::new()), original);
    }

    #[test]
    fn test_merge_keeps_sections_without_usable_entries() {
        let original = StructuredResume {
            about_me: "Engineer".into(),
            skills: vec!["Rust".into()],
            work_experience: vec![WorkExperience::from_parts(&[
                "Acme".to_string(),
                "Engineer".to_string(),
                "2019-2021".to_string(),
            ])],
            projects: vec![Project::from_parts(&["Folio".to_string()])],
            ..StructuredResume::default()
        };
        let merged = original.merge_enhancement(&map(json!({
            "About Me": "  ",
            "Skills": [],
            "Work Experience": "[ { \"Company\": \"Acme\", \"Description\": \"Built low-lat",
            "Projects": []
        })));
        assert_eq!(merged, original);
    }
}
