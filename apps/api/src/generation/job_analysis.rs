//! Job description analysis, the one generation feature allowed a second attempt.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::generation::prompts::JOB_ANALYSIS_TEMPLATE;
use crate::generation::{complete, EXTRACTION};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::resume::{lookup, value_to_text};
use crate::normalize::{normalize_object, GenerationError, GenerationOutcome, ObjectShape};

/// Total attempts, including the first.
pub const MAX_ATTEMPTS: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

pub const JOB_ANALYSIS_KEYS: &[&str] = &[
    "RequiredSkills",
    "PreferredSkills",
    "ExperienceLevel",
    "KeyResponsibilities",
    "TechnicalRequirements",
    "SoftSkills",
];

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JobAnalysis {
    pub required_skills: String,
    pub preferred_skills: String,
    pub experience_level: String,
    pub key_responsibilities: String,
    pub technical_requirements: String,
    pub soft_skills: String,
}

impl JobAnalysis {
    /// Fixed mapping returned when no attempt yields a recognized key.
    pub fn placeholder() -> Self {
        Self {
            required_skills: NOT_SPECIFIED.to_string(),
            preferred_skills: NOT_SPECIFIED.to_string(),
            experience_level: NOT_SPECIFIED.to_string(),
            key_responsibilities: NOT_SPECIFIED.to_string(),
            technical_requirements: NOT_SPECIFIED.to_string(),
            soft_skills: NOT_SPECIFIED.to_string(),
        }
    }

    /// Returns `None` when the map carries none of the recognized keys.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        let field = |key: &str| lookup(map, &[key]).map(value_to_text);

        if JOB_ANALYSIS_KEYS.iter().all(|key| lookup(map, &[key]).is_none()) {
            return None;
        }

        Some(Self {
            required_skills: field("RequiredSkills").unwrap_or_default(),
            preferred_skills: field("PreferredSkills").unwrap_or_default(),
            experience_level: field("ExperienceLevel").unwrap_or_default(),
            key_responsibilities: field("KeyResponsibilities").unwrap_or_default(),
            technical_requirements: field("TechnicalRequirements").unwrap_or_default(),
            soft_skills: field("SoftSkills").unwrap_or_default(),
        })
    }

    fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Labelled plain-text rendering for embedding in other prompts.
    pub fn summary(&self) -> String {
        [
            ("Required skills", &self.required_skills),
            ("Preferred skills", &self.preferred_skills),
            ("Experience level", &self.experience_level),
            ("Key responsibilities", &self.key_responsibilities),
            ("Technical requirements", &self.technical_requirements),
            ("Soft skills", &self.soft_skills),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// Analyzes a job description with up to `MAX_ATTEMPTS` generation calls.
///
/// A reply that is unparsable, or parses but carries none of the recognized
/// keys, triggers the next attempt. After the last attempt the placeholder is
/// returned as a degraded success. Only when every attempt fails at the
/// transport level is `Unavailable` reported.
pub async fn analyze_job_description(
    llm: &dyn TextGenerator,
    job_text: &str,
) -> GenerationOutcome<JobAnalysis> {
    let prompt = fill_template(
        JOB_ANALYSIS_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION), ("job_text", job_text)],
    );

    let placeholder = JobAnalysis::placeholder();
    let mut transport_error: Option<GenerationError> = None;
    let mut got_reply = false;

    for attempt in 1..=MAX_ATTEMPTS {
        if attempt > 1 {
            tokio::time::sleep(RETRY_BACKOFF * (attempt - 1)).await;
        }

        let raw = match complete(llm, &prompt, EXTRACTION).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Job analysis attempt {}/{} failed: {}", attempt, MAX_ATTEMPTS, e);
                transport_error = Some(e);
                continue;
            }
        };
        got_reply = true;

        let shape = if attempt == MAX_ATTEMPTS {
            ObjectShape::with_default(JOB_ANALYSIS_KEYS, placeholder.to_map())
        } else {
            ObjectShape::strict(JOB_ANALYSIS_KEYS)
        };

        match normalize_object(&raw, &shape).map(|map| JobAnalysis::from_map(&map)) {
            Ok(Some(analysis)) => {
                info!("Job description analyzed on attempt {}", attempt);
                return Ok(analysis);
            }
            Ok(None) => warn!(
                "Job analysis attempt {}/{}: reply had none of the expected keys",
                attempt, MAX_ATTEMPTS
            ),
            Err(e) => warn!(
                "Job analysis attempt {}/{}: {}",
                attempt, MAX_ATTEMPTS, e
            ),
        }
    }

    match transport_error {
        Some(e) if !got_reply => Err(e),
        _ => {
            warn!("Job analysis exhausted {} attempts; using placeholder", MAX_ATTEMPTS);
            Ok(placeholder)
        }
    }
}
