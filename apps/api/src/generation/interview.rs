//! Mock interview generation: questions, score, feedback.
//!
//! Questions and scores are strict shapes. A wrong count, a non-numeric
//! score or a score outside 0..=100 fails the operation; nothing is padded,
//! truncated or clamped.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::generation::prompts::{
    INTERVIEW_FEEDBACK_TEMPLATE, INTERVIEW_QUESTIONS_TEMPLATE, INTERVIEW_SCORE_BARE_TEMPLATE,
    INTERVIEW_SCORE_OBJECT_TEMPLATE,
};
use crate::generation::{complete, EXTRACTION, PROSE, SCORING};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::interview::InterviewQuestion;
use crate::normalize::{
    integer_field, normalize_array, normalize_integer, normalize_object, normalize_text,
    GenerationError, GenerationOutcome, ObjectShape,
};

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;
pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 10;

const SCORE_KEYS: &[&str] = &["score"];

/// How the scoring reply is requested and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFormat {
    /// The reply is the integer alone.
    #[default]
    BareInteger,
    /// The reply is `{"score": n, ...}`.
    JsonObject,
}

pub async fn generate_interview_questions(
    llm: &dyn TextGenerator,
    job_text: &str,
    level: &str,
    count: usize,
) -> GenerationOutcome<Vec<String>> {
    let count_text = count.to_string();
    let prompt = fill_template(
        INTERVIEW_QUESTIONS_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("count", &count_text),
            ("level", level),
            ("job_text", job_text),
        ],
    );

    let raw = complete(llm, &prompt, EXTRACTION).await?;
    let items = normalize_array(&raw, Some(count))?;

    let questions = items
        .iter()
        .map(question_text)
        .collect::<Option<Vec<_>>>()
        .ok_or(GenerationError::UnparsableResponse)?;

    info!("Generated {} interview questions ({})", questions.len(), level);
    Ok(questions)
}

/// Items may be bare strings or `{"question": "..."}` objects; blanks are rejected.
fn question_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s.trim(),
        Value::Object(map) => map
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("question"))
            .and_then(|(_, v)| v.as_str())?
            .trim(),
        _ => return None,
    };
    (!text.is_empty()).then(|| text.to_string())
}

pub async fn score_interview(
    llm: &dyn TextGenerator,
    questions: &[InterviewQuestion],
    format: ScoreFormat,
) -> GenerationOutcome<i64> {
    let transcript = transcript(questions);
    let score = match format {
        ScoreFormat::BareInteger => {
            let prompt = fill_template(
                INTERVIEW_SCORE_BARE_TEMPLATE,
                &[("transcript", &transcript)],
            );
            let raw = complete(llm, &prompt, SCORING).await?;
            normalize_integer(&raw, MIN_SCORE, MAX_SCORE)?
        }
        ScoreFormat::JsonObject => {
            let prompt = fill_template(
                INTERVIEW_SCORE_OBJECT_TEMPLATE,
                &[("json_only", JSON_ONLY_INSTRUCTION), ("transcript", &transcript)],
            );
            let raw = complete(llm, &prompt, SCORING).await?;
            let map = normalize_object(&raw, &ObjectShape::strict(SCORE_KEYS))?;
            integer_field(&map, "score", MIN_SCORE, MAX_SCORE)?
        }
    };

    info!("Interview scored {}", score);
    Ok(score)
}

pub async fn generate_interview_feedback(
    llm: &dyn TextGenerator,
    questions: &[InterviewQuestion],
    score: i64,
) -> GenerationOutcome<String> {
    let transcript = transcript(questions);
    let score_text = score.to_string();
    let prompt = fill_template(
        INTERVIEW_FEEDBACK_TEMPLATE,
        &[
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("score", &score_text),
            ("transcript", &transcript),
        ],
    );
    let raw = complete(llm, &prompt, PROSE).await?;
    normalize_text(&raw)
}

/// `Q1: ...\nA1: ...` blocks separated by blank lines.
fn transcript(questions: &[InterviewQuestion]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            format!(
                "Q{n}: {}\nA{n}: {}",
                q.question,
                q.answer.as_deref().unwrap_or("(no answer)"),
                n = i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    fn answered() -> Vec<InterviewQuestion> {
        vec![
            InterviewQuestion {
                question: "Why Rust?".into(),
                answer: Some("Memory safety".into()),
            },
            InterviewQuestion {
                question: "Describe a hard bug.".into(),
                answer: Some("A deadlock in a worker pool".into()),
            },
        ]
    }

    #[tokio::test]
    async fn test_questions_accept_strings_and_objects() {
        let llm = ScriptedGenerator::new()
            .reply(r#"Here you go: ["What is ownership?", {"question": "Explain lifetimes."}]"#);
        let questions = generate_interview_questions(&llm, "jd", "senior", 2)
            .await
            .unwrap();

        assert_eq!(questions, vec!["What is ownership?", "Explain lifetimes."]);
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("exactly 2 mock interview questions"));
        assert!(prompt.contains("senior candidate"));
    }

    #[tokio::test]
    async fn test_questions_wrong_count_is_not_padded() {
        let llm = ScriptedGenerator::new().reply(r#"["a?", "b?", "c?"]"#);
        assert_eq!(
            generate_interview_questions(&llm, "jd", "junior", 10).await,
            Err(GenerationError::WrongCardinality {
                expected: 10,
                actual: 3
            })
        );
    }

    #[tokio::test]
    async fn test_questions_blank_item_is_unparsable() {
        let llm = ScriptedGenerator::new().reply(r#"["a?", "  "]"#);
        assert_eq!(
            generate_interview_questions(&llm, "jd", "junior", 2).await,
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[tokio::test]
    async fn test_bare_score_in_range() {
        let llm = ScriptedGenerator::new().reply("85");
        let score = score_interview(&llm, &answered(), ScoreFormat::BareInteger)
            .await
            .unwrap();
        assert_eq!(score, 85);
        assert!(llm.prompts()[0].contains("A2: A deadlock in a worker pool"));
    }

    #[tokio::test]
    async fn test_bare_score_out_of_range_is_not_clamped() {
        let llm = ScriptedGenerator::new().reply("150");
        assert_eq!(
            score_interview(&llm, &answered(), ScoreFormat::BareInteger).await,
            Err(GenerationError::OutOfRange {
                value: 150,
                min: 0,
                max: 100
            })
        );
    }

    #[tokio::test]
    async fn test_bare_score_with_words_is_unparsable() {
        let llm = ScriptedGenerator::new().reply("I'd say about 80");
        assert_eq!(
            score_interview(&llm, &answered(), ScoreFormat::BareInteger).await,
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[tokio::test]
    async fn test_object_score_reads_score_field() {
        let llm = ScriptedGenerator::new()
            .reply("```json\n{\"score\": 72, \"rationale\": \"Solid\"}\n```");
        let score = score_interview(&llm, &answered(), ScoreFormat::JsonObject)
            .await
            .unwrap();
        assert_eq!(score, 72);
    }

    #[tokio::test]
    async fn test_object_score_missing_field_is_unparsable() {
        let llm = ScriptedGenerator::new().reply(r#"{"rating": 72}"#);
        assert_eq!(
            score_interview(&llm, &answered(), ScoreFormat::JsonObject).await,
            Err(GenerationError::UnparsableResponse)
        );
    }

    #[tokio::test]
    async fn test_feedback_mentions_score() {
        let llm = ScriptedGenerator::new().reply("Good depth on ownership.");
        let feedback = generate_interview_feedback(&llm, &answered(), 64)
            .await
            .unwrap();
        assert_eq!(feedback, "Good depth on ownership.");
        assert!(llm.prompts()[0].contains("scored 64/100"));
    }
}
