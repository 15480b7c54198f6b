//! Portfolio prose sections.

use crate::generation::prompts::{ABOUT_ME_TEMPLATE, SKILLS_SUMMARY_TEMPLATE};
use crate::generation::{complete, PROSE};
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::resume::StructuredResume;
use crate::normalize::{normalize_text, GenerationOutcome};

pub async fn generate_about_me(
    llm: &dyn TextGenerator,
    resume: &StructuredResume,
) -> GenerationOutcome<String> {
    let resume_json = resume.to_prompt_json();
    let prompt = fill_template(
        ABOUT_ME_TEMPLATE,
        &[
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("resume_json", &resume_json),
        ],
    );
    let raw = complete(llm, &prompt, PROSE).await?;
    normalize_text(&raw)
}

/// Empty skill list → empty summary, without a generation call.
pub async fn generate_skills_summary(
    llm: &dyn TextGenerator,
    skills: &[String],
) -> GenerationOutcome<String> {
    if skills.is_empty() {
        return Ok(String::new());
    }
    let skills = skills.join(", ");
    let prompt = fill_template(
        SKILLS_SUMMARY_TEMPLATE,
        &[("plain_text", PLAIN_TEXT_INSTRUCTION), ("skills", &skills)],
    );
    let raw = complete(llm, &prompt, PROSE).await?;
    normalize_text(&raw)
}
