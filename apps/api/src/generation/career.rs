//! Free-text career documents: optimized resume, cover letter, career guide.
//! Each makes exactly one generation call and returns the trimmed reply.

use crate::generation::job_analysis::JobAnalysis;
use crate::generation::prompts::{
    CAREER_GUIDE_TEMPLATE, COVER_LETTER_TEMPLATE, OPTIMIZE_RESUME_TEMPLATE,
};
use crate::generation::{complete, LONG_FORM};
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::normalize::{normalize_text, GenerationOutcome};

pub async fn optimize_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
    analysis: &JobAnalysis,
) -> GenerationOutcome<String> {
    let job_analysis = analysis.summary();
    let prompt = fill_template(
        OPTIMIZE_RESUME_TEMPLATE,
        &[
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("resume_text", resume_text),
            ("job_analysis", &job_analysis),
        ],
    );
    let raw = complete(llm, &prompt, LONG_FORM).await?;
    normalize_text(&raw)
}

/// Length guidance lives in the prompt only; the reply is not truncated.
pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    job_text: &str,
    resume_text: &str,
) -> GenerationOutcome<String> {
    let prompt = fill_template(
        COVER_LETTER_TEMPLATE,
        &[
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("job_text", job_text),
            ("resume_text", resume_text),
        ],
    );
    let raw = complete(llm, &prompt, LONG_FORM).await?;
    normalize_text(&raw)
}

pub async fn generate_career_guide(
    llm: &dyn TextGenerator,
    job_text: &str,
    resume_text: &str,
) -> GenerationOutcome<String> {
    let prompt = fill_template(
        CAREER_GUIDE_TEMPLATE,
        &[
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
            ("job_text", job_text),
            ("resume_text", resume_text),
        ],
    );
    let raw = complete(llm, &prompt, LONG_FORM).await?;
    normalize_text(&raw)
}
