//! Best-effort tailoring of a structured resume to a target job.

use tracing::{info, warn};

use crate::generation::prompts::ENHANCE_PORTFOLIO_TEMPLATE;
use crate::generation::{complete, TAILORING};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::resume::{StructuredResume, RESUME_KEYS};
use crate::normalize::{normalize_object, ObjectShape};

/// Never fails. Any transport or parse failure returns `resume` unchanged;
/// a usable reply is merged via `StructuredResume::merge_enhancement`.
pub async fn enhance_portfolio_with_job_description(
    llm: &dyn TextGenerator,
    resume: &StructuredResume,
    job_text: &str,
) -> StructuredResume {
    let resume_json = resume.to_prompt_json();

    let prompt = fill_template(
        ENHANCE_PORTFOLIO_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_json", &resume_json),
            ("job_text", job_text),
        ],
    );

    let raw = match complete(llm, &prompt, TAILORING).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Enhancement skipped: {}", e);
            return resume.clone();
        }
    };

    match normalize_object(&raw, &ObjectShape::strict(RESUME_KEYS)) {
        Ok(enhancement) => {
            info!("Portfolio enhanced against job description ({} keys)", enhancement.len());
            resume.merge_enhancement(&enhancement)
        }
        Err(e) => {
            warn!("Enhancement reply unusable, keeping original: {}", e);
            resume.clone()
        }
    }
}
