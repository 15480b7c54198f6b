//! Resume analysis: extracted resume text → `StructuredResume`.

use tracing::info;

use crate::generation::prompts::RESUME_ANALYSIS_TEMPLATE;
use crate::generation::{complete, ANALYSIS};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::TextGenerator;
use crate::models::resume::{StructuredResume, RESUME_KEYS};
use crate::normalize::{normalize_object, GenerationOutcome, ObjectShape};

/// Structures raw resume text. Strict: an unusable reply fails the whole operation.
/// Sections the reply omits default to empty.
pub async fn analyze_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> GenerationOutcome<StructuredResume> {
    let prompt = fill_template(
        RESUME_ANALYSIS_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_text", resume_text),
        ],
    );

    let raw = complete(llm, &prompt, ANALYSIS).await?;
    let map = normalize_object(&raw, &ObjectShape::strict(RESUME_KEYS))?;
    let resume = StructuredResume::from_map(&map);

    info!(
        "Resume analyzed: {} skills, {} jobs, {} projects, {} education entries",
        resume.skills.len(),
        resume.work_experience.len(),
        resume.projects.len(),
        resume.education.len()
    );
    Ok(resume)
}
