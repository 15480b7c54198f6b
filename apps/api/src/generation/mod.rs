// Content generation orchestrator.
// Every feature: build prompt → one generation call → normalize → typed value.
// All generation calls go through llm_client::TextGenerator, never a provider SDK.

pub mod career;
pub mod enhance;
pub mod handlers;
pub mod interview;
pub mod job_analysis;
pub mod prompts;
pub mod resume_analysis;
pub mod sections;

use crate::llm_client::TextGenerator;
use crate::normalize::{GenerationError, GenerationOutcome};

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Structured extraction: low temperature, room for a full JSON document.
pub const EXTRACTION: Sampling = Sampling {
    temperature: 0.2,
    max_tokens: 2000,
};

/// Resume analysis.
pub const ANALYSIS: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 2000,
};

/// Display prose: About Me, skills summary, feedback.
pub const PROSE: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 1000,
};

/// Long-form documents: optimized resume, cover letter, career guide.
pub const LONG_FORM: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 2500,
};

/// Whole-resume JSON rewrites: enhancement against a job description.
pub const TAILORING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 3000,
};

/// Interview scoring.
pub const SCORING: Sampling = Sampling {
    temperature: 0.2,
    max_tokens: 300,
};

/// One generation call. Transport failures become `GenerationError::Unavailable`.
pub(crate) async fn complete(
    llm: &dyn TextGenerator,
    prompt: &str,
    sampling: Sampling,
) -> GenerationOutcome<String> {
    llm.generate(prompt, sampling.temperature, sampling.max_tokens)
        .await
        .map_err(GenerationError::from)
}
