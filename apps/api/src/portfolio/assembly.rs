//! Portfolio assembly: structured resume (+ optional job) → rendered page.
//!
//! Flow: enhance (when a job is given) → title → About Me and skills summary
//! (generated concurrently) → fixed-template render.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use tracing::info;

use crate::generation::enhance::enhance_portfolio_with_job_description;
use crate::generation::job_analysis::JobAnalysis;
use crate::generation::sections::{generate_about_me, generate_skills_summary};
use crate::llm_client::TextGenerator;
use crate::models::portfolio::{PortfolioContent, PortfolioDocument};
use crate::models::resume::StructuredResume;
use crate::normalize::GenerationOutcome;
use crate::portfolio::render::render_portfolio;

pub const FALLBACK_TITLE: &str = "Portfolio";

static GREETING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^hi\b[,.! ]*(?:i'?m |i am |my name is )?([a-z ]+)")
        .expect("greeting pattern is valid")
});

/// The target job: its description and the structured analysis of it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobContext<'a> {
    pub description: &'a str,
    pub analysis: JobAnalysis,
}

impl JobContext<'_> {
    /// Job text handed to enhancement: the description, followed by the
    /// analysis unless it is only the placeholder.
    pub fn enhancement_text(&self) -> String {
        let description = self.description.trim();
        if self.analysis == JobAnalysis::placeholder() {
            return description.to_string();
        }
        format!(
            "{description}\n\nKey requirements:\n{}",
            self.analysis.summary()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPortfolio {
    pub content: PortfolioContent,
    pub document: PortfolioDocument,
}

pub async fn assemble(
    llm: &dyn TextGenerator,
    source: &StructuredResume,
    job: Option<&JobContext<'_>>,
) -> GenerationOutcome<AssembledPortfolio> {
    let resume = match job {
        Some(job) => {
            enhance_portfolio_with_job_description(llm, source, &job.enhancement_text()).await
        }
        None => source.clone(),
    };

    let title = derive_title(&resume);

    let (about_me, skills_summary) = tokio::join!(
        generate_about_me(llm, &resume),
        generate_skills_summary(llm, &resume.skills),
    );

    let content = PortfolioContent {
        title,
        about_me: about_me?,
        skills_summary: skills_summary?,
        resume,
    };
    let document = render_portfolio(&content, Utc::now().year());

    info!("Assembled portfolio '{}'", content.title);
    Ok(AssembledPortfolio { content, document })
}

/// Explicit name, else a greeting-prefixed name in About Me, else its first
/// two words, else `"Portfolio"`.
pub fn derive_title(resume: &StructuredResume) -> String {
    if let Some(name) = resume.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let about = resume.about_me.trim();
    if let Some(name) = GREETING_NAME
        .captures(about)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|n| !n.is_empty())
    {
        return name.to_string();
    }

    let leading = about.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    if leading.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        leading
    }
}
