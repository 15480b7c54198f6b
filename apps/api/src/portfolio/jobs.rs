//! Detached portfolio generation. The triggering request returns as soon as
//! the job is spawned; the record's status carries the outcome.

use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{extract_text_blocking, FileKind};
use crate::generation::job_analysis::analyze_job_description;
use crate::generation::resume_analysis::analyze_resume;
use crate::llm_client::TextGenerator;
use crate::models::portfolio::RecordStatus;
use crate::models::resume::StructuredResume;
use crate::portfolio::assembly::{assemble, AssembledPortfolio, JobContext};
use crate::portfolio::store::{save_assembled, set_status};
use crate::state::AppState;

/// Where the portfolio's structured data comes from.
#[derive(Debug)]
pub enum AssemblySource {
    /// An uploaded file, extracted and analyzed in the job.
    Upload { bytes: Bytes, kind: FileKind },
    /// Answers already collected by the chat flow.
    Chat(StructuredResume),
}

pub fn spawn_assembly(
    state: AppState,
    portfolio_id: Uuid,
    source: AssemblySource,
    job_description: Option<String>,
) {
    tokio::spawn(async move {
        let result = async {
            let assembled =
                build_portfolio(state.llm.as_ref(), source, job_description.as_deref()).await?;
            save_assembled(&state.db, portfolio_id, &assembled).await?;
            Ok::<_, AppError>(())
        }
        .await;

        match result {
            Ok(()) => info!("Portfolio {} completed", portfolio_id),
            Err(e) => {
                error!("Portfolio {} failed: {}", portfolio_id, e);
                if let Err(db_err) = set_status(&state.db, portfolio_id, RecordStatus::Error).await
                {
                    error!(
                        "Could not mark portfolio {} as errored: {}",
                        portfolio_id, db_err
                    );
                }
            }
        }
    });
}

/// extract → analyze (upload only) → job analysis (optional) → assemble.
///
/// A job analysis that cannot reach the generation service is dropped with a
/// warning; the portfolio is then built untailored.
pub async fn build_portfolio(
    llm: &dyn TextGenerator,
    source: AssemblySource,
    job_description: Option<&str>,
) -> Result<AssembledPortfolio, AppError> {
    let resume = match source {
        AssemblySource::Upload { bytes, kind } => {
            let text = extract_text_blocking(bytes, kind).await?;
            analyze_resume(llm, &text).await?
        }
        AssemblySource::Chat(resume) => resume,
    };

    let job = match job_description {
        Some(description) => match analyze_job_description(llm, description).await {
            Ok(analysis) => Some(JobContext {
                description,
                analysis,
            }),
            Err(e) => {
                warn!("Skipping job tailoring: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(assemble(llm, &resume, job.as_ref()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;

    fn chat_resume() -> StructuredResume {
        StructuredResume {
            name: Some("Ada".into()),
            about_me: "Ada, Analyst".into(),
            ..StructuredResume::default()
        }
    }

    #[tokio::test]
    async fn test_chat_source_skips_resume_analysis() {
        let llm = ScriptedGenerator::new().reply("I analyze engines.");
        let assembled = build_portfolio(&llm, AssemblySource::Chat(chat_resume()), None)
            .await
            .unwrap();

        assert_eq!(llm.calls(), 1);
        assert_eq!(assembled.content.title, "Ada");
        assert_eq!(assembled.content.about_me, "I analyze engines.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_job_analysis_builds_untailored() {
        let llm = ScriptedGenerator::new()
            .fail(503)
            .fail(503)
            .reply("About text.");
        let assembled = build_portfolio(
            &llm,
            AssemblySource::Chat(chat_resume()),
            Some("Senior analyst"),
        )
        .await
        .unwrap();

        // two job-analysis attempts, no enhancement call, one about-me call
        assert_eq!(llm.calls(), 3);
        assert_eq!(assembled.content.resume, chat_resume());
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_analysis_still_tailors_with_job_text() {
        let llm = ScriptedGenerator::new()
            .reply("no structure here")
            .reply("still none")
            .reply(r#"{"About Me": "Analyst who ships dashboards"}"#)
            .reply("About text.");
        build_portfolio(
            &llm,
            AssemblySource::Chat(chat_resume()),
            Some("Senior analyst, BI dashboards"),
        )
        .await
        .unwrap();

        let enhancement_prompt = &llm.prompts()[2];
        assert!(enhancement_prompt.contains("Senior analyst, BI dashboards"));
        assert!(!enhancement_prompt.contains("Not specified"));
    }

    #[tokio::test]
    async fn test_unsupported_upload_fails_extraction() {
        let llm = ScriptedGenerator::new();
        let result = build_portfolio(
            &llm,
            AssemblySource::Upload {
                bytes: Bytes::from_static(b"not a zip"),
                kind: FileKind::Docx,
            },
            None,
        )
        .await;

        assert!(matches!(result, Err(AppError::Extraction(_))));
        assert_eq!(llm.calls(), 0);
    }
}
