//! Multipart upload reading and the standalone text-extraction endpoint.

use axum::extract::Multipart;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::{extract_text_blocking, FileKind};

const FILE_FIELD: &str = "file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// A resume upload: the file plus an optional job description field.
#[derive(Debug)]
pub struct ResumeUpload {
    pub filename: String,
    pub kind: FileKind,
    pub bytes: Bytes,
    pub job_description: Option<String>,
}

/// Reads the `file` field (required) and `job_description` (optional, blank ignored).
/// Unknown fields are skipped.
pub async fn read_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some((filename, bytes));
            }
            JOB_DESCRIPTION_FIELD => {
                let text = field.text().await?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (filename, bytes) = file
        .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' field")))?;
    let kind = FileKind::from_filename(&filename)?;

    Ok(ResumeUpload {
        filename,
        kind,
        bytes,
        job_description,
    })
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// POST /api/resumes/extract
pub async fn handle_extract_resume(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    let text = extract_text_blocking(upload.bytes, upload.kind).await?;
    info!(
        "Extracted {} characters from '{}'",
        text.len(),
        upload.filename
    );
    Ok(Json(ExtractResponse { text }))
}
