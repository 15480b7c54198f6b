//! Plain-text extraction from uploaded resume files (PDF, DOCX).

pub mod handlers;

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to open DOCX container: {0}")]
    Docx(#[from] zip::result::ZipError),

    #[error("failed to read DOCX body: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed DOCX XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    /// Case-insensitive extension match on the upload's filename.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(FileKind::Pdf),
            Some("docx") => Ok(FileKind::Docx),
            _ => Err(ExtractError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// An empty result is valid: a scanned PDF simply yields no text.
pub fn extract_text(bytes: &[u8], kind: FileKind) -> Result<String, ExtractError> {
    let text = match kind {
        FileKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?
        }
        FileKind::Docx => extract_docx(bytes)?,
    };
    debug!("Extracted {} characters from {:?}", text.len(), kind);
    Ok(text.trim().to_string())
}

/// Runs `extract_text` on the blocking pool. PDF parsing is CPU-bound and the
/// parser may panic on malformed input; a panic surfaces as `Aborted`.
pub async fn extract_text_blocking(bytes: Bytes, kind: FileKind) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| ExtractError::Aborted(e.to_string()))?
}

/// Concatenates `<w:t>` runs, one output line per `<w:p>` paragraph. A
/// paragraph nested in another (a text box) becomes its own line and leaves
/// the enclosing paragraph's text intact.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut lines: Vec<String> = Vec::new();
    let mut open_paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open_paragraphs.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                let Some(paragraph) = open_paragraphs.last_mut() else {
                    continue;
                };
                match e.local_name().as_ref() {
                    b"tab" => paragraph.push('\t'),
                    b"br" => paragraph.push('\n'),
                    _ => {}
                }
            }
            Event::Text(e) if in_text => {
                if let Some(paragraph) = open_paragraphs.last_mut() {
                    paragraph.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => lines.extend(open_paragraphs.pop()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}
