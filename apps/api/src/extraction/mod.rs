//! Document Text Extraction: turns an uploaded resume into plain text.
//!
//! PDF goes through `pdf-extract` page by page, DOCX through `docx-rs`.
//! Both parsers are synchronous and CPU-bound, so `extract_text` moves the work
//! onto the blocking pool.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

mod docx;
mod pdf;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Legacy binary Word format. Not readable by `docx-rs`, so it is refused.
pub const DOC_MEDIA_TYPE: &str = "application/msword";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The two document families a resume may be uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the kind from the declared media type, falling back to the file
    /// extension when the media type is absent or generic.
    /// Returns `None` for anything that is neither PDF nor DOCX, including
    /// legacy `.doc` files.
    pub fn resolve(media_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let media_type = media_type
            .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty() && m != "application/octet-stream");

        match media_type.as_deref() {
            Some(PDF_MEDIA_TYPE) => Some(DocumentKind::Pdf),
            Some(DOCX_MEDIA_TYPE) => Some(DocumentKind::Docx),
            Some(_) => None,
            None => Self::from_extension(file_name?),
        }
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// An uploaded resume held in memory for the lifetime of its session.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Bytes,
}

/// Extracts plain text from a resume. Malformed content is an error; there is
/// no partial-text fallback.
pub async fn extract_text(document: &ResumeDocument) -> Result<String, ExtractionError> {
    let kind = document.kind;
    let bytes = document.bytes.clone();

    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf::extract(&bytes),
        DocumentKind::Docx => docx::extract(&bytes),
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_pdf_media_type() {
        assert_eq!(
            DocumentKind::resolve(Some("application/pdf"), Some("cv.bin")),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_resolve_docx_media_type() {
        assert_eq!(
            DocumentKind::resolve(Some(DOCX_MEDIA_TYPE), None),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_resolve_rejects_legacy_doc() {
        assert_eq!(DocumentKind::resolve(Some(DOC_MEDIA_TYPE), Some("cv.docx")), None);
        assert_eq!(DocumentKind::resolve(Some("Application/MSWord"), None), None);
        assert_eq!(DocumentKind::resolve(None, Some("resume.doc")), None);
    }

    #[test]
    fn test_resolve_ignores_media_type_parameters() {
        assert_eq!(
            DocumentKind::resolve(Some("application/pdf; charset=binary"), None),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_resolve_falls_back_to_extension() {
        assert_eq!(
            DocumentKind::resolve(None, Some("Resume.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::resolve(Some("application/octet-stream"), Some("resume.docx")),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_resolve_rejects_other_types() {
        assert_eq!(DocumentKind::resolve(Some("image/png"), Some("cv.pdf")), None);
        assert_eq!(DocumentKind::resolve(None, Some("notes.txt")), None);
        assert_eq!(DocumentKind::resolve(None, Some("no_extension")), None);
        assert_eq!(DocumentKind::resolve(None, None), None);
    }

    #[tokio::test]
    async fn test_extract_text_dispatches_to_docx() {
        let document = crate::test_support::docx_resume("Rustacean since 2015");
        let text = extract_text(&document).await.unwrap();
        assert_eq!(text, "Rustacean since 2015");
    }

    #[tokio::test]
    async fn test_extract_text_dispatches_to_pdf() {
        let document = crate::test_support::pdf_resume(&["Alice Smith", "Compilers"]);
        let text = extract_text(&document).await.unwrap();
        assert_eq!(text, "Alice Smith Compilers");
    }

    #[tokio::test]
    async fn test_extract_text_malformed_pdf_fails() {
        let document = crate::test_support::broken_pdf_resume();
        assert!(extract_text(&document).await.is_err());
    }
}
