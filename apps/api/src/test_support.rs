//! Shared fixtures for unit tests: in-memory resumes and scripted fakes for
//! the outbound services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use docx_rs::{Docx, Paragraph, Run};
use serde_json::Value;

use crate::enrichment::{EnrichmentError, ProfileSource};
use crate::extraction::{DocumentKind, ResumeDocument};
use crate::llm_client::{GenerativeModel, LlmError};

pub const VALID_RESPONSE: &str = r#"Sure! Here is the analysis: {"matchScore":82,"referralScore":64,"loveCompatibility":"Your roadmaps are aligned 💞","professionalSynergy":"Pair programming would ship fast.","competitiveAnalysis":"They out-solved you on hards.","recommendation":"Book a sync, bring coffee ☕"}"#;

/// Builds DOCX bytes with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

/// Builds a minimal PDF with one Helvetica text line per page. Page text must
/// not contain parentheses or backslashes.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        tail.push_str(&format!("{offset:010} 00000 n \n"));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.extend_from_slice(tail.as_bytes());
    out
}

pub fn pdf_resume(pages: &[&str]) -> ResumeDocument {
    ResumeDocument {
        file_name: "resume.pdf".to_string(),
        kind: DocumentKind::Pdf,
        bytes: Bytes::from(pdf_bytes(pages)),
    }
}

pub fn docx_resume(text: &str) -> ResumeDocument {
    ResumeDocument {
        file_name: "resume.docx".to_string(),
        kind: DocumentKind::Docx,
        bytes: Bytes::from(docx_bytes(&[text])),
    }
}

pub fn broken_pdf_resume() -> ResumeDocument {
    ResumeDocument {
        file_name: "resume.pdf".to_string(),
        kind: DocumentKind::Pdf,
        bytes: Bytes::from_static(b"not a pdf at all"),
    }
}

/// Generative model that replays scripted answers in order and records prompts.
/// The last answer repeats once the script runs out.
pub struct ScriptedModel {
    answers: Mutex<Vec<Result<String, u16>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(answers: Vec<Result<&str, u16>>) -> Self {
        Self {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .rev()
                    .map(|a| a.map(String::from))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text)])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut answers = self.answers.lock().unwrap();
        let answer = if answers.len() > 1 {
            answers.pop()
        } else {
            answers.last().cloned()
        };
        match answer {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}

/// Profile source returning a fixed summary, or failing when `summary` is None.
pub struct FakeProfiles {
    summary: Option<Value>,
    calls: AtomicUsize,
}

impl FakeProfiles {
    pub fn returning(summary: Value) -> Self {
        Self {
            summary: Some(summary),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            summary: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for FakeProfiles {
    async fn fetch_summary(&self, _username: &str) -> Result<Value, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.summary.clone().ok_or(EnrichmentError::Status(503))
    }
}
