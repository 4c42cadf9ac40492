//! Axum route handlers for the Sessions API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{DocumentKind, ResumeDocument};
use crate::models::candidate::CandidateSlot;
use crate::models::compatibility::{CompatibilityResult, DISCLAIMER};
use crate::models::links::LinksUpdate;
use crate::session::view::SessionView;
use crate::session::RunId;
use crate::state::AppState;

/// Multipart field carrying the resume.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub run_id: RunId,
    pub result: CompatibilityResult,
    pub disclaimer: &'static str,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(SessionView::from(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/candidates/:slot/resume
///
/// Expects a multipart body with a `file` field holding a PDF or DOCX document.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, CandidateSlot)>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    // Fail fast on unknown sessions before reading the body.
    state.sessions.get(id)?;

    let mut document = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let kind = DocumentKind::resolve(field.content_type(), Some(&file_name)).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "'{file_name}' is not a PDF or DOCX document"
            ))
        })?;
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{file_name}' is empty")));
        }
        document = Some(ResumeDocument {
            file_name,
            kind,
            bytes,
        });
        break;
    }

    let document = document
        .ok_or_else(|| AppError::Validation(format!("Multipart field '{FILE_FIELD}' is required")))?;
    info!(
        "Session {id}: {slot} uploaded '{}' ({:?}, {} bytes)",
        document.file_name,
        document.kind,
        document.bytes.len()
    );

    let session = state.sessions.update(id, |s| {
        s.edit_candidate(slot, |c| c.resume = Some(document));
        s.clone()
    })?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/v1/sessions/:id/candidates/:slot/resume
pub async fn handle_remove_resume(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, CandidateSlot)>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.update(id, |s| {
        s.edit_candidate(slot, |c| c.resume = None);
        s.clone()
    })?;
    Ok(Json(SessionView::from(&session)))
}

/// PUT /api/v1/sessions/:id/candidates/:slot/links
pub async fn handle_update_links(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, CandidateSlot)>,
    Json(update): Json<LinksUpdate>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.update(id, |s| {
        s.edit_candidate(slot, |c| c.links.apply(update));
        s.clone()
    })?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Runs the full analysis: validate → enrich → extract → model call → parse.
/// Processing failures all map to one generic `ANALYSIS_FAILED` error.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let completed = state.sessions.analyze(id, &state.orchestrator).await?;
    Ok(Json(AnalyzeResponse {
        run_id: completed.run,
        result: completed.result,
        disclaimer: DISCLAIMER,
    }))
}
