//! Read-only presentation of a session: what a UI renders for the two forms,
//! the progress indicator and the result cards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::compatibility::orchestrator::Stage;
use crate::extraction::DocumentKind;
use crate::models::candidate::{Candidate, CandidateSlot};
use crate::models::compatibility::{CompatibilityResult, DISCLAIMER};
use crate::models::links::ProfileLinks;
use crate::session::{
    FailureKind, Notification, RunId, Session, SessionState, ANALYSIS_FAILED, MISSING_RESUMES,
};

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub candidates: Vec<CandidateView>,
    /// Both resumes are present, so an analysis may be started.
    pub ready: bool,
    pub status: StatusView,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub slot: CandidateSlot,
    pub resume: Option<ResumeView>,
    pub links: ProfileLinks,
}

#[derive(Debug, Serialize)]
pub struct ResumeView {
    pub file_name: String,
    pub kind: DocumentKind,
    pub size_bytes: usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusView {
    Idle,
    Running {
        run_id: RunId,
        stage: Stage,
        progress: u8,
    },
    Succeeded {
        run_id: RunId,
        result: CompatibilityResult,
    },
    Failed {
        run_id: RunId,
        kind: FailureKind,
        notification: Notification,
    },
}

impl From<&SessionState> for StatusView {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Idle => StatusView::Idle,
            SessionState::Running { run, stage } => StatusView::Running {
                run_id: *run,
                stage: *stage,
                progress: stage.progress(),
            },
            SessionState::Succeeded { run, result } => StatusView::Succeeded {
                run_id: *run,
                result: result.clone(),
            },
            SessionState::Failed { run, kind } => StatusView::Failed {
                run_id: *run,
                kind: *kind,
                notification: match kind {
                    FailureKind::Validation => MISSING_RESUMES,
                    FailureKind::Processing => ANALYSIS_FAILED,
                },
            },
        }
    }
}

impl CandidateView {
    fn new(slot: CandidateSlot, candidate: &Candidate) -> Self {
        Self {
            slot,
            resume: candidate.resume.as_ref().map(|doc| ResumeView {
                file_name: doc.file_name.clone(),
                kind: doc.kind,
                size_bytes: doc.bytes.len(),
            }),
            links: candidate.links.clone(),
        }
    }
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let candidates: Vec<CandidateView> = CandidateSlot::ALL
            .into_iter()
            .map(|slot| CandidateView::new(slot, session.candidate(slot)))
            .collect();

        SessionView {
            id: session.id,
            created_at: session.created_at,
            ready: candidates.iter().all(|c| c.resume.is_some()),
            candidates,
            status: StatusView::from(session.state()),
            disclaimer: DISCLAIMER,
        }
    }
}
