//! Comparison sessions: two candidates plus one explicit state value.
//!
//! Every analysis run takes a fresh `RunId`. Stage updates and outcomes are
//! only applied while that run is still the session's in-flight run, so a
//! superseded run can never overwrite newer state (last run wins by token,
//! not by arrival order).
//!
//! Sessions nobody has touched for the configured TTL are evicted, either on
//! the next access or by the periodic sweeper started at boot.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::compatibility::orchestrator::{AnalysisError, Orchestrator, Stage};
use crate::models::candidate::{Candidate, CandidateSlot};
use crate::models::compatibility::CompatibilityResult;

pub mod handlers;
pub mod view;

pub type RunId = u64;

/// User-facing notification for a failed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: &'static str,
    pub message: &'static str,
}

pub const MISSING_RESUMES: Notification = Notification {
    title: "Missing Resumes",
    message: "Please upload both resumes to find the perfect match!",
};

pub const ANALYSIS_FAILED: Notification = Notification {
    title: "Analysis Failed",
    message: "Could not analyze resumes. Please try again!",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Processing,
}

/// The single state value of a session. A displayed result only exists in
/// `Succeeded`, so a failed or newer run always replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Running {
        run: RunId,
        stage: Stage,
    },
    Succeeded {
        run: RunId,
        result: CompatibilityResult,
    },
    Failed {
        run: RunId,
        kind: FailureKind,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Run {0} was superseded by a newer run or edit")]
    Superseded(RunId),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    candidates: [Candidate; 2],
    state: SessionState,
    last_run: RunId,
    last_touched: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            candidates: Default::default(),
            state: SessionState::Idle,
            last_run: 0,
            last_touched: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) > ttl
    }

    pub fn candidate(&self, slot: CandidateSlot) -> &Candidate {
        &self.candidates[slot.index()]
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutates one candidate. Any in-flight run is superseded and any
    /// displayed outcome is dropped, returning the session to `Idle`.
    pub fn edit_candidate(&mut self, slot: CandidateSlot, edit: impl FnOnce(&mut Candidate)) {
        edit(&mut self.candidates[slot.index()]);
        if let SessionState::Running { run, .. } = self.state {
            warn!("Session {}: run {run} superseded by an edit to {slot}", self.id);
        }
        self.state = SessionState::Idle;
    }

    /// Starts a new run and returns its token plus a snapshot of the candidates.
    pub fn begin_run(&mut self) -> (RunId, [Candidate; 2]) {
        self.last_run += 1;
        let run = self.last_run;
        if let SessionState::Running { run: previous, .. } = self.state {
            warn!("Session {}: run {previous} superseded by run {run}", self.id);
        }
        self.state = SessionState::Running {
            run,
            stage: Stage::Validating,
        };
        (run, self.candidates.clone())
    }

    fn is_in_flight(&self, run: RunId) -> bool {
        matches!(self.state, SessionState::Running { run: current, .. } if current == run)
    }

    /// Records progress for `run`. Ignored when the run is no longer in flight.
    pub fn advance(&mut self, run: RunId, stage: Stage) -> bool {
        if !self.is_in_flight(run) {
            return false;
        }
        self.state = SessionState::Running { run, stage };
        true
    }

    /// Applies the outcome of `run` and keeps the links it enriched.
    /// Returns false, changing nothing, when the run was superseded.
    pub fn finish(
        &mut self,
        run: RunId,
        outcome: Result<&CompatibilityResult, &AnalysisError>,
        snapshot: [Candidate; 2],
    ) -> bool {
        if !self.is_in_flight(run) {
            return false;
        }

        for (current, used) in self.candidates.iter_mut().zip(snapshot) {
            if current.links.leetcode.url() == used.links.leetcode.url() {
                current.links.leetcode = used.links.leetcode;
            }
        }

        self.state = match outcome {
            Ok(result) => SessionState::Succeeded {
                run,
                result: result.clone(),
            },
            Err(e) if e.is_validation() => SessionState::Failed {
                run,
                kind: FailureKind::Validation,
            },
            Err(_) => SessionState::Failed {
                run,
                kind: FailureKind::Processing,
            },
        };
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a run that was still current when it finished.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub run: RunId,
    pub result: CompatibilityResult,
}

/// In-memory registry of live sessions. Nothing is persisted.
///
/// The lock is only held for short synchronous sections, never across the
/// extraction or network work of a run. Every successful lookup refreshes the
/// session's idle timer.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

/// Looks up a session that has not outlived `ttl` and marks it as touched.
/// An expired session is dropped on the spot.
fn touch_live(
    sessions: &mut HashMap<Uuid, Session>,
    id: Uuid,
    ttl: Duration,
) -> Result<&mut Session, SessionError> {
    let now = Instant::now();
    if sessions.get(&id).is_some_and(|s| s.is_expired(now, ttl)) {
        sessions.remove(&id);
        info!("Session {id} expired");
    }
    let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
    session.last_touched = now;
    Ok(session)
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id, session.clone());
        info!("Session {} created", session.id);
        session
    }

    pub fn get(&self, id: Uuid) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        touch_live(&mut sessions, id, self.ttl).map(|s| s.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| info!("Session {id} discarded"))
            .ok_or(SessionError::NotFound(id))
    }

    /// Runs `f` against the session under the write lock.
    pub fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = touch_live(&mut sessions, id, self.ttl)?;
        Ok(f(session))
    }

    /// Drops every session idle for longer than the TTL. Returns how many
    /// were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        before - sessions.len()
    }

    /// Runs `sweep_expired` every `every` on the runtime. `every` must be
    /// non-zero.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                match store.sweep_expired() {
                    0 => debug!("Session sweep: nothing expired"),
                    n => info!("Session sweep: evicted {n} idle session(s)"),
                }
            }
        })
    }

    /// Runs one analysis for the session and applies its outcome if the run is
    /// still current when it completes.
    pub async fn analyze(
        &self,
        id: Uuid,
        orchestrator: &Orchestrator,
    ) -> Result<CompletedRun, SessionError> {
        let (run, mut snapshot) = self.update(id, Session::begin_run)?;
        info!("Session {id}: run {run} started");

        let on_stage = |stage: Stage| {
            // A deleted session simply stops receiving progress.
            let _ = self.update(id, |s| s.advance(run, stage));
        };
        let outcome = orchestrator.run(&mut snapshot, &on_stage).await;

        let applied = self.update(id, |s| s.finish(run, outcome.as_ref(), snapshot))?;
        if !applied {
            warn!("Session {id}: discarding outcome of superseded run {run}");
            return Err(SessionError::Superseded(run));
        }

        match outcome {
            Ok(result) => {
                info!("Session {id}: run {run} succeeded");
                Ok(CompletedRun { run, result })
            }
            Err(e) => {
                warn!("Session {id}: run {run} failed: {e}");
                Err(SessionError::Analysis(e))
            }
        }
    }
}
