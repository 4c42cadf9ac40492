//! Compatibility Orchestrator: drives one analysis run.
//!
//! Flow: validate → enrich profiles (sequential, best effort) →
//!       extract both resumes (concurrently, all must succeed) →
//!       build prompt → one model call → parse + validate.
//!
//! The orchestrator owns no session state. Callers hand it the candidates of a
//! run and learn about progress through the `on_stage` callback.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::compatibility::parser::{parse_compatibility, ResponseParseError};
use crate::compatibility::prompts::build_prompt;
use crate::enrichment::{enrich_link, ProfileSource};
use crate::extraction::{extract_text, ExtractionError, ResumeDocument};
use crate::llm_client::{GenerativeModel, LlmError};
use crate::models::candidate::{Candidate, CandidateSlot};
use crate::models::compatibility::CompatibilityResult;

/// Non-terminal stages of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Enriching,
    Extracting,
    Requesting,
    Parsing,
}

impl Stage {
    /// Rough completion percentage for progress indicators.
    pub fn progress(self) -> u8 {
        match self {
            Stage::Validating => 5,
            Stage::Enriching => 15,
            Stage::Extracting => 35,
            Stage::Requesting => 60,
            Stage::Parsing => 90,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing resume for {}", format_slots(.0))]
    MissingResumes(Vec<CandidateSlot>),

    #[error("Text extraction failed for {slot}: {source}")]
    Extraction {
        slot: CandidateSlot,
        #[source]
        source: ExtractionError,
    },

    #[error("Model request failed: {0}")]
    Request(#[from] LlmError),

    #[error("Model response rejected: {0}")]
    Parse(#[from] ResponseParseError),
}

impl AnalysisError {
    /// Validation failures are reported to the user distinctly; every other
    /// variant collapses into one generic processing failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::MissingResumes(_))
    }
}

fn format_slots(slots: &[CandidateSlot]) -> String {
    slots
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct Orchestrator {
    model: Arc<dyn GenerativeModel>,
    profiles: Arc<dyn ProfileSource>,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn GenerativeModel>, profiles: Arc<dyn ProfileSource>) -> Self {
        Self { model, profiles }
    }

    /// Runs one analysis over `candidates` (person 1 first).
    ///
    /// Successful enrichment rewrites the candidates' LeetCode links in place,
    /// so callers can keep the enriched form once the run is over.
    pub async fn run(
        &self,
        candidates: &mut [Candidate; 2],
        on_stage: &(dyn Fn(Stage) + Send + Sync),
    ) -> Result<CompatibilityResult, AnalysisError> {
        on_stage(Stage::Validating);
        let [doc1, doc2] = validate(candidates)?;

        if candidates.iter().any(|c| !c.links.leetcode.is_empty()) {
            on_stage(Stage::Enriching);
            for candidate in candidates.iter_mut() {
                candidate.links.leetcode =
                    enrich_link(self.profiles.as_ref(), &candidate.links.leetcode).await;
            }
        }

        on_stage(Stage::Extracting);
        let (text1, text2) = tokio::try_join!(
            extract_for(CandidateSlot::Person1, &doc1),
            extract_for(CandidateSlot::Person2, &doc2),
        )?;
        info!(
            "Extracted resume text: person1={} chars, person2={} chars",
            text1.chars().count(),
            text2.chars().count()
        );

        on_stage(Stage::Requesting);
        let prompt = build_prompt(&text1, &candidates[0].links, &text2, &candidates[1].links);
        debug!("Prompt built ({} chars)", prompt.chars().count());
        let answer = self.model.generate(&prompt).await?;

        on_stage(Stage::Parsing);
        let result = parse_compatibility(&answer)?;
        info!(
            "Compatibility computed: match={} referral={}",
            result.match_score, result.referral_score
        );
        Ok(result)
    }
}

/// Both candidates need a resume. Returns cheap clones of the two documents so
/// the links can still be mutated during enrichment.
fn validate(candidates: &[Candidate; 2]) -> Result<[ResumeDocument; 2], AnalysisError> {
    match (&candidates[0].resume, &candidates[1].resume) {
        (Some(doc1), Some(doc2)) => Ok([doc1.clone(), doc2.clone()]),
        _ => Err(AnalysisError::MissingResumes(
            CandidateSlot::ALL
                .into_iter()
                .filter(|slot| candidates[slot.index()].resume.is_none())
                .collect(),
        )),
    }
}

async fn extract_for(
    slot: CandidateSlot,
    document: &ResumeDocument,
) -> Result<String, AnalysisError> {
    extract_text(document)
        .await
        .map_err(|source| AnalysisError::Extraction { slot, source })
}
