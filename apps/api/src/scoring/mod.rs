//! ATS Scoring — pluggable, trait-based scorer that measures a resume against a job description.
//!
//! Default: `FrequencyScorer` (pure-Rust keyword overlap, deterministic, fully testable).
//! Alternate: `ExternalScorer` (delegates to the hosted model, with rate-limit backoff).
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`, chosen at startup via `SCORER_BACKEND`.

use std::fmt;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod external;
pub mod frequency;
pub mod prompts;
pub mod tokenizer;

pub use external::{Backoff, ExternalScorer};
pub use frequency::FrequencyScorer;

/// Returned as suggestions when there is nothing to improve.
pub const ALIGNED_MESSAGE: &str = "Your resume aligns well with the job description requirements!";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Both job description and resume text are required ({0} is empty).")]
    MissingInput(&'static str),

    #[error("Exceeded maximum retry attempts ({attempts}) while the model was rate limited")]
    RetryExhausted { attempts: u32 },

    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models (shared across all scorer backends)
// ────────────────────────────────────────────────────────────────────────────

/// A match score in [0, 100], or `NotApplicable` when the model reply carried none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtsScore {
    Value(f64),
    NotApplicable,
}

impl AtsScore {
    /// Clamps to [0, 100] and rounds to two decimals.
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_nan() {
            return AtsScore::NotApplicable;
        }
        let clamped = raw.clamp(0.0, 100.0);
        AtsScore::Value((clamped * 100.0).round() / 100.0)
    }
}

impl fmt::Display for AtsScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtsScore::Value(v) => write!(f, "{v}"),
            AtsScore::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for AtsScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self}%"))
    }
}

/// Result of a single scoring call. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    #[serde(rename = "atsScore")]
    pub score: AtsScore,
    pub suggestions: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_keywords: Vec<String>,
    #[serde(skip)]
    pub backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The scorer trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
#[async_trait]
pub trait AtsScorer: Send + Sync {
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<ScoreResult, ScoringError>;

    /// Short label for logs and the health endpoint: "keyword" | "llm".
    fn backend(&self) -> &'static str;
}

/// Both inputs must carry text before any scorer does work.
pub(crate) fn require_inputs(job_text: &str, resume_text: &str) -> Result<(), ScoringError> {
    if job_text.trim().is_empty() {
        return Err(ScoringError::MissingInput("job description"));
    }
    if resume_text.trim().is_empty() {
        return Err(ScoringError::MissingInput("resume"));
    }
    Ok(())
}
