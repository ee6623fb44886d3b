//! ExternalScorer — alternate backend that asks the hosted model for a score.
//!
//! Invocation state machine:
//! `Idle → Calling → { Success | RateLimited → (backoff) → Calling | Fatal }`.
//! Rate limiting is retried with exponential backoff up to `Backoff::max_attempts`;
//! every other failure ends the call immediately.
//!
//! The score is scraped from free text ("ATS Score: 72"). A reply without that
//! pattern scores `N/A`; this is an accepted approximation, not an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::llm_client::LlmError;
use crate::scoring::prompts::build_ats_prompt;
use crate::scoring::{require_inputs, AtsScore, AtsScorer, ScoreResult, ScoringError, ALIGNED_MESSAGE};

static ATS_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ATS Score: (\d+\.?\d*)").expect("valid ATS score regex"));

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one model invocation, inspected by the retry loop.
#[derive(Debug)]
pub enum ModelOutcome {
    Success(String),
    /// Transient: the caller may back off and try again.
    RateLimited,
    Fatal(LlmError),
}

/// Capability to call the external model once. Injected into `ExternalScorer`.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> ModelOutcome;
}

/// Retry budget for one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Backoff {
    /// Wait after the `attempt`-th rate limit (1-based): base × 2^attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

pub struct ExternalScorer {
    invoker: Arc<dyn ModelInvoker>,
    backoff: Backoff,
}

impl ExternalScorer {
    pub fn new(invoker: Arc<dyn ModelInvoker>, backoff: Backoff) -> Self {
        Self { invoker, backoff }
    }
}

#[async_trait]
impl AtsScorer for ExternalScorer {
    /// Dropping the returned future cancels any pending backoff sleep; no
    /// further attempts are made after that.
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<ScoreResult, ScoringError> {
        require_inputs(job_text, resume_text)?;

        let prompt = build_ats_prompt(job_text, resume_text);
        let mut attempt = 0_u32;

        while attempt < self.backoff.max_attempts {
            match self.invoker.invoke(&prompt).await {
                ModelOutcome::Success(reply) => {
                    info!("Model scoring succeeded after {} rate-limited attempt(s)", attempt);
                    return Ok(parse_reply(&reply));
                }
                ModelOutcome::Fatal(e) => return Err(ScoringError::Model(e)),
                ModelOutcome::RateLimited => {
                    attempt += 1;
                    let delay = self.backoff.delay_for(attempt);
                    warn!(
                        "Rate limit hit (attempt {}/{}). Retrying in {}ms...",
                        attempt,
                        self.backoff.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(ScoringError::RetryExhausted {
            attempts: self.backoff.max_attempts,
        })
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Suggestions are the whole trimmed reply; the score is whatever follows "ATS Score:".
fn parse_reply(reply: &str) -> ScoreResult {
    let reply = reply.trim();

    let score = ATS_SCORE_RE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(AtsScore::from_raw)
        .unwrap_or(AtsScore::NotApplicable);

    let suggestions = if reply.is_empty() {
        ALIGNED_MESSAGE.to_string()
    } else {
        reply.to_string()
    };

    ScoreResult {
        score,
        suggestions,
        missing_keywords: vec![],
        backend: "llm",
    }
}
