//! FrequencyScorer — default backend. Pure-Rust keyword overlap, no model call.
//!
//! Algorithm:
//! 1. Tokenize job and resume independently.
//! 2. For each distinct job token `w`: matched += min(job[w], resume[w]) if the
//!    resume has it, else `w` is missing.
//! 3. score = matched / total job tokens × 100, rounded to 2 decimals.
//!
//! Stop-words are not filtered: "with" and "and" count like any other token.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::scoring::tokenizer::{tokenize, Tokenized};
use crate::scoring::{require_inputs, AtsScore, AtsScorer, ScoreResult, ScoringError, ALIGNED_MESSAGE};

pub struct FrequencyScorer;

#[async_trait]
impl AtsScorer for FrequencyScorer {
    async fn score(&self, job_text: &str, resume_text: &str) -> Result<ScoreResult, ScoringError> {
        score_texts(job_text, resume_text)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Synchronous entry point; the trait impl only wraps this.
pub fn score_texts(job_text: &str, resume_text: &str) -> Result<ScoreResult, ScoringError> {
    require_inputs(job_text, resume_text)?;

    let job = tokenize(job_text);
    let resume = tokenize(resume_text);

    // Whitespace-only text was rejected above, but punctuation-only text still tokenizes to nothing.
    if job.total() == 0 {
        return Err(ScoringError::MissingInput("job description"));
    }

    let Overlap { matched, missing } = compute_overlap(&job, &resume);
    let raw = matched as f64 / job.total() as f64 * 100.0;

    Ok(ScoreResult {
        score: AtsScore::from_raw(raw),
        suggestions: build_suggestions(&missing),
        missing_keywords: missing,
        backend: "keyword",
    })
}

struct Overlap {
    matched: u32,
    /// Distinct job tokens absent from the resume, in first-seen order.
    missing: Vec<String>,
}

fn compute_overlap(job: &Tokenized, resume: &Tokenized) -> Overlap {
    let mut matched = 0_u32;
    let mut missing = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(job.frequencies.len());

    // Walk the token sequence rather than the map so `missing` is deterministic.
    for token in &job.tokens {
        if !seen.insert(token.as_str()) {
            continue;
        }
        let job_count = job.frequencies[token];
        match resume.frequencies.get(token) {
            Some(&resume_count) => matched += job_count.min(resume_count),
            None => missing.push(token.clone()),
        }
    }

    Overlap { matched, missing }
}

fn build_suggestions(missing: &[String]) -> String {
    if missing.is_empty() {
        ALIGNED_MESSAGE.to_string()
    } else {
        format!(
            "Consider adding these keywords from the job description to your resume: {}.",
            missing.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn score_value(result: &ScoreResult) -> f64 {
        match result.score {
            AtsScore::Value(v) => v,
            AtsScore::NotApplicable => panic!("keyword scorer always yields a value"),
        }
    }

    #[test]
    fn test_example_job_and_resume() {
        let result = score_texts(
            "Python developer with AWS experience",
            "Experienced Python developer",
        )
        .unwrap();

        assert_eq!(score_value(&result), 33.33);
        assert_eq!(result.missing_keywords, vec!["with", "aws", "experience"]);
        assert!(result.suggestions.contains("with, aws, experience"));
        assert_eq!(result.backend, "keyword");
    }

    #[test]
    fn test_identical_texts_score_100() {
        let text = "Senior Rust engineer. Rust, Kubernetes, and distributed systems.";
        let result = score_texts(text, text).unwrap();
        assert_eq!(score_value(&result), 100.0);
        assert!(result.missing_keywords.is_empty());
        assert_eq!(result.suggestions, ALIGNED_MESSAGE);
    }

    #[test]
    fn test_disjoint_vocabularies_score_0() {
        let result = score_texts("Rust Kafka Kubernetes", "Java Spring SQL").unwrap();
        assert_eq!(score_value(&result), 0.0);
        assert_eq!(result.missing_keywords, vec!["rust", "kafka", "kubernetes"]);
        for kw in ["rust", "kafka", "kubernetes"] {
            assert!(result.suggestions.contains(kw));
        }
    }

    #[test]
    fn test_duplicated_resume_tokens_do_not_overcount() {
        // job: rust×2 + go×1 = 3 tokens; resume has rust×5 but no go
        let result = score_texts("rust rust go", "rust rust rust rust rust").unwrap();
        assert_eq!(score_value(&result), 66.67);
        assert_eq!(result.missing_keywords, vec!["go"]);
    }

    #[test]
    fn test_partial_frequency_contributes_min() {
        // job: aws×3, resume: aws×1 → matched 1 of 3
        let result = score_texts("aws aws aws", "AWS").unwrap();
        assert_eq!(score_value(&result), 33.33);
        // Present in the resume, so not listed as missing.
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let result = score_texts("Python", "python").unwrap();
        assert_eq!(score_value(&result), 100.0);
    }

    #[test]
    fn test_missing_keywords_are_deduplicated_in_first_seen_order() {
        let result = score_texts("kafka rust kafka spark rust", "nothing relevant").unwrap();
        assert_eq!(result.missing_keywords, vec!["kafka", "rust", "spark"]);
    }

    #[test]
    fn test_score_bounded_0_to_100() {
        let cases = [
            ("a b c", "a a a a b b b c c c d e f"),
            ("x", "y"),
            ("one two two three three three", "three two one"),
        ];
        for (job, resume) in cases {
            let v = score_value(&score_texts(job, resume).unwrap());
            assert!((0.0..=100.0).contains(&v), "score {v} out of range");
        }
    }

    #[test]
    fn test_empty_job_is_missing_input() {
        assert!(matches!(
            score_texts("", "Rust developer"),
            Err(ScoringError::MissingInput("job description"))
        ));
        assert!(matches!(
            score_texts("!!! ---", "Rust developer"),
            Err(ScoringError::MissingInput("job description"))
        ));
    }

    #[test]
    fn test_empty_resume_is_missing_input() {
        assert!(matches!(
            score_texts("Rust developer", "   "),
            Err(ScoringError::MissingInput("resume"))
        ));
    }

    #[tokio::test]
    async fn test_trait_impl_delegates() {
        let scorer = FrequencyScorer;
        let result = scorer.score("rust", "rust").await.unwrap();
        assert_eq!(result.score, AtsScore::Value(100.0));
        assert_eq!(scorer.backend(), "keyword");
    }
}
