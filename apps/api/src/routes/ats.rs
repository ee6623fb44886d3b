//! Axum handler for the ATS scoring API (the orchestrator).
//!
//! Each side (job description, resume) arrives either as an uploaded document
//! or as plain text. Documents are extracted in memory, then the configured
//! scorer runs on the two texts.

use anyhow::anyhow;
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{self, Document, DocumentFormat};
use crate::scoring::{ScoreResult, ScoringError};
use crate::state::AppState;

const JOB_FILE_FIELD: &str = "jobDescription";
const JOB_TEXT_FIELD: &str = "jobDescriptionText";
const RESUME_FILE_FIELD: &str = "resume";
const RESUME_TEXT_FIELD: &str = "resumeText";

/// One side of the comparison as submitted: text, a document, or nothing.
#[derive(Debug, Default)]
struct SubmittedInput {
    text: Option<String>,
    document: Option<Document>,
}

impl SubmittedInput {
    fn is_absent(&self) -> bool {
        self.document.is_none() && self.text.is_none()
    }

    /// Resolves to plain text, extracting the document off the async runtime.
    async fn resolve(self, file_field: &str, text_field: &str) -> Result<String, AppError> {
        match (self.document, self.text) {
            (Some(_), Some(_)) => Err(AppError::Validation(format!(
                "Provide either '{file_field}' or '{text_field}', not both."
            ))),
            (Some(document), None) => {
                let text = tokio::task::spawn_blocking(move || extraction::extract(&document))
                    .await
                    .map_err(|e| anyhow!("extraction task for '{file_field}' failed: {e}"))??;
                Ok(text)
            }
            (None, Some(text)) => Ok(text),
            (None, None) => Ok(String::new()),
        }
    }
}

/// POST /ats-score
///
/// Multipart fields: `jobDescription` | `jobDescriptionText`, `resume` | `resumeText`.
/// Returns `{"atsScore": "<score>%", "suggestions": "...", "missingKeywords": [...]}`.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScoreResult>, AppError> {
    let mut job = SubmittedInput::default();
    let mut resume = SubmittedInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_FILE_FIELD => job.document = read_document(field).await?,
            RESUME_FILE_FIELD => resume.document = read_document(field).await?,
            JOB_TEXT_FIELD => job.text = read_text(field).await?,
            RESUME_TEXT_FIELD => resume.text = read_text(field).await?,
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    if job.is_absent() {
        return Err(ScoringError::MissingInput("job description").into());
    }
    if resume.is_absent() {
        return Err(ScoringError::MissingInput("resume").into());
    }

    let job_text = job.resolve(JOB_FILE_FIELD, JOB_TEXT_FIELD).await?;
    let resume_text = resume.resolve(RESUME_FILE_FIELD, RESUME_TEXT_FIELD).await?;

    let result = state.scorer.score(&job_text, &resume_text).await?;

    info!(
        "ATS score computed: backend={} score={} missing_keywords={}",
        result.backend,
        result.score,
        result.missing_keywords.len()
    );

    Ok(Json(result))
}

/// Browsers send an empty part with `filename=""` when no file is chosen; that counts as absent.
async fn read_document(field: Field<'_>) -> Result<Option<Document>, AppError> {
    let file_name = field.file_name().map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

    if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
        return Ok(None);
    }

    let format = DocumentFormat::detect(file_name.as_deref(), content_type.as_deref());
    debug!(
        "Received upload {:?} ({} bytes) detected as {}",
        file_name,
        bytes.len(),
        format.label()
    );

    Ok(Some(Document::new(format, bytes)))
}

/// A blank textarea is submitted alongside a file input; that counts as absent too.
async fn read_text(field: Field<'_>) -> Result<Option<String>, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read text field: {e}")))?;

    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}
