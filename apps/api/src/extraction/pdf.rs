use std::panic::{self, AssertUnwindSafe};

use super::ExtractionError;

/// Extracts the text layer of every page, in page order.
///
/// `pdf-extract` panics on some malformed font and encoding tables, so the call
/// is isolated and a panic is reported like any other parse failure.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(malformed(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "PDF parser aborted".to_string());
            Err(malformed(reason))
        }
    }
}

fn malformed(reason: String) -> ExtractionError {
    ExtractionError::Malformed {
        format: "PDF",
        reason,
    }
}
