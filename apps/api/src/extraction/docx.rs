//! DOCX body extraction.
//!
//! A DOCX file is a ZIP package; the visible body lives in `word/document.xml`:
//! ```xml
//! <w:body>
//!   <w:p><w:r><w:t>Senior</w:t></w:r><w:r><w:t xml:space="preserve"> Engineer</w:t></w:r></w:p>
//!   <w:tbl>...</w:tbl>
//! </w:body>
//! ```
//! Only `w:t` run text is kept. Paragraphs end with a newline; tabs and breaks
//! map to their whitespace equivalents. Styles, numbering and media are ignored.
//! Text boxes appear twice under `mc:AlternateContent`; only the `mc:Choice` copy is read.

use std::io::{BufReader, Cursor};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const BODY_PART: &str = "word/document.xml";

pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| malformed(format!("Failed to open DOCX package: {e}")))?;

    let body = archive.by_name(BODY_PART).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => malformed(format!("Package has no {BODY_PART}")),
        other => malformed(format!("Failed to read {BODY_PART}: {other}")),
    })?;

    let mut reader = Reader::from_reader(BufReader::new(body));
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_run = false;
    // Depth inside `mc:Fallback`, the legacy duplicate of an `mc:Choice` (text boxes, shapes).
    let mut fallback_depth = 0_u32;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth += 1,
                b"t" if fallback_depth == 0 => in_text_run = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if fallback_depth == 0 => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                // Empty paragraph
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let run = e
                    .unescape()
                    .map_err(|err| malformed(format!("Invalid text run: {err}")))?;
                text.push_str(&run);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                b"t" => in_text_run = false,
                b"p" if fallback_depth == 0 => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed(format!(
                    "XML error at position {}: {e}",
                    reader.error_position()
                )))
            }
        }
        buf.clear();
    }

    Ok(text)
}

fn malformed(reason: String) -> ExtractionError {
    ExtractionError::Malformed {
        format: "DOCX",
        reason,
    }
}
