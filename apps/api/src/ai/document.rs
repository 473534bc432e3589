//! Turns an uploaded resume into plain text before it is sent to the model.

use crate::ai::AiError;

const PDF: &str = "application/pdf";

/// Extracts text from a PDF or plain-text upload.
pub fn extract_text(document: &[u8], mime_type: &str) -> Result<String, AiError> {
    let mime = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let text = if mime == PDF {
        pdf_extract::extract_text_from_mem(document)
            .map_err(|e| AiError::Document(format!("{e:?}")))?
    } else if mime.starts_with("text/") {
        String::from_utf8(document.to_vec()).map_err(|e| AiError::Document(e.to_string()))?
    } else {
        return Err(AiError::UnsupportedDocument(mime_type.to_string()));
    };

    if text.trim().is_empty() {
        return Err(AiError::Document("document contains no text".to_string()));
    }
    Ok(text)
}

/// Runs [`extract_text`] on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_text_blocking(document: Vec<u8>, mime_type: String) -> Result<String, AiError> {
    tokio::task::spawn_blocking(move || extract_text(&document, &mime_type))
        .await
        .map_err(|e| AiError::Task(format!("document extraction failed: {e}")))?
}
