use crate::error::{AnalyzerError, ValidationError};
use crate::models::*;
use async_trait::async_trait;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Recovers plain text from PDF bytes.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, AnalyzerError>;
}

/// Checks size first, then content-type; nothing downstream runs on a rejected upload.
pub fn validate_upload(upload: &Upload, max_upload_mb: usize) -> Result<(), ValidationError> {
    if upload.size() > max_upload_mb * 1024 * 1024 {
        return Err(ValidationError::TooLarge {
            limit_mb: max_upload_mb,
        });
    }

    match upload.content_type.as_deref() {
        Some(content_type) if is_pdf_content_type(content_type) => Ok(()),
        Some(content_type) => Err(ValidationError::UnsupportedType(content_type.to_string())),
        None => Err(ValidationError::UnsupportedType("none".to_string())),
    }
}

pub fn is_pdf_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/pdf" || essence == "application/x-pdf"
}

/// `pdf-extract` backed extractor. Parsing happens on the blocking pool.
pub struct DocumentProcessor;

impl DocumentProcessor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, AnalyzerError> {
        // pdf-extract panics on some malformed input instead of returning an error
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(AnalyzerError::ExtractionFailure(e.to_string())),
            Err(_) => Err(AnalyzerError::ExtractionFailure(
                "the PDF structure is malformed".to_string(),
            )),
        }
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for DocumentProcessor {
    async fn extract(&self, filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, AnalyzerError> {
        log::info!("Processing PDF: {} ({} bytes)", filename, bytes.len());

        let owned = bytes.to_vec();
        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&owned))
            .await
            .map_err(|e| AnalyzerError::ExtractionFailure(format!("extraction task failed: {e}")))??;

        log::info!("PDF has {} pages", pages.len());
        let content = join_pages(&pages)?;
        log::info!("Total extracted text: {} characters", content.chars().count());

        Ok(ExtractedDocument {
            filename: filename.to_string(),
            content,
            page_count: pages.len(),
        })
    }
}

/// Joins page texts in order with a single newline, skipping blank pages.
pub fn join_pages(pages: &[String]) -> Result<String, AnalyzerError> {
    let mut text = String::new();

    for (page_num, page) in pages.iter().enumerate() {
        let page_text = page.trim();
        if page_text.is_empty() {
            log::warn!("Page {}: no text found", page_num + 1);
            continue;
        }
        log::debug!("Page {}: extracted {} characters", page_num + 1, page_text.chars().count());
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(page_text);
    }

    if text.is_empty() || is_cid_only(&text) {
        return Err(AnalyzerError::ExtractionEmpty);
    }

    Ok(text)
}

/// True when the text is nothing but unresolved `(cid:N)` glyph references.
fn is_cid_only(text: &str) -> bool {
    static CID: OnceLock<Regex> = OnceLock::new();
    let re = CID.get_or_init(|| Regex::new(r"\(cid:\d+\)").expect("valid CID regex"));

    if !re.is_match(text) {
        return false;
    }
    re.replace_all(text, "").trim().is_empty()
}
