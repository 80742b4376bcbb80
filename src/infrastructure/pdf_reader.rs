//! PDF text reader - infrastructure layer
//!
//! Owns the lopdf document and only exposes "text of the first N pages".

use crate::error::{AppResult, PdfError};
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// `TJ` offsets below this (thousandths of a text unit) are read as a word gap.
const TJ_WORD_GAP: f32 = -100.0;

/// Text layout of the first pages of one PDF
pub struct PdfReader {
    filename: String,
    document: Document,
}

impl PdfReader {
    /// Load a PDF from disk
    pub fn open(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| PdfError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_bytes(filename, &bytes)
    }

    /// Parse a PDF already held in memory
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> AppResult<Self> {
        let filename = filename.into();
        let document = Document::load_mem(bytes).map_err(|source| PdfError::ParseFailed {
            filename: filename.clone(),
            source,
        })?;
        Ok(Self { filename, document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text of up to `max_pages` pages.
    ///
    /// Every shown string (`Tj`, `TJ`, `'`, `"`) is one run. Runs inside a
    /// page are joined with single spaces and pages with `\n`, so a table
    /// row drawn as separate runs ends up on one logical line.
    pub fn first_pages_text(&self, max_pages: usize) -> AppResult<String> {
        let mut pages = Vec::new();
        for (page_number, page_id) in self.document.get_pages().into_iter().take(max_pages) {
            let runs = self
                .page_runs(page_id)
                .map_err(|source| PdfError::TextExtractionFailed {
                    filename: self.filename.clone(),
                    page: page_number,
                    source,
                })?;
            pages.push(join_text_runs(&runs));
        }
        debug!(
            "Read {} of {} pages from {}",
            pages.len(),
            self.page_count(),
            self.filename
        );
        Ok(pages.join("\n"))
    }

    /// Decoded text runs of one page, in content-stream order.
    fn page_runs(&self, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
        let encodings = self.page_encodings(page_id)?;
        let content = Content::decode(&self.document.get_page_content(page_id)?)?;

        let mut current: Option<&Encoding> = None;
        let mut runs = Vec::new();
        for operation in &content.operations {
            match operation.operator.as_str() {
                "Tf" => {
                    current = operation
                        .operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|font| encodings.get(font));
                }
                "Tj" | "'" | "\"" => {
                    // `"` carries word and char spacing before the string
                    if let Some(Object::String(bytes, _)) = operation.operands.last() {
                        runs.push(decode_run(current, bytes));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(parts)) = operation.operands.first() {
                        runs.push(decode_spaced_run(current, parts));
                    }
                }
                _ => {}
            }
        }
        Ok(runs)
    }

    fn page_encodings(&self, page_id: ObjectId) -> lopdf::Result<BTreeMap<Vec<u8>, Encoding<'_>>> {
        let fonts = self.document.get_page_fonts(page_id)?;
        let mut encodings = BTreeMap::new();
        for (name, font) in fonts {
            match font.get_font_encoding(&self.document) {
                Ok(encoding) => {
                    encodings.insert(name, encoding);
                }
                Err(err) => warn!(
                    "Unsupported encoding for font {} in {}: {}",
                    String::from_utf8_lossy(&name),
                    self.filename,
                    err
                ),
            }
        }
        Ok(encodings)
    }
}

fn decode_run(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    encoding
        .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

/// One `TJ` array: strings glued together, wide negative offsets become spaces.
fn decode_spaced_run(encoding: Option<&Encoding>, parts: &[Object]) -> String {
    let mut run = String::new();
    for part in parts {
        match part {
            Object::String(bytes, _) => run.push_str(&decode_run(encoding, bytes)),
            Object::Integer(offset) if (*offset as f32) < TJ_WORD_GAP => run.push(' '),
            Object::Real(offset) if *offset < TJ_WORD_GAP => run.push(' '),
            _ => {}
        }
    }
    run
}

fn join_text_runs<S: AsRef<str>>(runs: &[S]) -> String {
    runs.iter()
        .map(|run| run.as_ref().trim())
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
