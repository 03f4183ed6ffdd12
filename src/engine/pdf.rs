//! In-process PDF-to-DOCX engine.
//!
//! Text-only conversion: `pdf-extract` pulls the text layer out of the PDF
//! and `docx-rust` writes it back as one paragraph per line. Layout
//! reconstruction (columns, tables, images) is out of scope — scanned or
//! image-only PDFs produce an empty document and are reported as failures so
//! the caller is not handed a silently blank file.

use crate::engine::PdfEngine;
use crate::error::FileError;
use docx_rust::document::Paragraph;
use docx_rust::Docx;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Production [`PdfEngine`]: text extraction plus paragraph-per-line DOCX.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPdfEngine;

impl PdfEngine for TextPdfEngine {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError> {
        debug!(input = %input.display(), output = %output.display(), "extracting PDF text");

        // pdf-extract panics on some malformed files; the contract here is
        // that any library failure becomes this file's error.
        let text = match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(input))) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Err(FileError::Library {
                    detail: e.to_string(),
                })
            }
            Err(panic) => {
                return Err(FileError::Library {
                    detail: panic_message(&panic),
                })
            }
        };

        if text.trim().is_empty() {
            return Err(FileError::Library {
                detail: "no extractable text (scanned or image-only PDF?)".into(),
            });
        }

        let mut docx = Docx::default();
        for line in text.lines() {
            docx.document.push(Paragraph::default().push_text(line));
        }

        docx.write_file(output)
            .map(|_| ())
            .map_err(|e| FileError::Library {
                detail: format!("failed to write '{}': {e:?}", output.display()),
            })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF library panicked".to_string()
    }
}
