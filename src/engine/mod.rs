//! External conversion collaborators behind trait seams.
//!
//! The runner never talks to pandoc or the PDF library directly; it goes
//! through [`DocumentEngine`] (subprocess contract: exit 0 or diagnostic
//! stderr) and [`PdfEngine`] (in-process contract: writes the output file or
//! returns descriptive text). Both are injectable via
//! [`crate::config::RunnerConfigBuilder`], which is how the tests substitute
//! scripted collaborators without a pandoc installation.

pub mod pandoc;
pub mod pdf;

pub use pandoc::PandocEngine;
pub use pdf::TextPdfEngine;

use crate::error::FileError;
use async_trait::async_trait;
use std::path::Path;

/// Target format the document engine is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Strict Markdown with pipe tables and fenced code blocks, no line wrap.
    StrictMarkdown,
    /// Office Open XML (DOCX).
    Docx,
}

/// The external document-conversion engine (pandoc in production).
///
/// Contract: given an input path, an output path, and a target format, either
/// the output file is written and `Ok(())` returned, or the engine's
/// diagnostic text comes back as a [`FileError`]. One call per file; the
/// engine holds no batch state.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: TargetFormat,
    ) -> Result<(), FileError>;
}

/// The in-process PDF-to-DOCX conversion library.
///
/// A distinct contract from [`DocumentEngine`]: a blocking library call, not
/// a subprocess, with no format flags. The runner moves calls onto the
/// blocking thread pool and captures errors (and panics) per file.
pub trait PdfEngine: Send + Sync {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError>;
}
