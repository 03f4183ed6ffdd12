//! Conversion modes and batch jobs.
//!
//! A [`ConversionJob`] is an ordered list of input files plus one
//! [`ConversionMode`], validated non-empty at construction and immutable
//! afterwards. The runner captures the job before the run starts, so nothing
//! can mutate the file list mid-batch.

use crate::error::DocBatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which conversion the batch performs.
///
/// Each mode pairs one external collaborator with one output extension:
///
/// | Mode | Collaborator | Output |
/// |------|--------------|--------|
/// | `DocxToMarkdown` | pandoc subprocess (strict markdown, pipe tables, fenced code, no wrap) | `.md` |
/// | `MarkdownToDocx` | pandoc subprocess (`-t docx`) | `.docx` |
/// | `PdfToDocx` | in-process PDF engine | `.docx` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionMode {
    DocxToMarkdown,
    MarkdownToDocx,
    PdfToDocx,
}

impl ConversionMode {
    /// Extension (without dot) expected on input files for this mode.
    pub fn input_extension(&self) -> &'static str {
        match self {
            ConversionMode::DocxToMarkdown => "docx",
            ConversionMode::MarkdownToDocx => "md",
            ConversionMode::PdfToDocx => "pdf",
        }
    }

    /// Extension (without dot) of the files this mode produces.
    pub fn output_extension(&self) -> &'static str {
        match self {
            ConversionMode::DocxToMarkdown => "md",
            ConversionMode::MarkdownToDocx | ConversionMode::PdfToDocx => "docx",
        }
    }

    /// True when `path` has this mode's expected input extension
    /// (case-insensitive).
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(self.input_extension()))
            .unwrap_or(false)
    }

    /// Compute the output path for `input` under `output_dir`:
    /// the input stem with this mode's output extension.
    ///
    /// Re-running the same job yields the same path, so outputs are
    /// overwritten rather than duplicated.
    pub fn output_path(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| input.as_os_str().to_os_string());
        let mut name = stem;
        name.push(".");
        name.push(self.output_extension());
        output_dir.join(name)
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionMode::DocxToMarkdown => "docx-to-md",
            ConversionMode::MarkdownToDocx => "md-to-docx",
            ConversionMode::PdfToDocx => "pdf-to-docx",
        };
        f.write_str(s)
    }
}

/// An immutable batch: ordered input files plus one mode.
///
/// Construction rejects an empty file list before any external tool is
/// invoked; afterwards the job cannot be modified.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    mode: ConversionMode,
    files: Vec<PathBuf>,
}

impl ConversionJob {
    /// Create a job from an ordered list of input files.
    ///
    /// # Errors
    /// [`DocBatchError::EmptyBatch`] when `files` is empty.
    pub fn new(
        mode: ConversionMode,
        files: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Result<Self, DocBatchError> {
        let files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        if files.is_empty() {
            return Err(DocBatchError::EmptyBatch);
        }
        Ok(Self { mode, files })
    }

    /// Like [`ConversionJob::new`], but additionally checks that every input
    /// exists and carries the mode's expected extension.
    ///
    /// Front-end validation for surfaces that accept arbitrary paths (the
    /// CLI, drag-and-drop): a typo'd path fails here, before any external
    /// tool is invoked, instead of surfacing as a per-file tool diagnostic.
    pub fn validated(
        mode: ConversionMode,
        files: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Result<Self, DocBatchError> {
        let job = Self::new(mode, files)?;
        for file in &job.files {
            if !mode.accepts(file) {
                return Err(DocBatchError::WrongExtension {
                    path: file.clone(),
                    expected: mode.input_extension(),
                    mode: mode.to_string(),
                });
            }
            if !file.is_file() {
                return Err(DocBatchError::InputNotFound { path: file.clone() });
            }
        }
        Ok(job)
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Input files in the order they will be converted.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_job_is_rejected() {
        let err = ConversionJob::new(ConversionMode::DocxToMarkdown, Vec::<PathBuf>::new())
            .expect_err("empty batch must be rejected");
        assert!(matches!(err, DocBatchError::EmptyBatch));
    }

    #[test]
    fn job_preserves_input_order() {
        let job = ConversionJob::new(
            ConversionMode::MarkdownToDocx,
            ["b.md", "a.md", "c.md"],
        )
        .unwrap();
        let names: Vec<_> = job
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["b.md", "a.md", "c.md"]);
    }

    #[test]
    fn output_path_uses_stem_and_mode_extension() {
        let out = ConversionMode::DocxToMarkdown
            .output_path(Path::new("/in/report.docx"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/report.md"));

        let out = ConversionMode::PdfToDocx
            .output_path(Path::new("scan.pdf"), Path::new("output_docx"));
        assert_eq!(out, PathBuf::from("output_docx/scan.docx"));
    }

    #[test]
    fn output_path_is_stable_across_runs() {
        let m = ConversionMode::MarkdownToDocx;
        let a = m.output_path(Path::new("notes.md"), Path::new("out"));
        let b = m.output_path(Path::new("notes.md"), Path::new("out"));
        assert_eq!(a, b);
    }

    #[test]
    fn accepts_is_case_insensitive() {
        let m = ConversionMode::DocxToMarkdown;
        assert!(m.accepts(Path::new("Report.DOCX")));
        assert!(!m.accepts(Path::new("report.pdf")));
        assert!(!m.accepts(Path::new("no_extension")));
    }

    #[test]
    fn validated_rejects_wrong_extension_before_missing_file_check() {
        let err = ConversionJob::validated(ConversionMode::PdfToDocx, ["notes.md"])
            .expect_err("wrong extension must be rejected");
        assert!(matches!(err, DocBatchError::WrongExtension { .. }));
    }

    #[test]
    fn validated_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("ghost.pdf");
        let err = ConversionJob::validated(ConversionMode::PdfToDocx, [&ghost])
            .expect_err("missing file must be rejected");
        assert!(matches!(err, DocBatchError::InputNotFound { .. }));
    }

    #[test]
    fn validated_accepts_existing_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("notes.md");
        std::fs::write(&md, "# hi").unwrap();
        let job = ConversionJob::validated(ConversionMode::MarkdownToDocx, [&md]).unwrap();
        assert_eq!(job.len(), 1);
    }

    #[test]
    fn mode_display_matches_cli_names() {
        assert_eq!(ConversionMode::DocxToMarkdown.to_string(), "docx-to-md");
        assert_eq!(ConversionMode::MarkdownToDocx.to_string(), "md-to-docx");
        assert_eq!(ConversionMode::PdfToDocx.to_string(), "pdf-to-docx");
    }
}
