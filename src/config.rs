//! Configuration for a batch run.
//!
//! All runner behaviour is controlled through [`RunnerConfig`], built via its
//! [`RunnerConfigBuilder`]. Output directories are explicit config, not
//! process-wide constants, so two runners with different layouts can coexist
//! in one process and tests can point a run at a temp directory.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; adding a field later does not break existing call sites.

use crate::engine::{DocumentEngine, PdfEngine};
use crate::error::DocBatchError;
use crate::job::ConversionMode;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration for a batch conversion run.
///
/// Built via [`RunnerConfig::builder()`] or [`RunnerConfig::default()`].
///
/// # Example
/// ```rust
/// use docbatch::RunnerConfig;
///
/// let config = RunnerConfig::builder()
///     .markdown_dir("exports/md")
///     .docx_dir("exports/docx")
///     .file_timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunnerConfig {
    /// Where `.md` outputs land. Created if absent before a run. Default: `output`.
    pub markdown_dir: PathBuf,

    /// Where `.docx` outputs land. Created if absent before a run. Default: `output_docx`.
    pub docx_dir: PathBuf,

    /// Pandoc binary: an absolute path or a name resolved from `PATH`.
    /// Default: `pandoc`.
    pub pandoc_program: PathBuf,

    /// Optional per-file timeout in seconds. Default: `None`.
    ///
    /// The external tool gets no timeout by default, matching the upstream
    /// contract that a hung tool hangs the batch. Setting this bounds each
    /// file: on expiry that file is recorded as timed out and the batch moves
    /// on. The subprocess is killed on drop, so no orphan keeps running.
    pub file_timeout_secs: Option<u64>,

    /// Pre-constructed document engine. Takes precedence over
    /// `pandoc_program`. Test seam: inject a scripted engine here.
    pub document_engine: Option<Arc<dyn DocumentEngine>>,

    /// Pre-constructed PDF engine. Default: the built-in text extractor.
    pub pdf_engine: Option<Arc<dyn PdfEngine>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("output"),
            docx_dir: PathBuf::from("output_docx"),
            pandoc_program: PathBuf::from("pandoc"),
            file_timeout_secs: None,
            document_engine: None,
            pdf_engine: None,
        }
    }
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("markdown_dir", &self.markdown_dir)
            .field("docx_dir", &self.docx_dir)
            .field("pandoc_program", &self.pandoc_program)
            .field("file_timeout_secs", &self.file_timeout_secs)
            .field(
                "document_engine",
                &self.document_engine.as_ref().map(|_| "<dyn DocumentEngine>"),
            )
            .field("pdf_engine", &self.pdf_engine.as_ref().map(|_| "<dyn PdfEngine>"))
            .finish()
    }
}

impl RunnerConfig {
    /// Create a new builder for `RunnerConfig`.
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The output directory a mode writes into.
    pub fn output_dir_for(&self, mode: ConversionMode) -> &Path {
        match mode {
            ConversionMode::DocxToMarkdown => &self.markdown_dir,
            ConversionMode::MarkdownToDocx | ConversionMode::PdfToDocx => &self.docx_dir,
        }
    }
}

/// Builder for [`RunnerConfig`].
#[derive(Debug)]
pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    pub fn markdown_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.markdown_dir = dir.into();
        self
    }

    pub fn docx_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.docx_dir = dir.into();
        self
    }

    pub fn pandoc_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.pandoc_program = program.into();
        self
    }

    pub fn file_timeout_secs(mut self, secs: u64) -> Self {
        self.config.file_timeout_secs = Some(secs);
        self
    }

    pub fn document_engine(mut self, engine: Arc<dyn DocumentEngine>) -> Self {
        self.config.document_engine = Some(engine);
        self
    }

    pub fn pdf_engine(mut self, engine: Arc<dyn PdfEngine>) -> Self {
        self.config.pdf_engine = Some(engine);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunnerConfig, DocBatchError> {
        let c = &self.config;
        if c.file_timeout_secs == Some(0) {
            return Err(DocBatchError::InvalidConfig(
                "file timeout must be ≥ 1 second (omit it to disable)".into(),
            ));
        }
        if c.pandoc_program.as_os_str().is_empty() {
            return Err(DocBatchError::InvalidConfig(
                "pandoc program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
