//! # docbatch
//!
//! Batch-convert documents between DOCX, Markdown, and PDF.
//!
//! ## Why this crate?
//!
//! Pandoc already converts documents superbly — one at a time. What it does
//! not give you is a batch runner: take a folder's worth of files, push each
//! through the right converter, survive the ones that fail, and report what
//! happened. docbatch is exactly that runner, with the actual conversion work
//! delegated to pandoc (DOCX ↔ Markdown, as a subprocess) and to an
//! in-process PDF text extractor (PDF → DOCX).
//!
//! ## Pipeline Overview
//!
//! ```text
//! files + mode
//!  │
//!  ├─ 1. Job      validate (non-empty), lock in file order
//!  ├─ 2. Prepare  create output dir, resolve engines
//!  ├─ 3. Convert  one file at a time, per-file error capture
//!  │              ├─ docx-to-md   pandoc --wrap=none -t markdown_strict+…
//!  │              ├─ md-to-docx   pandoc -t docx
//!  │              └─ pdf-to-docx  in-process library (spawn_blocking)
//!  └─ 4. Report   ordered ConversionResults + succeeded/failed summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docbatch::{run, ConversionJob, ConversionMode, RunnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let job = ConversionJob::new(
//!         ConversionMode::DocxToMarkdown,
//!         ["report.docx", "notes.docx"],
//!     )?;
//!     let output = run(&job, &RunnerConfig::default()).await?;
//!     for r in &output.results {
//!         println!("{} → {:?} ({})", r.input.display(), r.output,
//!             if r.succeeded() { "ok" } else { "failed" });
//!     }
//!     eprintln!("{} succeeded, {} failed",
//!         output.summary.succeeded, output.summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! For live progress (one event per finished file), use
//! [`run_stream`] and consume the returned [`stream::BatchEventStream`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docbatch` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docbatch = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod job;
pub mod output;
pub mod runner;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunnerConfig, RunnerConfigBuilder};
pub use engine::{DocumentEngine, PandocEngine, PdfEngine, TargetFormat, TextPdfEngine};
pub use error::{DocBatchError, FileError};
pub use job::{ConversionJob, ConversionMode};
pub use output::{ConversionResult, RunOutput, RunSummary};
pub use runner::{run, run_sync};
pub use stream::{run_stream, BatchEvent, BatchEventStream};
