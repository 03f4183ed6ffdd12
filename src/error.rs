//! Error types for the docbatch library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocBatchError`] — **Fatal**: the batch cannot start at all (empty job,
//!   output directory cannot be created). Returned as `Err(DocBatchError)`
//!   from the top-level `run*` functions before any file is converted.
//!
//! * [`FileError`] — **Non-fatal**: a single file failed (pandoc exited
//!   non-zero, the PDF library raised an error) but every other file is
//!   unaffected. Stored inside [`crate::output::ConversionResult`] so callers
//!   can inspect partial success rather than losing the whole batch to one
//!   bad document.
//!
//! The separation lets callers decide their own tolerance: treat any failure
//! as an error, log and continue, or collect all failures for a post-run
//! report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docbatch library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::ConversionResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DocBatchError {
    /// The job contained no input files. Nothing was invoked.
    #[error("No input files to convert.\nAdd at least one file to the batch.")]
    EmptyBatch,

    /// An input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// An input file's extension does not match the selected mode.
    #[error("'{path}' does not look like a {expected} file (mode {mode})")]
    WrongExtension {
        path: PathBuf,
        expected: &'static str,
        mode: String,
    },

    /// Could not create an output directory before the run.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file in a batch.
///
/// Stored alongside [`crate::output::ConversionResult`] when a file fails.
/// The batch always continues to the remaining files.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The external conversion tool exited non-zero (or could not be spawned).
    /// `stderr` carries the tool's diagnostic text.
    #[error("conversion tool failed{}: {stderr}", exit_suffix(.status))]
    Tool {
        /// Process exit code, if the process ran at all.
        status: Option<i32>,
        stderr: String,
    },

    /// The in-process PDF conversion library returned an error.
    #[error("PDF conversion failed: {detail}")]
    Library { detail: String },

    /// The conversion did not finish within the configured per-file timeout.
    #[error("conversion timed out after {secs}s")]
    Timeout { secs: u64 },
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit {code})"),
        None => String::new(),
    }
}
