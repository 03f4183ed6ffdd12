//! Result types produced by a batch run.
//!
//! One [`ConversionResult`] per input file, in input order, plus a
//! [`RunSummary`] with aggregate counts. All types serialise to JSON for the
//! CLI's `--json` output. Results are transient: each run replaces the
//! previous run's results, there is no history.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of converting a single input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The input file as given in the job.
    pub input: PathBuf,

    /// Path of the produced output file. `None` when the conversion failed
    /// before an output could be written.
    pub output: Option<PathBuf>,

    /// `None` on success; the per-file error otherwise.
    pub error: Option<FileError>,

    /// Wall-clock time spent on this file.
    pub duration_ms: u64,
}

impl ConversionResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts for a completed batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of input files in the job.
    pub total: usize,
    /// Files that converted without error.
    pub succeeded: usize,
    /// Files whose result carries a [`FileError`].
    pub failed: usize,
    /// Wall-clock time for the whole batch.
    pub total_duration_ms: u64,
}

impl RunSummary {
    /// Tally results into a summary. `total_duration_ms` is filled in by the
    /// runner, which owns the batch clock.
    pub(crate) fn tally(results: &[ConversionResult], total_duration_ms: u64) -> Self {
        let succeeded = results.iter().filter(|r| r.succeeded()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            total_duration_ms,
        }
    }
}

/// Everything a completed run produces: per-file results in input order plus
/// the aggregate summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub results: Vec<ConversionResult>,
    pub summary: RunSummary,
}
