//! Eager (whole-batch) conversion entry points.
//!
//! ## Why eager vs. streaming?
//!
//! This module provides the simpler API: process every file, then return all
//! results at once. Use [`crate::stream::run_stream`] instead when a caller
//! wants per-file progress events while the batch is still running (the CLI's
//! progress bar does).
//!
//! Files are processed strictly sequentially, in input order, by a single
//! worker: the conversions are independent, but ordered results keep the
//! "K of N" progress reporting and the final report deterministic, and a
//! local pandoc install gains little from parallel invocations anyway.

use crate::config::RunnerConfig;
use crate::engine::{DocumentEngine, PandocEngine, PdfEngine, TargetFormat, TextPdfEngine};
use crate::error::{DocBatchError, FileError};
use crate::job::{ConversionJob, ConversionMode};
use crate::output::{ConversionResult, RunOutput, RunSummary};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Convert every file in the job, returning results in input order.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(RunOutput)` once every file has been attempted, even if some (or all)
/// failed — check `output.summary.failed`.
///
/// # Errors
/// Returns `Err(DocBatchError)` only for fatal problems detected before any
/// conversion starts (output directory cannot be created). A per-file
/// failure never aborts the batch.
pub async fn run(job: &ConversionJob, config: &RunnerConfig) -> Result<RunOutput, DocBatchError> {
    let batch_start = Instant::now();
    let engines = prepare(job, config).await?;
    let total = job.len();
    info!(mode = %job.mode(), total, "starting batch");

    let mut results = Vec::with_capacity(total);
    for (index, input) in job.files().iter().enumerate() {
        debug!(file = %input.display(), "converting {} of {}", index + 1, total);
        let result = convert_one(job.mode(), input, config, &engines).await;
        match &result.error {
            None => debug!(file = %input.display(), "converted"),
            Some(e) => warn!(file = %input.display(), error = %e, "conversion failed"),
        }
        results.push(result);
    }

    let summary = RunSummary::tally(&results, batch_start.elapsed().as_millis() as u64);
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_ms = summary.total_duration_ms,
        "batch complete"
    );

    Ok(RunOutput { results, summary })
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(job: &ConversionJob, config: &RunnerConfig) -> Result<RunOutput, DocBatchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocBatchError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(job, config))
}

/// The collaborators resolved for one run.
pub(crate) struct Engines {
    pub(crate) document: Arc<dyn DocumentEngine>,
    pub(crate) pdf: Arc<dyn PdfEngine>,
}

/// Pre-run setup shared by the eager and streaming entry points: create the
/// output directory and resolve the engines. Runs before any file is
/// touched, so a failure here means nothing was converted.
pub(crate) async fn prepare(
    job: &ConversionJob,
    config: &RunnerConfig,
) -> Result<Engines, DocBatchError> {
    let out_dir = config.output_dir_for(job.mode()).to_path_buf();
    tokio::fs::create_dir_all(&out_dir)
        .await
        .map_err(|e| DocBatchError::OutputDirCreate {
            path: out_dir,
            source: e,
        })?;

    let document = match &config.document_engine {
        Some(engine) => Arc::clone(engine),
        None => Arc::new(PandocEngine::new(&config.pandoc_program)) as Arc<dyn DocumentEngine>,
    };
    let pdf = match &config.pdf_engine {
        Some(engine) => Arc::clone(engine),
        None => Arc::new(TextPdfEngine) as Arc<dyn PdfEngine>,
    };

    Ok(Engines { document, pdf })
}

/// Convert a single file, capturing any failure into the result.
///
/// Never returns an error: the contract is one [`ConversionResult`] per
/// input no matter what the collaborator does.
pub(crate) async fn convert_one(
    mode: ConversionMode,
    input: &Path,
    config: &RunnerConfig,
    engines: &Engines,
) -> ConversionResult {
    let file_start = Instant::now();
    let output = mode.output_path(input, config.output_dir_for(mode));
    let timeout = config.file_timeout_secs.map(Duration::from_secs);

    let outcome = match timeout {
        Some(limit) => {
            match tokio::time::timeout(limit, dispatch(mode, input, &output, engines)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FileError::Timeout { secs: limit.as_secs() }),
            }
        }
        None => dispatch(mode, input, &output, engines).await,
    };

    let duration_ms = file_start.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => ConversionResult {
            input: input.to_path_buf(),
            output: Some(output),
            error: None,
            duration_ms,
        },
        Err(e) => ConversionResult {
            input: input.to_path_buf(),
            output: None,
            error: Some(e),
            duration_ms,
        },
    }
}

/// Route one file to the collaborator the mode selects.
///
/// The PDF path is a blocking library call with its own error capture: it
/// runs on the blocking thread pool, and a panic inside the library is
/// reported as that file's failure, never propagated.
async fn dispatch(
    mode: ConversionMode,
    input: &Path,
    output: &Path,
    engines: &Engines,
) -> Result<(), FileError> {
    match mode {
        ConversionMode::DocxToMarkdown => {
            engines
                .document
                .convert(input, output, TargetFormat::StrictMarkdown)
                .await
        }
        ConversionMode::MarkdownToDocx => {
            engines
                .document
                .convert(input, output, TargetFormat::Docx)
                .await
        }
        ConversionMode::PdfToDocx => {
            let engine = Arc::clone(&engines.pdf);
            let input = input.to_path_buf();
            let output = output.to_path_buf();
            match tokio::task::spawn_blocking(move || engine.convert(&input, &output)).await {
                Ok(result) => result,
                Err(join_err) => Err(FileError::Library {
                    detail: format!("PDF engine panicked: {join_err}"),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Document engine scripted to fail on configured file stems.
    struct ScriptedEngine {
        fail_stems: Vec<String>,
        calls: Mutex<Vec<String>>,
        write_output: bool,
    }

    impl ScriptedEngine {
        fn new(fail_stems: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                fail_stems: fail_stems.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
                write_output: true,
            })
        }
    }

    #[async_trait]
    impl DocumentEngine for ScriptedEngine {
        async fn convert(
            &self,
            input: &Path,
            output: &Path,
            _format: TargetFormat,
        ) -> Result<(), FileError> {
            let stem = input.file_stem().unwrap().to_str().unwrap().to_string();
            self.calls.lock().unwrap().push(stem.clone());
            if self.fail_stems.contains(&stem) {
                return Err(FileError::Tool {
                    status: Some(1),
                    stderr: format!("cannot read {stem}"),
                });
            }
            if self.write_output {
                std::fs::write(output, b"converted").unwrap();
            }
            Ok(())
        }
    }

    struct FailingPdfEngine;

    impl PdfEngine for FailingPdfEngine {
        fn convert(&self, _input: &Path, _output: &Path) -> Result<(), FileError> {
            Err(FileError::Library {
                detail: "cannot parse page 1".into(),
            })
        }
    }

    struct PanickingPdfEngine;

    impl PdfEngine for PanickingPdfEngine {
        fn convert(&self, _input: &Path, _output: &Path) -> Result<(), FileError> {
            panic!("library blew up");
        }
    }

    fn config_in(dir: &Path, engine: Arc<dyn DocumentEngine>) -> RunnerConfig {
        RunnerConfig::builder()
            .markdown_dir(dir.join("md"))
            .docx_dir(dir.join("docx"))
            .document_engine(engine)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn one_result_per_input_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(&[]);
        let config = config_in(dir.path(), engine);
        let job = ConversionJob::new(
            ConversionMode::DocxToMarkdown,
            ["z.docx", "a.docx", "m.docx"],
        )
        .unwrap();

        let out = run(&job, &config).await.unwrap();
        assert_eq!(out.results.len(), 3);
        let order: Vec<_> = out
            .results
            .iter()
            .map(|r| r.input.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(order, ["z.docx", "a.docx", "m.docx"]);
    }

    #[tokio::test]
    async fn middle_failure_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(&["b"]);
        let config = config_in(dir.path(), Arc::clone(&engine) as Arc<dyn DocumentEngine>);
        let job =
            ConversionJob::new(ConversionMode::DocxToMarkdown, ["a.docx", "b.docx", "c.docx"])
                .unwrap();

        let out = run(&job, &config).await.unwrap();
        let flags: Vec<bool> = out.results.iter().map(|r| r.succeeded()).collect();
        assert_eq!(flags, [true, false, true]);
        assert_eq!(out.summary.succeeded, 2);
        assert_eq!(out.summary.failed, 1);
        // All three files were attempted.
        assert_eq!(engine.calls.lock().unwrap().len(), 3);
        // The failed file has a non-empty diagnostic and no output path.
        let failed = &out.results[1];
        assert!(failed.output.is_none());
        assert!(!failed.error.as_ref().unwrap().to_string().is_empty());
    }

    #[tokio::test]
    async fn success_writes_output_with_mode_extension() {
        let dir = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(&[]);
        let config = config_in(dir.path(), engine);
        let job = ConversionJob::new(ConversionMode::DocxToMarkdown, ["report.docx"]).unwrap();

        let out = run(&job, &config).await.unwrap();
        let result = &out.results[0];
        let path = result.output.as_ref().unwrap();
        assert_eq!(path.extension().unwrap(), "md");
        assert!(path.exists(), "engine must have written {}", path.display());
    }

    #[tokio::test]
    async fn rerun_overwrites_same_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(&[]);
        let config = config_in(dir.path(), engine);
        let job = ConversionJob::new(ConversionMode::DocxToMarkdown, ["report.docx"]).unwrap();

        let first = run(&job, &config).await.unwrap();
        let second = run(&job, &config).await.unwrap();
        assert_eq!(first.results[0].output, second.results[0].output);

        let md_dir = dir.path().join("md");
        let entries = std::fs::read_dir(&md_dir).unwrap().count();
        assert_eq!(entries, 1, "overwrite, not duplicate");
    }

    #[tokio::test]
    async fn pdf_library_error_is_captured_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::builder()
            .docx_dir(dir.path().join("docx"))
            .pdf_engine(Arc::new(FailingPdfEngine))
            .build()
            .unwrap();
        let job = ConversionJob::new(ConversionMode::PdfToDocx, ["scan.pdf"]).unwrap();

        let out = run(&job, &config).await.unwrap();
        let err = out.results[0].error.as_ref().unwrap();
        assert!(matches!(err, FileError::Library { .. }));
        assert!(err.to_string().contains("cannot parse page 1"));
    }

    #[tokio::test]
    async fn pdf_library_panic_is_captured_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::builder()
            .docx_dir(dir.path().join("docx"))
            .pdf_engine(Arc::new(PanickingPdfEngine))
            .build()
            .unwrap();
        let job =
            ConversionJob::new(ConversionMode::PdfToDocx, ["bad.pdf", "also-bad.pdf"]).unwrap();

        let out = run(&job, &config).await.unwrap();
        assert_eq!(out.results.len(), 2, "panic must not abort the batch");
        for r in &out.results {
            assert!(matches!(r.error, Some(FileError::Library { .. })));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_conversion_times_out_and_batch_continues() {
        struct StalledEngine;

        #[async_trait]
        impl DocumentEngine for StalledEngine {
            async fn convert(
                &self,
                input: &Path,
                output: &Path,
                _format: TargetFormat,
            ) -> Result<(), FileError> {
                if input.file_stem().unwrap() == "hung" {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                std::fs::write(output, b"ok").unwrap();
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::builder()
            .markdown_dir(dir.path().join("md"))
            .docx_dir(dir.path().join("docx"))
            .document_engine(Arc::new(StalledEngine))
            .file_timeout_secs(5)
            .build()
            .unwrap();
        let job =
            ConversionJob::new(ConversionMode::DocxToMarkdown, ["hung.docx", "fine.docx"])
                .unwrap();

        let out = run(&job, &config).await.unwrap();
        assert!(matches!(
            out.results[0].error,
            Some(FileError::Timeout { secs: 5 })
        ));
        assert!(out.results[1].succeeded());
        assert_eq!(out.summary.failed, 1);
    }

    #[tokio::test]
    async fn output_directory_is_created_before_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/nested/md");
        let config = RunnerConfig::builder()
            .markdown_dir(&nested)
            .document_engine(ScriptedEngine::new(&[]) as Arc<dyn DocumentEngine>)
            .build()
            .unwrap();
        let job = ConversionJob::new(ConversionMode::DocxToMarkdown, ["a.docx"]).unwrap();

        run(&job, &config).await.unwrap();
        assert!(nested.is_dir());
    }
}
