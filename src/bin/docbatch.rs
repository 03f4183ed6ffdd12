//! CLI binary for docbatch.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `RunnerConfig`, drives the event stream into a progress bar, and prints
//! the per-file log and the aggregate summary.

use anyhow::{Context, Result};
use clap::Parser;
use docbatch::{
    run, run_stream, BatchEvent, ConversionJob, ConversionMode, RunSummary, RunnerConfig,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Word documents to strict Markdown (into ./output/)
  docbatch docx-to-md reports/*.docx

  # Markdown back to DOCX (into ./output_docx/)
  docbatch md-to-docx notes/*.md

  # Text PDFs to DOCX, 2-minute cap per file
  docbatch pdf-to-docx --timeout 120 scans/*.pdf

  # Everything into one directory, machine-readable report
  docbatch docx-to-md -o exports --json *.docx > report.json

MODES:
  docx-to-md    pandoc, strict Markdown + pipe tables + fenced code, no wrap
  md-to-docx    pandoc, DOCX writer
  pdf-to-docx   in-process text extraction (text PDFs only — no OCR)

EXIT CODES:
  0  every file converted
  1  at least one file failed (see the per-file log)
  2  fatal error, nothing was converted

ENVIRONMENT VARIABLES:
  DOCBATCH_PANDOC        Pandoc binary (default: pandoc on PATH)
  DOCBATCH_MARKDOWN_DIR  Markdown output directory
  DOCBATCH_DOCX_DIR      DOCX output directory
  DOCBATCH_TIMEOUT       Per-file timeout in seconds

Pandoc must be installed for the docx-to-md and md-to-docx modes:
https://pandoc.org/installing.html
"#;

/// Batch-convert documents between DOCX, Markdown, and PDF.
#[derive(Parser, Debug)]
#[command(
    name = "docbatch",
    version,
    about = "Batch-convert documents between DOCX, Markdown, and PDF",
    long_about = "Batch-convert documents between DOCX, Markdown, and PDF. DOCX ↔ Markdown is \
delegated to pandoc; PDF → DOCX uses an in-process text extractor. One result per input file, \
in input order; a failing file never aborts the batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Conversion mode.
    #[arg(value_enum)]
    mode: ModeArg,

    /// Input files, converted in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for this run, overriding the mode's default.
    #[arg(short, long, env = "DOCBATCH_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Markdown output directory (docx-to-md).
    #[arg(long, env = "DOCBATCH_MARKDOWN_DIR", default_value = "output")]
    markdown_dir: PathBuf,

    /// DOCX output directory (md-to-docx, pdf-to-docx).
    #[arg(long, env = "DOCBATCH_DOCX_DIR", default_value = "output_docx")]
    docx_dir: PathBuf,

    /// Pandoc binary (path or name on PATH).
    #[arg(long, env = "DOCBATCH_PANDOC", default_value = "pandoc")]
    pandoc: PathBuf,

    /// Per-file timeout in seconds (omit for no timeout).
    #[arg(long, env = "DOCBATCH_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Print the full run report as JSON instead of the live log.
    #[arg(long, env = "DOCBATCH_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "DOCBATCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCBATCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCBATCH_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// DOCX → Markdown
    DocxToMd,
    /// Markdown → DOCX
    MdToDocx,
    /// PDF → DOCX
    PdfToDocx,
}

impl From<ModeArg> for ConversionMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::DocxToMd => ConversionMode::DocxToMarkdown,
            ModeArg::MdToDocx => ConversionMode::MarkdownToDocx,
            ModeArg::PdfToDocx => ConversionMode::PdfToDocx,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run_cli().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::from(2)
        }
    }
}

async fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar and the per-file log lines carry all the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build job + config ───────────────────────────────────────────────
    let mode: ConversionMode = cli.mode.into();
    let job = ConversionJob::validated(mode, cli.files.clone())
        .context("Invalid batch")?;

    let mut builder = RunnerConfig::builder()
        .markdown_dir(&cli.markdown_dir)
        .docx_dir(&cli.docx_dir)
        .pandoc_program(&cli.pandoc);
    if let Some(dir) = &cli.output_dir {
        // One explicit directory overrides both per-mode defaults.
        builder = builder.markdown_dir(dir).docx_dir(dir);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.file_timeout_secs(secs);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── JSON mode: eager run, structured report on stdout ────────────────
    if cli.json {
        let output = run(&job, &config).await.context("Batch failed to start")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise report")?
        );
        return Ok(exit_for(&output.summary));
    }

    // ── Interactive mode: stream events into the progress bar ────────────
    let total = job.len();
    let mut stream = run_stream(job, config)
        .await
        .context("Batch failed to start")?;

    let bar = if show_progress {
        Some(make_bar(total))
    } else {
        None
    };

    let mut summary: Option<RunSummary> = None;
    while let Some(event) = stream.next().await {
        match event {
            BatchEvent::Started { total } => {
                if let Some(b) = &bar {
                    b.println(format!(
                        "{} {}",
                        cyan("◆"),
                        bold(&format!("Converting {total} files ({mode})…"))
                    ));
                }
            }
            BatchEvent::FileFinished {
                index,
                total,
                result,
            } => {
                let name = result
                    .input
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| result.input.display().to_string());
                let line = match &result.error {
                    None => format!(
                        "  {} {:>3}/{:<3}  {}  {}",
                        green("✓"),
                        index + 1,
                        total,
                        name,
                        dim(&format!("{:.1}s", result.duration_ms as f64 / 1000.0)),
                    ),
                    Some(e) => format!(
                        "  {} {:>3}/{:<3}  {}  {}",
                        red("✗"),
                        index + 1,
                        total,
                        name,
                        red(&truncate(&e.to_string(), 80)),
                    ),
                };
                match &bar {
                    Some(b) => {
                        b.println(line);
                        b.inc(1);
                    }
                    None if !cli.quiet => eprintln!("{line}"),
                    None => {}
                }
            }
            BatchEvent::Finished { summary: s } => {
                summary = Some(s);
            }
        }
    }

    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    let summary = summary
        .ok_or_else(|| anyhow::anyhow!("batch ended without a summary (worker dropped?)"))?;

    if !cli.quiet {
        if summary.failed == 0 {
            eprintln!(
                "{} {} files converted in {:.1}s",
                green("✔"),
                bold(&summary.succeeded.to_string()),
                summary.total_duration_ms as f64 / 1000.0,
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if summary.succeeded == 0 {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&summary.succeeded.to_string()),
                summary.total,
                red(&summary.failed.to_string()),
            );
        }
    }

    Ok(exit_for(&summary))
}

fn exit_for(summary: &RunSummary) -> ExitCode {
    if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn make_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  \
         [{bar:42.green/238}] {pos:>3}/{len} files  \
         ⏱ {elapsed_precise}  ETA {eta_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Converting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    } else {
        s.to_string()
    }
}
