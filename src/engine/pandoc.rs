//! Pandoc subprocess engine.
//!
//! Invokes `pandoc <input> -o <output> <format flags>` via
//! [`tokio::process::Command`] with stdout/stderr captured. Exit 0 means the
//! output file was written; any other exit surfaces pandoc's stderr as the
//! file's diagnostic. Spawn failures (pandoc not installed, not executable)
//! are reported the same way, with no exit code.

use crate::engine::{DocumentEngine, TargetFormat};
use crate::error::FileError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Extra arguments per target format, matching pandoc's CLI.
///
/// The Markdown target asks for `markdown_strict` plus pipe tables and fenced
/// code blocks with wrapping disabled, so tables and code survive round-trips
/// through other tooling.
fn format_args(format: TargetFormat) -> &'static [&'static str] {
    match format {
        TargetFormat::StrictMarkdown => &[
            "--wrap=none",
            "-t",
            "markdown_strict+pipe_tables+fenced_code_blocks",
        ],
        TargetFormat::Docx => &["-t", "docx"],
    }
}

/// Production [`DocumentEngine`] shelling out to pandoc.
#[derive(Debug, Clone)]
pub struct PandocEngine {
    program: PathBuf,
}

impl PandocEngine {
    /// Use a specific pandoc binary (absolute path or a name on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for PandocEngine {
    /// `pandoc` resolved from `PATH`.
    fn default() -> Self {
        Self::new("pandoc")
    }
}

#[async_trait]
impl DocumentEngine for PandocEngine {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: TargetFormat,
    ) -> Result<(), FileError> {
        debug!(
            input = %input.display(),
            output = %output.display(),
            ?format,
            "invoking pandoc"
        );

        let result = Command::new(&self.program)
            .arg(input)
            .arg("-o")
            .arg(output)
            .args(format_args(format))
            .kill_on_drop(true)
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) => {
                return Err(FileError::Tool {
                    status: None,
                    stderr: format!("failed to run '{}': {e}", self.program.display()),
                });
            }
        };

        if out.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        Err(FileError::Tool {
            status: out.status.code(),
            stderr: if stderr.is_empty() {
                format!("pandoc exited with {}", out.status)
            } else {
                stderr
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_target_requests_strict_markdown_without_wrapping() {
        let args = format_args(TargetFormat::StrictMarkdown);
        assert!(args.contains(&"--wrap=none"));
        assert!(args
            .iter()
            .any(|a| a.contains("markdown_strict+pipe_tables+fenced_code_blocks")));
    }

    #[test]
    fn docx_target_requests_docx() {
        assert_eq!(format_args(TargetFormat::Docx), ["-t", "docx"]);
    }

    #[tokio::test]
    async fn missing_program_reports_tool_error_without_exit_code() {
        let engine = PandocEngine::new("/nonexistent/docbatch-no-such-pandoc");
        let err = engine
            .convert(
                Path::new("in.docx"),
                Path::new("out.md"),
                TargetFormat::StrictMarkdown,
            )
            .await
            .expect_err("spawn must fail");
        match err {
            FileError::Tool { status, stderr } => {
                assert_eq!(status, None);
                assert!(!stderr.is_empty());
            }
            other => panic!("expected Tool error, got {other:?}"),
        }
    }

    // Unix-only: fake pandoc executables exercise the exit-code contract
    // without requiring a real pandoc installation.
    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-pandoc");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[tokio::test]
        async fn exit_zero_is_success() {
            let dir = tempfile::tempdir().unwrap();
            let engine = PandocEngine::new(script(dir.path(), "exit 0"));
            engine
                .convert(
                    Path::new("in.md"),
                    Path::new("out.docx"),
                    TargetFormat::Docx,
                )
                .await
                .expect("exit 0 must be success");
        }

        #[tokio::test]
        async fn nonzero_exit_carries_stderr_and_code() {
            let dir = tempfile::tempdir().unwrap();
            let engine =
                PandocEngine::new(script(dir.path(), "echo 'bad input' >&2; exit 21"));
            let err = engine
                .convert(
                    Path::new("in.docx"),
                    Path::new("out.md"),
                    TargetFormat::StrictMarkdown,
                )
                .await
                .expect_err("non-zero exit must fail");
            match err {
                FileError::Tool { status, stderr } => {
                    assert_eq!(status, Some(21));
                    assert_eq!(stderr, "bad input");
                }
                other => panic!("expected Tool error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn silent_failure_still_has_a_message() {
            let dir = tempfile::tempdir().unwrap();
            let engine = PandocEngine::new(script(dir.path(), "exit 1"));
            let err = engine
                .convert(
                    Path::new("in.docx"),
                    Path::new("out.md"),
                    TargetFormat::StrictMarkdown,
                )
                .await
                .expect_err("non-zero exit must fail");
            match err {
                FileError::Tool { stderr, .. } => assert!(!stderr.is_empty()),
                other => panic!("expected Tool error, got {other:?}"),
            }
        }
    }
}
