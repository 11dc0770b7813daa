//! Run handler: execute the file, then explain and fix failures.

use std::{
    io::{self, Write},
    path::Path,
    time::Duration,
};

use anyhow::Result;
use tracing::debug;

use crate::{
    execution::{ExecOutcome, ExecutionResult, Executor, Stage},
    explain::{explain_failure, Explainer, Explanation},
    language::{FileReference, Language},
    printer::{Printer, Tone},
    utils::save_fixed_file,
};

/// The single path a run takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Succeeded(ExecutionResult),
    Unsupported(Language),
    TimedOut { stage: Stage, limit: Duration },
    Failed { result: ExecutionResult, explanation: Explanation },
}

/// Only failed runs are explained; timeouts and unsupported files are not.
pub async fn judge(
    outcome: ExecOutcome,
    path: &Path,
    remote: Option<&dyn Explainer>,
) -> Verdict {
    match outcome {
        ExecOutcome::Completed(result) if result.success() => Verdict::Succeeded(result),
        ExecOutcome::Completed(result) => {
            let explanation = explain_failure(&result.stderr, path, remote).await;
            Verdict::Failed { result, explanation }
        }
        ExecOutcome::TimedOut { stage, limit } => Verdict::TimedOut { stage, limit },
        ExecOutcome::Unsupported(language) => Verdict::Unsupported(language),
    }
}

pub struct RunHandler<'a> {
    pub executor: &'a Executor,
    pub remote: Option<&'a dyn Explainer>,
    pub printer: &'a Printer,
}

impl RunHandler<'_> {
    /// Errors only when a corrected file cannot be written.
    pub async fn run(&self, file: &FileReference) -> Result<()> {
        self.printer
            .print(Tone::Info, &format!("[Detected Language] {}\n", file.language()));

        let outcome = match self.executor.run(file).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.printer.print(Tone::Error, &format!("⚠ Could not run code: {:#}", e));
                return Ok(());
            }
        };
        debug!(?outcome, "execution finished");

        let verdict = judge(outcome, file.path(), self.remote).await;
        self.render(&mut io::stdout().lock(), file.path(), verdict)
    }

    fn render(&self, out: &mut dyn Write, path: &Path, verdict: Verdict) -> Result<()> {
        let p = self.printer;
        match verdict {
            Verdict::Succeeded(result) => {
                p.write_line(out, Tone::Success, "✅ No errors found. Code ran successfully!")?;
                p.write_line(out, Tone::Plain, &result.stdout)?;
                // A stale artifact can run fine after a failed compile; keep its errors visible.
                let diagnostics = result.stderr.trim();
                if !diagnostics.is_empty() {
                    p.write_line(out, Tone::Warning, "[Warnings]")?;
                    p.write_line(out, Tone::Warning, diagnostics)?;
                }
            }
            Verdict::Unsupported(_) => {
                let msg = "⚠ Could not run code or language not supported.";
                p.write_line(out, Tone::Error, msg)?;
            }
            Verdict::TimedOut { stage, limit } => {
                let what = match stage {
                    Stage::Compile => "Compilation",
                    Stage::Run => "Execution",
                };
                let msg = format!("⚠ {} timed out after {:?}.", what, limit);
                p.write_line(out, Tone::Error, &msg)?;
            }
            Verdict::Failed { result, explanation } => {
                debug!(status = ?result.status, source = ?explanation.source, "run failed");
                p.write_line(out, Tone::Error, "[Error Found]")?;
                p.write_line(out, Tone::Plain, result.stderr.trim())?;

                writeln!(out)?;
                p.write_line(out, Tone::Warning, "[Explanation & Suggested Fix]")?;
                if let Some(text) = &explanation.explanation {
                    p.write_line(out, Tone::Warning, text)?;
                }
                if let Some(fix) = &explanation.fix {
                    p.write_line(out, Tone::Success, &format!("\nSuggested fix:\n{}", fix))?;
                }
                if let Some(code) = &explanation.corrected_code {
                    let saved = save_fixed_file(path, code)?;
                    let msg = format!("\n💾 Fixed version saved to: {}", saved.display());
                    p.write_line(out, Tone::Saved, &msg)?;
                }
            }
        }
        Ok(())
    }
}
