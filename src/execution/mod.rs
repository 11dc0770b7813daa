//! Executor: runs a source file through its compiler/interpreter.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Output, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{process::Command, time::timeout};
use tracing::{debug, warn};

use crate::{config::Config, language::{FileReference, Language}};

pub mod recipe;

pub use recipe::{Artifact, Recipe};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when killed by a signal or when the run step could not start.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

impl From<Output> for ExecutionResult {
    fn from(out: Output) -> Self {
        Self {
            status: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Run,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Completed(ExecutionResult),
    TimedOut { stage: Stage, limit: Duration },
    Unsupported(Language),
}

#[derive(Debug)]
pub(crate) enum StepResult {
    Finished(Output),
    TimedOut(Duration),
}

#[derive(Debug, Clone)]
pub struct Executor {
    python: String,
    run_timeout: Duration,
    compile_timeout: Option<Duration>,
}

impl Executor {
    pub fn new(
        python: impl Into<String>,
        run_timeout: Duration,
        compile_timeout: Option<Duration>,
    ) -> Self {
        Self { python: python.into(), run_timeout, compile_timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let python = cfg.get("PYTHON_BIN").unwrap_or_else(|| "python".into());
        Self::new(python, cfg.run_timeout(), cfg.compile_timeout())
    }

    /// Execute `file` according to its language recipe.
    ///
    /// Errors only when an interpreter or compiler cannot be launched at all.
    pub async fn run(&self, file: &FileReference) -> Result<ExecOutcome> {
        let Some(recipe) = Recipe::for_language(file.language()) else {
            debug!(language = %file.language(), "no execution recipe");
            return Ok(ExecOutcome::Unsupported(file.language()));
        };

        match recipe {
            Recipe::Interpret => self.interpret(file.path()).await,
            Recipe::CompileThenRun { compiler, artifact } => {
                self.compile_then_run(file.path(), compiler, artifact).await
            }
        }
    }

    async fn interpret(&self, path: &Path) -> Result<ExecOutcome> {
        let mut cmd = Command::new(&self.python);
        cmd.arg(path);
        let step = run_step(cmd, Some(self.run_timeout))
            .await
            .with_context(|| format!("failed to launch {}", self.python))?;
        Ok(match step {
            StepResult::Finished(out) => ExecOutcome::Completed(out.into()),
            StepResult::TimedOut(limit) => ExecOutcome::TimedOut { stage: Stage::Run, limit },
        })
    }

    async fn compile_then_run(
        &self,
        path: &Path,
        compiler: &'static str,
        artifact: Artifact,
    ) -> Result<ExecOutcome> {
        let (compile, run) = match artifact {
            Artifact::JvmClass => {
                let mut compile = Command::new(compiler);
                compile.arg(path);
                let mut run = Command::new("java");
                run.arg("-cp").arg(class_dir(path)).arg(class_name(path));
                (compile, run)
            }
            Artifact::NativeExecutable => {
                let exe = temp_executable()?;
                debug!(exe = %exe.display(), "temporary executable is kept after the run");
                let mut compile = Command::new(compiler);
                compile.arg(path).arg("-o").arg(&exe);
                (compile, Command::new(exe))
            }
        };

        if self.compile_timeout.is_none() {
            warn!(compiler, "compile step runs without a timeout; set COMPILE_TIMEOUT to bound it");
        }
        let compiled = run_step(compile, self.compile_timeout)
            .await
            .with_context(|| format!("failed to launch {}", compiler))?;
        let compiled = match compiled {
            StepResult::Finished(out) => out,
            StepResult::TimedOut(limit) => {
                return Ok(ExecOutcome::TimedOut { stage: Stage::Compile, limit })
            }
        };
        debug!(compiler, status = ?compiled.status.code(), "compile step finished");

        // The compiler's exit code is not acted on; its diagnostics ride along
        // with whatever the run step reports.
        let diagnostics = if compiled.status.success() {
            String::new()
        } else {
            String::from_utf8_lossy(&compiled.stderr).into_owned()
        };

        let program = run.as_std().get_program().to_os_string();
        match run_step(run, Some(self.run_timeout)).await {
            Ok(StepResult::Finished(out)) => {
                let mut result = ExecutionResult::from(out);
                result.stderr = join_nonempty(&diagnostics, &result.stderr);
                Ok(ExecOutcome::Completed(result))
            }
            Ok(StepResult::TimedOut(limit)) => {
                Ok(ExecOutcome::TimedOut { stage: Stage::Run, limit })
            }
            Err(e) => {
                debug!(error = %e, "run step could not start");
                let launch = format!("failed to launch {}: {}", display_program(&program), e);
                Ok(ExecOutcome::Completed(ExecutionResult {
                    status: None,
                    stdout: String::new(),
                    stderr: join_nonempty(&diagnostics, &launch),
                }))
            }
        }
    }
}

/// Spawn `cmd` with captured output, killing it if `limit` elapses first.
pub(crate) async fn run_step(
    mut cmd: Command,
    limit: Option<Duration>,
) -> std::io::Result<StepResult> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    let std_cmd = cmd.as_std();
    debug!(
        program = ?std_cmd.get_program(),
        args = ?std_cmd.get_args().collect::<Vec<_>>(),
        ?limit,
        "spawning"
    );

    let child = cmd.spawn()?;
    match limit {
        Some(limit) => match timeout(limit, child.wait_with_output()).await {
            Ok(out) => Ok(StepResult::Finished(out?)),
            Err(_) => Ok(StepResult::TimedOut(limit)),
        },
        None => Ok(StepResult::Finished(child.wait_with_output().await?)),
    }
}

fn temp_executable() -> Result<PathBuf> {
    tempfile::Builder::new()
        .prefix("codebuddy-")
        .suffix(std::env::consts::EXE_SUFFIX)
        .tempfile()
        .context("creating temporary executable path")?
        .into_temp_path()
        .keep()
        .context("keeping temporary executable path")
}

fn class_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn class_name(path: &Path) -> &OsStr {
    path.file_stem().unwrap_or(path.as_os_str())
}

fn display_program(program: &OsStr) -> String {
    Path::new(program).display().to_string()
}

fn join_nonempty(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (false, true) => first.to_string(),
        (false, false) if first.ends_with('\n') => format!("{}{}", first, second),
        (false, false) => format!("{}\n{}", first, second),
    }
}
