//! Timing a CMake target build.
//!
//! [`time_target`] runs the full sequence inside a scratch workspace:
//!
//! 1. `cmake <project> <cmake_args...>` generates the build tree (not timed)
//! 2. `cmake --build . --target <target> -j <jobs> <build_args...>` is timed
//!
//! The first failing step ends the run, and so does an interrupt. The
//! workspace is removed on every path once it has been acquired.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, Overrides};
use crate::execute::{CommandRunner, ExecuteError, ExitOutcome, Invocation};
use crate::workspace::{ScratchWorkspace, WorkspaceError};

#[derive(Debug, Error)]
pub enum TimerError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  #[error(transparent)]
  Execute(#[from] ExecuteError),

  /// The generator step exited unsuccessfully; the build step was skipped.
  #[error("cmake failed")]
  GeneratorFailed { outcome: ExitOutcome },

  #[error("cmake build failed")]
  BuildFailed { outcome: ExitOutcome },

  #[error("interrupted")]
  Interrupted,
}

impl TimerError {
  /// Process exit code for this failure.
  ///
  /// Subprocess failures propagate the subprocess's own code and an interrupt
  /// exits with 130; everything else is a plain failure (1).
  pub fn exit_code(&self) -> i32 {
    match self {
      TimerError::GeneratorFailed { outcome } | TimerError::BuildFailed { outcome } => outcome.code(),
      TimerError::Interrupted => ExitOutcome::Interrupted.code(),
      _ => 1,
    }
  }
}

/// Everything needed for one timed run.
#[derive(Debug, Clone)]
pub struct TimerOptions {
  /// CMake executable used for both steps.
  pub cmake: OsString,
  /// Project source folder, passed to the generator verbatim.
  pub project_dir: PathBuf,
  pub target: String,
  /// Parallelism hint passed as `-j`.
  pub jobs: usize,
  pub overrides: Overrides,
  /// Directory the scratch `build` directory is created in.
  pub workdir: PathBuf,
}

impl TimerOptions {
  /// `cmake <project> <cmake_args...>`
  pub fn generator_invocation(&self) -> Invocation {
    Invocation::new(self.cmake.clone())
      .arg(&self.project_dir)
      .args(&self.overrides.cmake_args)
  }

  /// `cmake --build . --target <target> -j <jobs> <build_args...>`
  pub fn build_invocation(&self) -> Invocation {
    Invocation::new(self.cmake.clone())
      .args(["--build", ".", "--target"])
      .arg(&self.target)
      .arg("-j")
      .arg(self.jobs.to_string())
      .args(&self.overrides.build_args)
  }
}

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingReport {
  /// Wall-clock time of the build step alone.
  pub elapsed: Duration,
  pub jobs: usize,
}

impl TimingReport {
  pub fn seconds(&self) -> f64 {
    self.elapsed.as_secs_f64()
  }
}

/// Generate the build tree and time the build of `options.target`.
///
/// # Errors
///
/// Fails without running anything if the scratch workspace cannot be
/// acquired. Generator and build failures carry the subprocess outcome so the
/// caller can propagate its exit code.
pub fn time_target<R: CommandRunner + ?Sized>(
  options: &TimerOptions,
  runner: &mut R,
) -> Result<TimingReport, TimerError> {
  let workspace = ScratchWorkspace::acquire(&options.workdir)?;
  let cwd = workspace.path();

  let generate = options.generator_invocation();
  let outcome = runner.run(&generate, cwd)?;
  if outcome == ExitOutcome::Interrupted {
    return Err(TimerError::Interrupted);
  }
  if !outcome.success() {
    return Err(TimerError::GeneratorFailed { outcome });
  }
  debug!("build tree generated");

  let build = options.build_invocation();
  let start = Instant::now();
  let outcome = runner.run(&build, cwd)?;
  if outcome == ExitOutcome::Interrupted {
    return Err(TimerError::Interrupted);
  }
  if !outcome.success() {
    return Err(TimerError::BuildFailed { outcome });
  }
  let elapsed = start.elapsed();

  info!(build_target = %options.target, jobs = options.jobs, elapsed = ?elapsed, "target built");

  Ok(TimingReport {
    elapsed,
    jobs: options.jobs,
  })
}
