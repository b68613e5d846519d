//! Implementation of the timing command.
//!
//! Resolves overrides and host settings, then runs the generate and timed
//! build steps inside the scratch workspace, echoing each command line before
//! it runs.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use compile_timer_lib::config::Overrides;
use compile_timer_lib::execute::{CommandRunner, ExecuteError, ExitOutcome, Interrupt, Invocation, SystemRunner};
use compile_timer_lib::platform;
use compile_timer_lib::timer::{TimerError, TimerOptions, time_target};

use crate::output::{format_duration, print_stat};

/// Prints each command line, then runs it as a real process.
///
/// The echo is the bare command line so scripts reading stdout see exactly
/// what was run.
struct EchoRunner {
  inner: SystemRunner,
}

impl CommandRunner for EchoRunner {
  fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<ExitOutcome, ExecuteError> {
    println!("{}", invocation);
    self.inner.run(invocation, cwd)
  }
}

/// Execute the timing command.
///
/// Prints `Time elapsed: <seconds> seconds` when the target built. Triggering
/// `interrupt` stops the running step; the run then fails with
/// [`TimerError::Interrupted`].
///
/// # Errors
///
/// Returns a [`TimerError`] (possibly wrapped in context) for every failure;
/// use [`exit_code`] to turn it into the process exit code.
pub fn cmd_time(project_folder: &Path, target: &str, config: Option<&Path>, interrupt: Interrupt) -> Result<()> {
  let overrides = Overrides::load_optional(config).map_err(TimerError::from)?;
  let workdir = std::env::current_dir().context("Failed to determine the current directory")?;

  let options = TimerOptions {
    cmake: platform::cmake_program(),
    project_dir: project_folder.to_path_buf(),
    target: target.to_string(),
    jobs: platform::parallelism(),
    overrides,
    workdir,
  };
  debug!(cmake = ?options.cmake, jobs = options.jobs, workdir = ?options.workdir, "resolved options");

  let mut runner = EchoRunner {
    inner: SystemRunner::with_interrupt(interrupt),
  };
  let report = time_target(&options, &mut runner)?;

  println!("Time elapsed: {} seconds", report.seconds());
  print_stat("Duration", &format_duration(report.elapsed));
  print_stat("Jobs", &report.jobs.to_string());

  Ok(())
}

/// Process exit code for a failed run.
///
/// Subprocess failures keep the subprocess's code and an interrupt exits with
/// 130; anything else exits with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
  err.downcast_ref::<TimerError>().map(TimerError::exit_code).unwrap_or(1)
}
