//! Blocking subprocess runner.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::interrupt::Interrupt;
use super::types::{CommandRunner, ExecuteError, ExitOutcome, Invocation};

/// Runs invocations as real child processes.
///
/// Standard output and standard error of the child are discarded and standard
/// input is closed. On Unix each child leads its own process group so an
/// [`Interrupt`] reaches everything it started. No timeout is applied.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
  interrupt: Interrupt,
}

impl SystemRunner {
  pub fn with_interrupt(interrupt: Interrupt) -> Self {
    Self { interrupt }
  }
}

impl CommandRunner for SystemRunner {
  fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<ExitOutcome, ExecuteError> {
    if self.interrupt.is_requested() {
      debug!(cmd = %invocation, "interrupted, not starting command");
      return Ok(ExitOutcome::Interrupted);
    }

    info!(cmd = %invocation, "executing command");
    debug!(working_dir = ?cwd, "spawning process");

    let mut command = Command::new(&invocation.program);
    command
      .args(&invocation.args)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null());
    #[cfg(unix)]
    {
      use std::os::unix::process::CommandExt;
      command.process_group(0);
    }

    let mut child = command.spawn().map_err(|source| ExecuteError::Spawn {
      program: invocation.program_name(),
      source,
    })?;
    self.interrupt.register(child.id());
    let status = child.wait();
    self.interrupt.clear();
    let status = status.map_err(|source| ExecuteError::Wait {
      program: invocation.program_name(),
      source,
    })?;

    let outcome = if self.interrupt.is_requested() {
      ExitOutcome::Interrupted
    } else {
      ExitOutcome::from_code(status.code())
    };
    debug!(%outcome, "process exited");
    Ok(outcome)
  }
}
