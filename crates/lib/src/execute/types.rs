//! Types for subprocess execution.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Errors that prevent a subprocess from producing an exit status.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The program could not be started (not found, not executable, ...).
  #[error("failed to run {program}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to wait for {program}")]
  Wait {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// How a finished subprocess exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
  Success,
  /// Non-zero exit code.
  Failed(i32),
  /// Terminated without an exit code (killed by a signal).
  Terminated,
  /// Stopped because the user interrupted the run.
  Interrupted,
}

impl ExitOutcome {
  pub fn from_code(code: Option<i32>) -> Self {
    match code {
      Some(0) => Self::Success,
      Some(code) => Self::Failed(code),
      None => Self::Terminated,
    }
  }

  pub fn success(self) -> bool {
    matches!(self, Self::Success)
  }

  /// Process exit code to report for this outcome.
  ///
  /// A signal termination has no code of its own and maps to 1; a user
  /// interrupt maps to the shell convention for SIGINT, 130.
  pub fn code(self) -> i32 {
    match self {
      Self::Success => 0,
      Self::Failed(code) => code,
      Self::Terminated => 1,
      Self::Interrupted => 130,
    }
  }
}

impl fmt::Display for ExitOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Success => write!(f, "success"),
      Self::Failed(code) => write!(f, "exit code {}", code),
      Self::Terminated => write!(f, "terminated by signal"),
      Self::Interrupted => write!(f, "interrupted"),
    }
  }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
}

impl Invocation {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
    self
  }

  /// Program name for error messages.
  pub fn program_name(&self) -> String {
    self.program.to_string_lossy().into_owned()
  }

  /// Arguments as (lossy) strings.
  pub fn args_lossy(&self) -> Vec<String> {
    self.args.iter().map(|arg| arg.to_string_lossy().into_owned()).collect()
  }
}

/// Space-joined command line, e.g. `cmake --build . --target all -j 8`.
impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Executes invocations to completion.
pub trait CommandRunner {
  /// Run `invocation` with `cwd` as its working directory and wait for it.
  fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<ExitOutcome, ExecuteError>;
}
