//! Cooperative interruption of a running subprocess.
//!
//! An [`Interrupt`] is shared between the signal handler installed by the
//! binary and the [`SystemRunner`](super::SystemRunner). Triggering it forwards
//! SIGINT to the process group of the running child, so the child exits, the
//! runner returns [`ExitOutcome::Interrupted`](super::ExitOutcome::Interrupted)
//! and scoped cleanup runs as on any other failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tracing::debug;

#[derive(Debug, Default)]
struct State {
  requested: AtomicBool,
  /// Pid of the running child, 0 when none.
  child: AtomicU32,
}

/// Shared interruption flag. Clones observe the same state.
#[derive(Debug, Default, Clone)]
pub struct Interrupt {
  state: Arc<State>,
}

impl Interrupt {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request interruption and signal the running child, if any.
  pub fn trigger(&self) {
    self.state.requested.store(true, Ordering::SeqCst);
    let pid = self.state.child.load(Ordering::SeqCst);
    if pid != 0 {
      forward(pid);
    }
  }

  pub fn is_requested(&self) -> bool {
    self.state.requested.load(Ordering::SeqCst)
  }

  /// Record the running child. A request that raced the spawn is forwarded now.
  pub(crate) fn register(&self, pid: u32) {
    self.state.child.store(pid, Ordering::SeqCst);
    if self.is_requested() {
      forward(pid);
    }
  }

  pub(crate) fn clear(&self) {
    self.state.child.store(0, Ordering::SeqCst);
  }
}

#[cfg(unix)]
fn forward(pid: u32) {
  use nix::sys::signal::{Signal, killpg};
  use nix::unistd::Pid;

  let Ok(raw) = i32::try_from(pid) else {
    return;
  };
  match killpg(Pid::from_raw(raw), Signal::SIGINT) {
    Ok(()) => debug!(pid, "forwarded interrupt to child process group"),
    Err(err) => debug!(pid, error = %err, "could not forward interrupt"),
  }
}

// Console control events already reach every process attached to the console.
#[cfg(not(unix))]
fn forward(pid: u32) {
  debug!(pid, "interrupt requested");
}
