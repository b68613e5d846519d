//! Scratch directory for a single timed build.
//!
//! [`ScratchWorkspace::acquire`] claims `<base>/build`, creating it when absent,
//! and refuses to touch a directory that already has content. The returned
//! guard removes the directory recursively when dropped, so cleanup happens on
//! every exit path once acquisition succeeded.
//!
//! The process working directory is never changed; callers run subprocesses
//! with [`ScratchWorkspace::path`] as their explicit working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::SCRATCH_DIR_NAME;

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("{} is not empty, please empty it first", .path.display())]
  NotEmpty { path: PathBuf },

  #[error("{} exists and is not a directory", .path.display())]
  NotADirectory { path: PathBuf },

  #[error("Failed to inspect {}", .path.display())]
  Inspect {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to create {}", .path.display())]
  Create {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Guard over the scratch build directory.
#[derive(Debug)]
pub struct ScratchWorkspace {
  path: PathBuf,
}

impl ScratchWorkspace {
  /// Claim `<base>/build` for the duration of the guard.
  ///
  /// An existing empty directory is reused. Nothing is created or removed when
  /// acquisition fails.
  pub fn acquire(base: &Path) -> Result<Self, WorkspaceError> {
    let path = base.join(SCRATCH_DIR_NAME);

    match fs::metadata(&path) {
      Ok(meta) if !meta.is_dir() => return Err(WorkspaceError::NotADirectory { path }),
      Ok(_) => {
        let mut entries = fs::read_dir(&path).map_err(|source| WorkspaceError::Inspect {
          path: path.clone(),
          source,
        })?;
        if entries.next().is_some() {
          return Err(WorkspaceError::NotEmpty { path });
        }
        debug!(path = %path.display(), "reusing empty scratch workspace");
      }
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        fs::create_dir(&path).map_err(|source| WorkspaceError::Create {
          path: path.clone(),
          source,
        })?;
        debug!(path = %path.display(), "created scratch workspace");
      }
      Err(source) => return Err(WorkspaceError::Inspect { path, source }),
    }

    Ok(Self { path })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Drop for ScratchWorkspace {
  fn drop(&mut self) {
    match fs::remove_dir_all(&self.path) {
      Ok(()) => debug!(path = %self.path.display(), "removed scratch workspace"),
      Err(err) => warn!(path = %self.path.display(), error = %err, "failed to remove scratch workspace"),
    }
  }
}
