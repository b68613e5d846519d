//! Host queries: available parallelism and the CMake executable to run.

use std::ffi::OsString;

use crate::consts::{CMAKE_ENV, DEFAULT_CMAKE};

/// Returns the number of logical CPUs, used as the `-j` value for the build step.
pub fn parallelism() -> usize {
  num_cpus::get().max(1)
}

/// Returns the CMake executable to invoke.
///
/// `COMPILE_TIMER_CMAKE` takes precedence when set to a non-empty value,
/// otherwise `cmake` is resolved through `PATH`.
pub fn cmake_program() -> OsString {
  std::env::var_os(CMAKE_ENV)
    .filter(|value| !value.is_empty())
    .unwrap_or_else(|| OsString::from(DEFAULT_CMAKE))
}
