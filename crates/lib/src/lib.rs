//! compile-timer-lib: Core logic for timing CMake target builds
//!
//! This crate provides the pieces the `compile-timer` binary is assembled from:
//! - `config`: argument overrides read from an INI settings file
//! - `workspace`: the scratch `build` directory guard
//! - `execute`: subprocess invocations and the runner seam
//! - `timer`: the configure-then-timed-build sequence

pub mod config;
pub mod consts;
pub mod execute;
pub mod platform;
pub mod timer;
pub mod workspace;
