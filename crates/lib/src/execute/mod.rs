//! Subprocess execution.
//!
//! An [`Invocation`] describes one CMake call; a [`CommandRunner`] executes it
//! in an explicit working directory. [`SystemRunner`] spawns real processes
//! with their output discarded, and an [`Interrupt`] stops it on Ctrl-C.

mod cmd;
mod interrupt;
mod types;

pub use cmd::SystemRunner;
pub use interrupt::Interrupt;
pub use types::*;
