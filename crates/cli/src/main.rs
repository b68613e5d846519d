use std::path::PathBuf;

use clap::Parser;
use compile_timer_lib::execute::Interrupt;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::cmd_time;
use output::print_error;

/// compile-timer - Time how long CMake takes to build a target
///
/// Generates the project into a scratch `./build` directory, builds the target
/// with one job per logical CPU, prints the build time and removes the scratch
/// directory again.
#[derive(Parser)]
#[command(name = "compile-timer")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Path to the CMake project folder (passed to cmake from inside ./build)
  project_folder: PathBuf,

  /// Build target to time
  target: String,

  /// INI file with a [settings] section holding `cmake` and `build` arguments
  config: Option<PathBuf>,

  /// Further arguments are accepted and ignored
  #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
  ignored: Vec<String>,
}

fn main() {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // --help and --version land here too and are not failures
      let _ = err.print();
      std::process::exit(if err.use_stderr() { 1 } else { 0 });
    }
  };

  // Initialize logging; RUST_LOG wins over --verbose
  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if !cli.ignored.is_empty() {
    debug!(args = ?cli.ignored, "ignoring extra arguments");
  }

  // Ctrl-C stops the running cmake; the run then unwinds normally so the
  // scratch directory is removed.
  let interrupt = Interrupt::new();
  let handler = interrupt.clone();
  if let Err(err) = ctrlc::set_handler(move || handler.trigger()) {
    warn!(error = %err, "failed to install Ctrl-C handler");
  }

  if let Err(err) = cmd_time(&cli.project_folder, &cli.target, cli.config.as_deref(), interrupt) {
    print_error(&format!("{:#}", err));
    std::process::exit(cmd::exit_code(&err));
  }
}
