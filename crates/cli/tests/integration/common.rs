//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for cmake.
///
/// Appends one line per call to `$FAKE_CMAKE_LOG`: the physical working
/// directory followed by each argument, tab separated. The configure step drops
/// a `CMakeCache.txt` that the build step insists on finding. Exit codes and
/// delays are controlled through `FAKE_CMAKE_*` variables.
const FAKE_CMAKE: &str = r#"#!/bin/sh
{
  printf '%s' "$(pwd -P)"
  for arg in "$@"; do printf '\t%s' "$arg"; done
  printf '\n'
} >> "$FAKE_CMAKE_LOG"
echo "FAKE_CMAKE_NOISE on stdout"
echo "FAKE_CMAKE_NOISE on stderr" >&2
if [ "$1" = "--build" ]; then
  [ -f CMakeCache.txt ] || exit 99
  if [ -n "$FAKE_CMAKE_BUILD_SLEEP" ]; then sleep "$FAKE_CMAKE_BUILD_SLEEP"; fi
  exit "${FAKE_CMAKE_BUILD_EXIT:-0}"
fi
touch CMakeCache.txt
if [ -n "$FAKE_CMAKE_CONFIGURE_SLEEP" ]; then sleep "$FAKE_CMAKE_CONFIGURE_SLEEP"; fi
exit "${FAKE_CMAKE_CONFIGURE_EXIT:-0}"
"#;

/// One recorded cmake call.
#[derive(Debug, Clone)]
pub struct FakeCall {
  pub cwd: PathBuf,
  pub args: Vec<String>,
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory that serves as the invocation
/// directory, with a `proj` folder, the fake cmake and its call log.
pub struct TestEnv {
  pub temp: TempDir,
  tools: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("proj")).unwrap();

    // Kept outside the invocation directory so it never counts as content there
    let tools = TempDir::new().unwrap();
    let script = tools.path().join("cmake");
    std::fs::write(&script, FAKE_CMAKE).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    Self { temp, tools }
  }

  /// Write a file relative to the invocation directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// The scratch directory the binary manages.
  pub fn scratch_path(&self) -> PathBuf {
    self.temp.path().join("build")
  }

  /// Canonical scratch path, as the fake cmake reports it.
  pub fn canonical_scratch_path(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap().join("build")
  }

  fn log_path(&self) -> PathBuf {
    self.tools.path().join("calls.log")
  }

  /// Calls recorded by the fake cmake, in order.
  pub fn calls(&self) -> Vec<FakeCall> {
    let Ok(log) = std::fs::read_to_string(self.log_path()) else {
      return Vec::new();
    };
    log
      .lines()
      .map(|line| {
        let mut fields = line.split('\t');
        let cwd = PathBuf::from(fields.next().unwrap());
        FakeCall {
          cwd,
          args: fields.map(str::to_owned).collect(),
        }
      })
      .collect()
  }

  /// Get a pre-configured Command for the compile-timer binary.
  ///
  /// Runs inside the temp directory with:
  /// - `COMPILE_TIMER_CMAKE`: the fake cmake script
  /// - `FAKE_CMAKE_LOG`: where the fake cmake records its calls
  pub fn timer_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("compile-timer");
    cmd.current_dir(self.temp.path());
    cmd.env("COMPILE_TIMER_CMAKE", self.tools.path().join("cmake"));
    cmd.env("FAKE_CMAKE_LOG", self.log_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

impl TestEnv {
  /// Same setup as [`TestEnv::timer_cmd`], as a plain process that can be
  /// signalled while it runs.
  pub fn timer_process(&self) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_compile-timer"));
    cmd.current_dir(self.temp.path());
    cmd.env("COMPILE_TIMER_CMAKE", self.tools.path().join("cmake"));
    cmd.env("FAKE_CMAKE_LOG", self.log_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

/// Extract the seconds value from the `Time elapsed: X seconds` line.
pub fn elapsed_seconds(stdout: &[u8]) -> f64 {
  let stdout = String::from_utf8_lossy(stdout);
  let line = stdout
    .lines()
    .find(|line| line.starts_with("Time elapsed: "))
    .unwrap_or_else(|| panic!("no timing line in output:\n{}", stdout));
  line
    .trim_start_matches("Time elapsed: ")
    .trim_end_matches(" seconds")
    .parse()
    .unwrap_or_else(|e| panic!("bad timing line {:?}: {}", line, e))
}
