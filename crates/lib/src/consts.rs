/// Name of the scratch directory created under the invocation directory.
pub const SCRATCH_DIR_NAME: &str = "build";

/// Environment variable selecting the CMake executable.
pub const CMAKE_ENV: &str = "COMPILE_TIMER_CMAKE";
pub const DEFAULT_CMAKE: &str = "cmake";

pub const SETTINGS_SECTION: &str = "settings";
pub const CMAKE_KEY: &str = "cmake";
pub const BUILD_KEY: &str = "build";
/// Section whose keys fill in for keys missing from `[settings]`.
pub const DEFAULT_SECTION: &str = "DEFAULT";
