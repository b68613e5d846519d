//! Argument overrides loaded from an INI settings file.
//!
//! The file carries a single `[settings]` section with two keys, each a
//! whitespace-separated list of extra arguments:
//!
//! ```ini
//! [settings]
//! cmake = -DCMAKE_BUILD_TYPE=Release -GNinja
//! build = -v
//! ```
//!
//! Both keys are required whenever a file is given. A missing section or key
//! is reported as an error instead of falling back to no overrides. Keys are
//! matched case-insensitively, a `[DEFAULT]` section supplies keys missing from
//! `[settings]`, and indented lines continue the previous value.

use std::fs;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption, Properties};
use thiserror::Error;
use tracing::debug;

use crate::consts::{BUILD_KEY, CMAKE_KEY, DEFAULT_SECTION, SETTINGS_SECTION};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file {} does not exist", .path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config file {}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: ini::ParseError,
  },

  #[error("config file {} has no [{section}] section", .path.display())]
  MissingSection { path: PathBuf, section: &'static str },

  #[error("config file {} is missing key '{key}' in [{section}]", .path.display())]
  MissingKey {
    path: PathBuf,
    section: &'static str,
    key: &'static str,
  },
}

/// Extra arguments appended to the configure and build invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
  /// Appended to `cmake <project>`.
  pub cmake_args: Vec<String>,
  /// Appended to `cmake --build . --target <target> -j <n>`.
  pub build_args: Vec<String>,
}

impl Overrides {
  /// Load overrides from the settings file at `path`.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::NotFound`] if the file does not exist, and a parse
  /// or missing-entry error if it is not a valid settings file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      return Err(ConfigError::NotFound {
        path: path.to_path_buf(),
      });
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let ini = Ini::load_from_str_opt(&join_continuation_lines(&text), parse_options()).map_err(|source| {
      ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      }
    })?;

    let overrides = Self::from_ini(&ini, path)?;
    debug!(
      path = %path.display(),
      cmake_args = ?overrides.cmake_args,
      build_args = ?overrides.build_args,
      "loaded overrides"
    );
    Ok(overrides)
  }

  /// Load overrides from an optional settings file; `None` yields no overrides.
  pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
    match path {
      Some(path) => Self::load(path),
      None => Ok(Self::default()),
    }
  }

  fn from_ini(ini: &Ini, path: &Path) -> Result<Self, ConfigError> {
    let settings = ini
      .section(Some(SETTINGS_SECTION))
      .ok_or_else(|| ConfigError::MissingSection {
        path: path.to_path_buf(),
        section: SETTINGS_SECTION,
      })?;
    let defaults = ini.section(Some(DEFAULT_SECTION));

    let lookup = |key: &'static str| {
      find_key(settings, key)
        .or_else(|| defaults.and_then(|props| find_key(props, key)))
        .map(split_args)
        .ok_or_else(|| ConfigError::MissingKey {
          path: path.to_path_buf(),
          section: SETTINGS_SECTION,
          key,
        })
    };

    Ok(Self {
      cmake_args: lookup(CMAKE_KEY)?,
      build_args: lookup(BUILD_KEY)?,
    })
  }
}

/// Case-insensitive key lookup; the last occurrence wins.
fn find_key<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
  props
    .iter()
    .filter(|(name, _)| name.eq_ignore_ascii_case(key))
    .map(|(_, value)| value)
    .last()
}

// Values are taken literally: backslashes in Windows paths must survive.
fn parse_options() -> ParseOption {
  ParseOption {
    enabled_quote: false,
    enabled_escape: false,
    ..ParseOption::default()
  }
}

/// Fold indented continuation lines into the value they continue.
///
/// A non-blank line indented deeper than the preceding `key = value` line
/// belongs to that value. Blank and comment lines in between are kept and do
/// not end the value. Joining with a space is lossless here because values are
/// split on whitespace afterwards.
fn join_continuation_lines(text: &str) -> String {
  let mut lines: Vec<String> = Vec::new();
  // (index into `lines`, indentation) of the last key line
  let mut open_value: Option<(usize, usize)> = None;

  for line in text.lines() {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
      lines.push(line.to_string());
      continue;
    }

    let indent = line.len() - line.trim_start().len();
    match open_value {
      Some((index, key_indent)) if indent > key_indent => {
        let value = &mut lines[index];
        value.push(' ');
        value.push_str(trimmed);
      }
      _ => {
        open_value = (!trimmed.starts_with('[')).then_some((lines.len(), indent));
        lines.push(trimmed.to_string());
      }
    }
  }

  lines.join("\n")
}

/// Split a settings value into arguments.
///
/// One matching pair of surrounding quotes is dropped first, so
/// `"-DFOO=1 -DBAR=2"` and `-DFOO=1 -DBAR=2` yield the same arguments.
pub fn split_args(value: &str) -> Vec<String> {
  strip_quotes(value.trim())
    .split_whitespace()
    .map(str::to_owned)
    .collect()
}

// Unlike Python's configparser, which keeps quote characters verbatim and
// would turn `"-DFOO=1 -DBAR=2"` into `"-DFOO=1` and `-DBAR=2"`, a wrapping
// pair is removed so quoted and unquoted files behave the same.
fn strip_quotes(value: &str) -> &str {
  for quote in ['"', '\''] {
    if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
      return &value[1..value.len() - 1];
    }
  }
  value
}
