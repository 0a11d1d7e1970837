//! Launcher configuration.
//!
//! Tool locations come from the environment and can be overridden from the
//! command line.

use crate::consts::{CMAKE_ENV, DEFAULT_CMAKE, SHELL_ENV};

/// External tools the orchestrator drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  /// Configuration/build tool, `cmake` unless overridden.
  pub cmake: String,
  /// Shell override; `None` selects the host default.
  pub shell: Option<String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      cmake: DEFAULT_CMAKE.to_string(),
      shell: None,
    }
  }
}

impl BuildConfig {
  /// Read `DPABUILD_CMAKE` and `DPABUILD_SHELL`, ignoring empty values.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      cmake: non_empty_var(CMAKE_ENV).unwrap_or(defaults.cmake),
      shell: non_empty_var(SHELL_ENV),
    }
  }

  pub fn with_cmake(mut self, cmake: Option<String>) -> Self {
    if let Some(cmake) = cmake {
      self.cmake = cmake;
    }
    self
  }

  pub fn with_shell(mut self, shell: Option<String>) -> Self {
    if shell.is_some() {
      self.shell = shell;
    }
    self
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
