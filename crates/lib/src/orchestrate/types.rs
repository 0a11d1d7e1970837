use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::platform::Os;
use crate::process::{CommandOutput, ProcessError, Shell, Step};
use crate::target::{BuildTarget, TargetError};

/// Where and for which host a build is planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
  /// Source tree being configured; every path handed to a tool is resolved against it.
  pub root: PathBuf,
  pub os: Os,
  pub cmake: String,
  /// Shell the invocations are rendered for; picks the clean/create forms.
  pub shell: Shell,
}

impl BuildContext {
  /// Context using the default shell of `os`.
  pub fn new(root: impl Into<PathBuf>, os: Os, config: &BuildConfig) -> Self {
    Self {
      root: root.into(),
      os,
      cmake: config.cmake.clone(),
      shell: Shell::host_default(os),
    }
  }

  pub fn with_shell(mut self, shell: Shell) -> Self {
    self.shell = shell;
    self
  }

  /// Context for the current host, rooted at `root` made absolute.
  ///
  /// Honours the shell override in `config`.
  pub fn for_host(root: &Path, config: &BuildConfig) -> Result<Self, BuildError> {
    let root = dunce::canonicalize(root).map_err(|source| BuildError::Root {
      path: root.to_path_buf(),
      source,
    })?;
    let os = Os::current_or_posix();
    let shell = Shell::detect(config.shell.as_deref(), os).map_err(BuildError::Shell)?;
    Ok(Self::new(root, os, config).with_shell(shell))
  }

  /// Absolute build directory for `target`.
  pub fn build_path(&self, target: &BuildTarget) -> PathBuf {
    self.root.join(&target.build_dir)
  }
}

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
  pub step: Step,
  pub command: String,
  pub output: CommandOutput,
}

/// Outcome of a completed pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub target: BuildTarget,
  pub build_path: PathBuf,
  pub steps: Vec<StepRecord>,
  pub elapsed: Duration,
}

/// Errors that stop the pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Target(#[from] TargetError),

  #[error("cannot use '{}' as source root: {source}", path.display())]
  Root {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Shell(ProcessError),

  /// A step exited unsuccessfully; later steps were not run.
  #[error("{step} step failed")]
  StepFailed {
    step: Step,
    #[source]
    source: ProcessError,
  },

  /// The clean step failed and left the build directory behind.
  #[error("build directory '{}' could not be removed", path.display())]
  StaleBuildDir { path: PathBuf },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl BuildError {
  pub fn step(&self) -> Option<Step> {
    match self {
      BuildError::StepFailed { step, .. } => Some(*step),
      BuildError::StaleBuildDir { .. } => Some(Step::Clean),
      _ => None,
    }
  }
}
