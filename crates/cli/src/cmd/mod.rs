mod build;
mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result};

use dpabuild_lib::config::BuildConfig;
use dpabuild_lib::orchestrate::BuildContext;
use dpabuild_lib::target::{BuildTarget, parse_debug_flag, resolve};

pub use build::cmd_build;
pub use plan::cmd_plan;

/// Options shared by a real run and a dry run.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
  pub generator: String,
  pub debug: String,
  pub root: Option<PathBuf>,
  pub cmake: Option<String>,
  pub shell: Option<String>,
}

impl LaunchOptions {
  /// Resolve the target first so an unknown generator fails before anything else is looked at.
  fn resolve(&self) -> Result<(BuildTarget, BuildContext)> {
    let target = resolve(&self.generator, parse_debug_flag(&self.debug))?;

    let config = BuildConfig::from_env()
      .with_cmake(self.cmake.clone())
      .with_shell(self.shell.clone());

    let root = match &self.root {
      Some(root) => root.clone(),
      None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let ctx = BuildContext::for_host(&root, &config)?;

    Ok((target, ctx))
  }
}
