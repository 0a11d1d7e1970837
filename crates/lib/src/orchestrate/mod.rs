//! Clean, create, configure, build.
//!
//! [`plan`] turns a resolved [`BuildTarget`] into the four invocations of a
//! build, and [`Orchestrator`] runs them strictly in order:
//!
//! 1. **clean** - recursively remove `<root>/<build_dir>`; tolerated when it
//!    fails because the directory did not exist
//! 2. **create** - recreate the build directory, parents included
//! 3. **configure** - run CMake inside the build directory against `<root>`,
//!    passing the sibling dependency directories as `<name>_DIR:PATH`
//! 4. **build** - `cmake --build <root>/<build_dir>`
//!
//! Any other failure aborts the pipeline and names the failed step. The
//! launcher's own working directory is never changed; each invocation carries
//! its directory explicitly.

mod types;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::platform::Os;
use crate::platform::paths::resolve_against;
use crate::process::{CommandOutput, Invocation, ProcessError, Runner, ShellKind, Step};
use crate::target::{BuildTarget, resolve};

pub use types::{BuildContext, BuildError, BuildReport, StepRecord};

/// Plan the invocations for `target`, in execution order.
pub fn plan(target: &BuildTarget, ctx: &BuildContext) -> Vec<Invocation> {
  let build_path = ctx.build_path(target);
  let build_arg = build_path.display().to_string();

  let (clean, create) = match ctx.shell.kind {
    // cmd.exe's mkdir creates intermediate directories on its own.
    ShellKind::Cmd => (
      Invocation::new(Step::Clean, "rmdir", &ctx.root).args(["/S", "/Q", build_arg.as_str()]),
      Invocation::new(Step::Create, "mkdir", &ctx.root).arg(&build_arg),
    ),
    ShellKind::Posix => (
      Invocation::new(Step::Clean, "rm", &ctx.root).args(["-r", build_arg.as_str()]),
      Invocation::new(Step::Create, "mkdir", &ctx.root).args(["-p", build_arg.as_str()]),
    ),
  };

  let mut configure =
    Invocation::new(Step::Configure, &ctx.cmake, &build_path).args(["-G", target.generator_name.as_str()]);
  for dep in &target.dependencies() {
    let path = resolve_against(&ctx.root, &dep.path);
    configure = configure.arg(format!("-D{}:PATH={}", dep.cmake_var(), path.display()));
  }
  configure = configure.arg(ctx.root.display().to_string());
  configure = match (target.debug_flag(), ctx.os) {
    (Some(_), Os::Windows) => {
      warn!(
        generator = %target.generator,
        "debug build type is not passed to the configure step on Windows hosts"
      );
      configure
    }
    (Some(flag), _) => configure.arg(flag),
    (None, _) => configure,
  };

  let build = Invocation::new(Step::Build, &ctx.cmake, &ctx.root).args(["--build", build_arg.as_str()]);

  vec![clean, create, configure, build]
}

/// Drives the pipeline through a [`Runner`].
#[derive(Debug)]
pub struct Orchestrator<R> {
  runner: R,
  ctx: BuildContext,
}

impl<R: Runner> Orchestrator<R> {
  pub fn new(runner: R, ctx: BuildContext) -> Self {
    Self { runner, ctx }
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Resolve `identifier` and build it.
  ///
  /// An unknown identifier fails before anything touches the filesystem.
  pub async fn launch(&self, identifier: &str, debug: bool) -> Result<BuildReport, BuildError> {
    let target = resolve(identifier, debug)?;
    self.build(&target).await
  }

  /// Run clean, create, configure and build for `target`.
  pub async fn build(&self, target: &BuildTarget) -> Result<BuildReport, BuildError> {
    self.build_with_progress(target, |_| {}).await
  }

  /// Like [`build`](Self::build), calling `on_step` as soon as each step finishes.
  ///
  /// A failing step is not reported through `on_step`; its output travels in
  /// the returned [`BuildError::StepFailed`].
  pub async fn build_with_progress<F>(&self, target: &BuildTarget, mut on_step: F) -> Result<BuildReport, BuildError>
  where
    F: FnMut(&StepRecord),
  {
    let started = Instant::now();
    let build_path = self.ctx.build_path(target);
    info!(
      generator = %target.generator,
      build_dir = %build_path.display(),
      debug = target.debug,
      "starting build"
    );

    let mut steps = Vec::with_capacity(4);
    for invocation in plan(target, &self.ctx) {
      let command = invocation.command_line(self.ctx.shell.kind);
      let output = match self.runner.run(&invocation).await {
        Ok(output) => output,
        Err(ProcessError::Failed {
          code, stdout, stderr, ..
        }) if invocation.step == Step::Clean => {
          if tokio::fs::try_exists(&build_path).await? {
            return Err(BuildError::StaleBuildDir { path: build_path });
          }
          debug!(code = ?code, "nothing to clean");
          CommandOutput { code, stdout, stderr }
        }
        Err(source) => {
          return Err(BuildError::StepFailed {
            step: invocation.step,
            source,
          });
        }
      };
      let record = StepRecord {
        step: invocation.step,
        command,
        output,
      };
      on_step(&record);
      steps.push(record);
    }

    let elapsed = started.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "build finished");

    Ok(BuildReport {
      target: target.clone(),
      build_path,
      steps,
      elapsed,
    })
  }
}
