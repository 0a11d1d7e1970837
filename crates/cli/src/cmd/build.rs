//! Implementation of a real run: clean, create, configure and build.

use anyhow::{Context, Result};

use dpabuild_lib::orchestrate::{BuildError, BuildReport, Orchestrator, StepRecord};
use dpabuild_lib::process::{ProcessError, ShellRunner};

use super::LaunchOptions;
use crate::output::{format_duration, print_command, print_success};

pub fn cmd_build(opts: &LaunchOptions) -> Result<()> {
  let (target, ctx) = opts.resolve()?;
  let orchestrator = Orchestrator::new(ShellRunner::new(ctx.shell.clone()), ctx);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  match rt.block_on(orchestrator.build_with_progress(&target, print_step)) {
    Ok(report) => {
      print_summary(&report);
      Ok(())
    }
    Err(err) => {
      if let BuildError::StepFailed { source, .. } = &err {
        print_failed_step(source);
      }
      Err(err).with_context(|| format!("Build for '{}' failed", target.generator))
    }
  }
}

fn print_step(record: &StepRecord) {
  print_command(&record.command);
  print_stdout(&record.output.stdout);
}

/// Output of the step that stopped the pipeline.
fn print_failed_step(err: &ProcessError) {
  if let ProcessError::Failed { command, .. } = err {
    print_command(command);
  }
  if let Some(stdout) = err.stdout() {
    print_stdout(stdout);
  }
  if let Some(stderr) = err.stderr() {
    eprintln!("{}", stderr.trim_end());
  }
}

fn print_stdout(stdout: &str) {
  let stdout = stdout.trim_end();
  if !stdout.is_empty() {
    println!("{}", stdout);
  }
}

fn print_summary(report: &BuildReport) {
  println!();
  print_success(&format!(
    "Built {} ({}) in {}",
    report.build_path.display(),
    report.target.generator_name,
    format_duration(report.elapsed)
  ));
}
