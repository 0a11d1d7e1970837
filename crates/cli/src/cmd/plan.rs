//! Implementation of `--dry-run`: print the commands a build would run.

use anyhow::Result;
use serde::Serialize;

use dpabuild_lib::orchestrate::plan;
use dpabuild_lib::process::Invocation;
use dpabuild_lib::target::BuildTarget;

use super::LaunchOptions;
use crate::output::{OutputFormat, print_command, print_info, print_json, print_stat};

#[derive(Serialize)]
struct PlanOutput<'a> {
  target: &'a BuildTarget,
  root: String,
  commands: Vec<PlannedCommand<'a>>,
}

#[derive(Serialize)]
struct PlannedCommand<'a> {
  #[serde(flatten)]
  invocation: &'a Invocation,
  command_line: String,
}

pub fn cmd_plan(opts: &LaunchOptions, format: OutputFormat) -> Result<()> {
  let (target, ctx) = opts.resolve()?;
  let invocations = plan(&target, &ctx);

  if format.is_json() {
    return print_json(&PlanOutput {
      target: &target,
      root: ctx.root.display().to_string(),
      commands: invocations
        .iter()
        .map(|invocation| PlannedCommand {
          invocation,
          command_line: invocation.command_line(ctx.shell.kind),
        })
        .collect(),
    });
  }

  print_info(&format!("Dry run - {} would run:", target.generator_name));
  print_stat("Source", &ctx.root.display().to_string());
  print_stat("Build dir", &ctx.build_path(&target).display().to_string());
  println!();
  for invocation in &invocations {
    print_command(&invocation.command_line(ctx.shell.kind));
    print_stat("in", &invocation.cwd.display().to_string());
  }

  Ok(())
}
