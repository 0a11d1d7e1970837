//! External command execution.
//!
//! Every step of the pipeline goes through a [`Runner`]. The production
//! [`ShellRunner`] hands the rendered command line to the platform shell with an
//! explicit working directory, captures both output streams, and turns a
//! non-zero exit into [`ProcessError::Failed`].

mod shell;
mod types;

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

pub use shell::{Shell, ShellKind};
pub use types::{CommandOutput, Invocation, ProcessError, Step};

/// Executes invocations one at a time.
pub trait Runner {
  /// Run `invocation` to completion.
  ///
  /// Returns the captured output on a zero exit status, an error otherwise.
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<CommandOutput, ProcessError>> + Send;
}

/// Runs invocations through the platform shell.
#[derive(Debug, Clone)]
pub struct ShellRunner {
  shell: Shell,
}

impl ShellRunner {
  pub fn new(shell: Shell) -> Self {
    Self { shell }
  }
}

impl Runner for ShellRunner {
  async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    let line = invocation.command_line(self.shell.kind);
    info!(step = %invocation.step, cmd = %line, "executing command");

    let mut command = Command::new(&self.shell.program);
    command.args(&self.shell.args);
    push_command_line(&mut command, &line, self.shell.kind);
    command
      .current_dir(&invocation.cwd)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    debug!(shell = %self.shell.program, working_dir = ?invocation.cwd, "spawning process");

    let output = command.output().await.map_err(|source| ProcessError::Spawn {
      command: line.clone(),
      source,
    })?;

    let result = CommandOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout.trim_end(), "command stdout");
    }

    if !result.success() {
      if !result.stderr.is_empty() {
        warn!(stderr = %result.stderr.trim_end(), "command stderr");
      }
      return Err(ProcessError::Failed {
        command: line,
        code: result.code,
        stdout: result.stdout,
        stderr: result.stderr,
      });
    }

    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim_end(), "command stderr");
    }

    Ok(result)
  }
}

/// Append the command line so the shell receives it verbatim.
#[cfg(windows)]
fn push_command_line(command: &mut Command, line: &str, kind: ShellKind) {
  match kind {
    // cmd.exe does its own parsing; the default MSVC-style escaping would mangle quotes.
    ShellKind::Cmd => {
      command.raw_arg(line);
    }
    ShellKind::Posix => {
      command.arg(line);
    }
  }
}

#[cfg(not(windows))]
fn push_command_line(command: &mut Command, line: &str, _kind: ShellKind) {
  command.arg(line);
}
