use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::ShellKind;

/// Pipeline step an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Clean,
  Create,
  Configure,
  Build,
}

impl Step {
  pub fn as_str(&self) -> &'static str {
    match self {
      Step::Clean => "clean",
      Step::Create => "create",
      Step::Configure => "configure",
      Step::Build => "build",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One external command, with the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub step: Step,
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(step: Step, program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      step,
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Render as a single command line for a shell of the given kind.
  ///
  /// Arguments containing whitespace or shell metacharacters are double-quoted.
  pub fn command_line(&self, kind: ShellKind) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .map(|arg| match kind {
        ShellKind::Posix => quote_posix(arg),
        ShellKind::Cmd => quote_cmd(arg),
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// `%` expands variables even inside quotes, so it is emitted as `^%` outside them.
fn quote_cmd(arg: &str) -> String {
  if arg.is_empty() {
    return "\"\"".to_string();
  }
  arg.split('%').map(quote_cmd_segment).collect::<Vec<_>>().join("^%")
}

fn quote_cmd_segment(segment: &str) -> String {
  // cmd.exe has no escape character inside quotes; backslashes are path separators.
  let needs_quotes = segment
    .chars()
    .any(|c| c.is_whitespace() || matches!(c, '"' | '&' | '|' | '<' | '>' | '(' | ')' | '^'));
  if !needs_quotes {
    return segment.to_string();
  }
  format!("\"{}\"", segment.replace('"', "\"\""))
}

fn quote_posix(arg: &str) -> String {
  const SPECIAL: &[char] = &['"', '\'', '$', '`', '\\', '&', '|', ';', '<', '>', '(', ')', '*', '?', '#', '~'];
  let needs_quotes = arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || SPECIAL.contains(&c));
  if !needs_quotes {
    return arg.to_string();
  }
  let mut quoted = String::with_capacity(arg.len() + 2);
  quoted.push('"');
  for c in arg.chars() {
    if matches!(c, '"' | '\\' | '$' | '`') {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  quoted
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
  /// Exit code, `None` if the process was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
  /// The shell could not be started.
  #[error("failed to spawn '{command}': {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// The command ran and exited unsuccessfully.
  #[error("command failed with {}: {command}", exit_label(.code))]
  Failed {
    command: String,
    code: Option<i32>,
    stdout: String,
    stderr: String,
  },

  /// The configured shell cannot run the planned command forms.
  #[error("unsupported shell '{0}': use cmd.exe or a POSIX sh")]
  UnsupportedShell(String),
}

fn exit_label(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "signal".to_string(),
  }
}

impl ProcessError {
  /// Captured stderr of a failed command, if it got far enough to produce any.
  pub fn stderr(&self) -> Option<&str> {
    match self {
      ProcessError::Failed { stderr, .. } if !stderr.is_empty() => Some(stderr),
      _ => None,
    }
  }

  /// Captured stdout of a failed command.
  pub fn stdout(&self) -> Option<&str> {
    match self {
      ProcessError::Failed { stdout, .. } if !stdout.is_empty() => Some(stdout),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_args_are_not_quoted() {
    let inv = Invocation::new(Step::Build, "cmake", "/src").args(["--build", "/src/build/Unix_Makefiles"]);
    assert_eq!(inv.command_line(ShellKind::Posix), "cmake --build /src/build/Unix_Makefiles");
  }

  #[test]
  fn generator_name_is_quoted() {
    let inv = Invocation::new(Step::Configure, "cmake", "/src").args(["-G", "Unix Makefiles"]);
    assert_eq!(inv.command_line(ShellKind::Posix), r#"cmake -G "Unix Makefiles""#);
    assert_eq!(inv.command_line(ShellKind::Cmd), r#"cmake -G "Unix Makefiles""#);
  }

  #[test]
  fn posix_quoting_escapes_specials() {
    let inv = Invocation::new(Step::Clean, "rm", "/").args(["-r", "/tmp/a $b"]);
    assert_eq!(inv.command_line(ShellKind::Posix), r#"rm -r "/tmp/a \$b""#);
  }

  #[test]
  fn windows_paths_keep_backslashes() {
    let inv = Invocation::new(Step::Create, "mkdir", "C:\\src").arg("C:\\src\\build\\Unix_Makefiles");
    assert_eq!(inv.command_line(ShellKind::Cmd), "mkdir C:\\src\\build\\Unix_Makefiles");
  }

  #[test]
  fn empty_arg_is_preserved() {
    let inv = Invocation::new(Step::Build, "echo", "/").arg("");
    assert_eq!(inv.command_line(ShellKind::Posix), r#"echo """#);
  }

  #[test]
  fn failed_error_exposes_stderr() {
    let err = ProcessError::Failed {
      command: "cmake --build x".into(),
      code: Some(2),
      stdout: String::new(),
      stderr: "no Makefile".into(),
    };
    assert_eq!(err.stderr(), Some("no Makefile"));
    assert_eq!(err.stdout(), None);
    assert_eq!(err.to_string(), "command failed with exit code 2: cmake --build x");
  }

  #[test]
  fn failed_error_without_code_reports_signal() {
    let err = ProcessError::Failed {
      command: "cmake --build x".into(),
      code: None,
      stdout: "[ 50%] Building C object".into(),
      stderr: String::new(),
    };
    assert_eq!(err.stdout(), Some("[ 50%] Building C object"));
    assert_eq!(err.stderr(), None);
    assert_eq!(err.to_string(), "command failed with signal: cmake --build x");
  }

  #[test]
  fn cmd_escapes_percent_outside_quotes() {
    let inv = Invocation::new(Step::Create, "mkdir", "C:\\").arg("C:\\100%\\build");
    assert_eq!(inv.command_line(ShellKind::Cmd), "mkdir C:\\100^%\\build");

    let inv = Invocation::new(Step::Create, "mkdir", "C:\\").arg("C:\\my %USERNAME% dir");
    assert_eq!(inv.command_line(ShellKind::Cmd), r#"mkdir "C:\my "^%USERNAME^%" dir""#);
  }

  #[test]
  fn posix_leaves_percent_alone() {
    let inv = Invocation::new(Step::Create, "mkdir", "/").args(["-p", "/tmp/100%"]);
    assert_eq!(inv.command_line(ShellKind::Posix), "mkdir -p /tmp/100%");
  }
}
