use crate::platform::Os;
use crate::process::ProcessError;

/// Command-line dialect a shell understands.
///
/// Decides both how arguments are quoted and which builtins the clean and
/// create steps use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
  /// `sh`-compatible: `rm -r`, `mkdir -p`.
  Posix,
  /// `cmd.exe`: `rmdir /S /Q`, `mkdir`.
  Cmd,
}

impl ShellKind {
  pub fn host_default(os: Os) -> Self {
    if os.is_windows() { ShellKind::Cmd } else { ShellKind::Posix }
  }
}

/// The shell used to run command lines: program plus the flags that precede the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
  pub program: String,
  pub args: Vec<String>,
  pub kind: ShellKind,
}

impl Shell {
  /// `/bin/sh -c` on POSIX hosts, `cmd.exe /C` on Windows.
  ///
  /// `$SHELL` is deliberately ignored because interactive shells may source
  /// profile files.
  pub fn host_default(os: Os) -> Self {
    match ShellKind::host_default(os) {
      ShellKind::Cmd => Self {
        program: "cmd.exe".to_string(),
        args: vec!["/C".to_string()],
        kind: ShellKind::Cmd,
      },
      ShellKind::Posix => Self {
        program: "/bin/sh".to_string(),
        args: vec!["-c".to_string()],
        kind: ShellKind::Posix,
      },
    }
  }

  /// Pick the shell for the host, or honour an explicit override.
  ///
  /// PowerShell is rejected: none of the planned command forms are valid there.
  pub fn detect(override_shell: Option<&str>, os: Os) -> Result<Self, ProcessError> {
    let Some(shell) = override_shell else {
      return Ok(Self::host_default(os));
    };

    // Split on both separators so Windows paths are recognised on any host.
    let name = shell.rsplit(['/', '\\']).next().unwrap_or(shell).to_lowercase();
    let stem = name.strip_suffix(".exe").unwrap_or(&name);

    match stem {
      "powershell" | "pwsh" => Err(ProcessError::UnsupportedShell(shell.to_string())),
      "cmd" => Ok(Self {
        program: shell.to_string(),
        args: vec!["/C".to_string()],
        kind: ShellKind::Cmd,
      }),
      _ => Ok(Self {
        program: shell.to_string(),
        args: vec!["-c".to_string()],
        kind: ShellKind::Posix,
      }),
    }
  }
}
