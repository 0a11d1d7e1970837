//! Test utilities for dpabuild-lib.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::process::{CommandOutput, Invocation, ProcessError, Runner, Step};

/// A [`Runner`] that records invocations instead of spawning anything.
///
/// Steps succeed with empty output unless configured to fail with
/// [`RecordingRunner::fail_step`].
#[derive(Debug, Default)]
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  failures: HashMap<Step, (i32, String)>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make `step` exit with `code` and `stderr`.
  pub fn fail_step(mut self, step: Step, code: i32, stderr: &str) -> Self {
    self.failures.insert(step, (code, stderr.to_string()));
    self
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  pub fn steps(&self) -> Vec<Step> {
    self.invocations().iter().map(|i| i.step).collect()
  }
}

impl Runner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    self.calls.lock().unwrap().push(invocation.clone());

    match self.failures.get(&invocation.step) {
      Some((code, stderr)) => Err(ProcessError::Failed {
        command: invocation.program.clone(),
        code: Some(*code),
        stdout: String::new(),
        stderr: stderr.clone(),
      }),
      None => Ok(CommandOutput {
        code: Some(0),
        ..Default::default()
      }),
    }
  }
}
