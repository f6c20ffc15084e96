//! Test case lifecycle states.
//!
//! ```text
//! Pending → Running → Success | Warning | Failed | Skipped
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result, SKIP_CODES, WARNING_CODES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
  #[default]
  Pending,
  Running,
  Success,
  Warning,
  Failed,
  Skipped,
}

impl TestStatus {
  pub const ALL: [TestStatus; 6] = [
    Self::Pending,
    Self::Running,
    Self::Success,
    Self::Warning,
    Self::Failed,
    Self::Skipped,
  ];

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Success | Self::Warning | Self::Failed | Self::Skipped)
  }

  /// Move to `next`, rejecting anything but `Pending → Running → terminal`.
  pub fn transition(self, next: TestStatus) -> Result<TestStatus> {
    match (self, next) {
      (Self::Pending, Self::Running) => Ok(next),
      (Self::Running, next) if next.is_terminal() => Ok(next),
      _ => Err(ProcessorError::invalid_state(format!(
        "illegal status transition {self} -> {next}"
      ))),
    }
  }

  /// Terminal status for a failed run with the given error code.
  pub fn classify(code: i32) -> TestStatus {
    if SKIP_CODES.contains(&code) {
      Self::Skipped
    } else if WARNING_CODES.contains(&code) {
      Self::Warning
    } else {
      Self::Failed
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Running => "RUNNING",
      Self::Success => "SUCCESS",
      Self::Warning => "WARNING",
      Self::Failed => "FAILED",
      Self::Skipped => "SKIPPED",
    }
  }
}

impl std::fmt::Display for TestStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}
