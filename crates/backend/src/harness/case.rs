//! Test case trait and the setup → run → teardown driver.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::status::TestStatus;
use crate::error::ProcessorError;

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
  #[error("Test was skipped: {0}")]
  Skipped(String),
  #[error("Test completed with warning: {0}")]
  Warning(String),
  #[error("Test failed: {0}")]
  Failed(String),
  #[error("Test exceeded its time budget of {0:?}")]
  TimedOut(Duration),
  #[error(transparent)]
  Processor(#[from] ProcessorError),
}

impl CaseError {
  pub fn code(&self) -> i32 {
    match self {
      Self::Skipped(_) => 1001,
      Self::Warning(_) => 2001,
      Self::Failed(_) => 3000,
      Self::TimedOut(_) => 3002,
      Self::Processor(e) => e.code(),
    }
  }

  pub fn failed(msg: impl Into<String>) -> Self {
    Self::Failed(msg.into())
  }
}

#[async_trait]
pub trait TestCase: Send {
  fn name(&self) -> &str;

  async fn setup(&mut self) -> Result<(), CaseError> {
    debug!(case = self.name(), "Setting up test environment");
    Ok(())
  }

  async fn run(&mut self, cancel: CancellationToken) -> Result<(), CaseError>;

  async fn teardown(&mut self) -> Result<(), CaseError> {
    debug!(case = self.name(), "Cleaning up test environment");
    Ok(())
  }

  /// Results recorded while running
  fn details(&self) -> Map<String, Value> {
    Map::new()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
  pub name: String,
  pub status: TestStatus,
  pub duration: Duration,
  pub details: Map<String, Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code: Option<i32>,
}

/// Drive a case through its lifecycle and classify the outcome.
///
/// A setup failure skips both `run` and `teardown`. A teardown failure is
/// logged and does not change the status.
pub async fn execute(case: &mut dyn TestCase, cancel: CancellationToken) -> TestReport {
  execute_within(case, cancel, None).await
}

/// Like [`execute`], with `run` limited to `budget`.
///
/// On expiry the token handed to `run` is cancelled, the run is abandoned,
/// and the case still goes through `teardown` with a `TimedOut` failure.
pub async fn execute_within(
  case: &mut dyn TestCase,
  cancel: CancellationToken,
  budget: Option<Duration>,
) -> TestReport {
  let start = Instant::now();
  let name = case.name().to_string();
  let mut status = TestStatus::Pending;
  status = advance(status, TestStatus::Running);
  info!(case = %name, "Starting test execution");

  let mut failure = None;

  match case.setup().await {
    Err(e) => {
      error!(case = %name, error = %e, "Setup failed");
      status = advance(status, TestStatus::Failed);
      failure = Some(e);
    }
    Ok(()) => {
      match run_within(case, cancel, budget).await {
        Ok(()) => {
          status = advance(status, TestStatus::Success);
          info!(case = %name, outcome = "success", "Test completed successfully");
        }
        Err(e) => {
          let next = TestStatus::classify(e.code());
          match next {
            TestStatus::Skipped => info!(case = %name, reason = %e, "Test skipped"),
            TestStatus::Warning => warn!(case = %name, warning = %e, "Test warning"),
            _ => error!(case = %name, error = %e, "Test failed"),
          }
          status = advance(status, next);
          failure = Some(e);
        }
      }

      if let Err(e) = case.teardown().await {
        warn!(case = %name, error = %e, "Cleanup warning");
      }
    }
  }

  TestReport {
    name,
    status,
    duration: start.elapsed(),
    details: case.details(),
    code: failure.as_ref().map(CaseError::code),
    error: failure.map(|e| e.to_string()),
  }
}

async fn run_within(
  case: &mut dyn TestCase,
  cancel: CancellationToken,
  budget: Option<Duration>,
) -> Result<(), CaseError> {
  let Some(budget) = budget else {
    return case.run(cancel).await;
  };

  let run_cancel = cancel.child_token();
  match tokio::time::timeout(budget, case.run(run_cancel.clone())).await {
    Ok(result) => result,
    Err(_) => {
      run_cancel.cancel();
      Err(CaseError::TimedOut(budget))
    }
  }
}

// The driver only requests legal transitions; an illegal one keeps the
// current status rather than aborting the run.
fn advance(current: TestStatus, next: TestStatus) -> TestStatus {
  current.transition(next).unwrap_or_else(|e| {
    error!(error = %e, "Status transition rejected");
    current
  })
}
