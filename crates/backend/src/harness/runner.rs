//! Sequential test runner with a per-case time budget.

use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{
  case::{TestCase, TestReport, execute_within},
  status::TestStatus,
};

const DEFAULT_BUDGET: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub total_tests: usize,
  pub total_duration: Duration,
  pub average_duration: Duration,
  pub status_counts: BTreeMap<TestStatus, usize>,
  /// Percentage of cases that finished with `Success`
  pub success_rate: f64,
}

impl RunSummary {
  fn from_reports(reports: &[TestReport], total_duration: Duration) -> Self {
    let mut status_counts = BTreeMap::new();
    for report in reports {
      *status_counts.entry(report.status).or_insert(0) += 1;
    }

    let total_tests = reports.len();
    let success = status_counts.get(&TestStatus::Success).copied().unwrap_or(0);
    let (success_rate, average_duration) = if total_tests > 0 {
      (
        success as f64 / total_tests as f64 * 100.0,
        total_duration / total_tests as u32,
      )
    } else {
      (0.0, Duration::ZERO)
    };

    Self {
      total_tests,
      total_duration,
      average_duration,
      status_counts,
      success_rate,
    }
  }

  pub fn count(&self, status: TestStatus) -> usize {
    self.status_counts.get(&status).copied().unwrap_or(0)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub summary: RunSummary,
  pub results: Vec<TestReport>,
}

pub struct TestRunner {
  cases: Vec<Box<dyn TestCase>>,
  budget: Duration,
}

impl Default for TestRunner {
  fn default() -> Self {
    Self::new()
  }
}

impl TestRunner {
  pub fn new() -> Self {
    Self {
      cases: Vec::new(),
      budget: DEFAULT_BUDGET,
    }
  }

  /// Time budget for each case's `run` phase
  pub fn with_budget(mut self, budget: Duration) -> Self {
    self.budget = budget;
    self
  }

  pub fn add_case(&mut self, case: impl TestCase + 'static) {
    info!(case = case.name(), "Test case registered");
    self.cases.push(Box::new(case));
  }

  /// Run every registered case in order.
  pub async fn run_all(&mut self, cancel: CancellationToken) -> RunReport {
    info!(cases = self.cases.len(), "Starting test execution");
    let start = std::time::Instant::now();
    let count = self.cases.len();
    let mut results = Vec::with_capacity(count);

    for (i, case) in self.cases.iter_mut().enumerate() {
      info!(index = i + 1, total = count, case = case.name(), "Executing test");
      let report = execute_within(case.as_mut(), cancel.child_token(), Some(self.budget)).await;
      results.push(report);
    }

    let summary = RunSummary::from_reports(&results, start.elapsed());
    info!(
      total = summary.total_tests,
      success_rate = summary.success_rate,
      outcome = "success",
      "All tests completed"
    );
    RunReport { summary, results }
  }
}
