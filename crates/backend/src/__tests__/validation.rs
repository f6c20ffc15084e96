//! Validation suite E2E tests.

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use pretty_assertions::assert_eq;
  use tokio_util::sync::CancellationToken;

  use crate::{
    __tests__::helpers::builtin_processor,
    config::ProcessorConfig,
    harness::{ProcessorValidation, TestRunner, TestStatus},
  };

  /// Test: the built-in suite passes against the built-in catalog.
  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_validation_suite_succeeds() {
    let mut runner = TestRunner::new().with_budget(Duration::from_secs(30));
    runner.add_case(ProcessorValidation::new(ProcessorConfig::default()));

    let report = runner.run_all(CancellationToken::new()).await;

    assert_eq!(report.summary.total_tests, 1);
    assert_eq!(report.summary.count(TestStatus::Success), 1);
    assert_eq!(report.summary.success_rate, 100.0);

    let details = &report.results[0].details;
    let search = details["search_tests"].as_array().expect("search checks");
    assert_eq!(search.len(), 4);
    assert!(search.iter().all(|c| c["passed"] == true));
    assert_eq!(details["stream_processing"]["processed_count"], 130);
    assert_eq!(details["statistics"]["total"], 130);
    assert_eq!(details["concurrent_processing"]["total_queries"], 100);
    assert!(details.contains_key("performance"));
  }

  /// Test: a cancelled run is reported as skipped rather than failed.
  #[tokio::test]
  async fn test_validation_cancelled_is_skipped() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut runner = TestRunner::new();
    runner.add_case(ProcessorValidation::with_processor(builtin_processor()));
    let report = runner.run_all(cancel).await;

    assert_eq!(report.results[0].status, TestStatus::Skipped);
    assert_eq!(report.results[0].code, Some(1001));
  }

  /// Test: the run report serializes with lowercase statuses.
  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_report_serializes() {
    let mut runner = TestRunner::new();
    runner.add_case(ProcessorValidation::with_processor(builtin_processor()));
    let report = runner.run_all(CancellationToken::new()).await;

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["results"][0]["status"], "success");
    assert_eq!(json["summary"]["status_counts"]["success"], 1);
  }
}
