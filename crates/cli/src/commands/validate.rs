//! Validation suite runner

use std::time::Duration;

use anyhow::{Result, bail};
use glyphbase::{
  ProcessorConfig,
  harness::{ProcessorValidation, TestRunner, TestStatus},
};
use tokio_util::sync::CancellationToken;

pub async fn cmd_validate(timeout_secs: u64, json_output: bool, cancel: CancellationToken) -> Result<()> {
  let mut runner = TestRunner::new().with_budget(Duration::from_secs(timeout_secs));
  runner.add_case(ProcessorValidation::new(ProcessorConfig::default()));

  let report = runner.run_all(cancel).await;

  if json_output {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!("Validation Results");
    println!("==================\n");
    for result in &report.results {
      print!("  [{}] {} ({:?})", result.status, result.name, result.duration);
      match &result.error {
        Some(error) => println!(" - {error}"),
        None => println!(),
      }
    }

    let summary = &report.summary;
    println!();
    println!("Total tests:      {}", summary.total_tests);
    for status in TestStatus::ALL.iter().filter(|s| s.is_terminal()) {
      println!("{:<17} {}", format!("{status}:"), summary.count(*status));
    }
    println!("Success rate:     {:.1}%", summary.success_rate);
    println!("Total duration:   {:?}", summary.total_duration);
  }

  if report.summary.count(TestStatus::Failed) > 0 {
    bail!("{} validation case(s) failed", report.summary.count(TestStatus::Failed));
  }
  Ok(())
}
