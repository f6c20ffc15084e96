//! End-to-end validation suite for a [`Processor`].
//!
//! Exercises search, streaming, statistics consistency, search throughput,
//! and the concurrent worker pool, recording results as JSON details.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::case::{CaseError, TestCase};
use crate::{
  catalog::{Catalog, Entry},
  config::ProcessorConfig,
  error::ProcessorError,
  metrics::{MetricsSource, SystemMetrics},
  processor::Processor,
  search::SearchQuery,
};

/// `(query, expected result count)` checked with limit 20
const SEARCH_EXPECTATIONS: &[(&str, usize)] = &[("happy", 10), ("animal", 10), ("face", 0), ("", 0)];

const PERF_QUERIES: usize = 100;
const PERF_THRESHOLD: Duration = Duration::from_secs(1);
const WORKERS: usize = 5;
const QUERIES_PER_WORKER: usize = 20;

pub struct ProcessorValidation {
  processor: Processor<String>,
  details: Map<String, Value>,
}

impl ProcessorValidation {
  pub fn new(config: ProcessorConfig) -> Self {
    Self::with_processor(Processor::with_payload(Catalog::builtin(), config, subcategory_payload))
  }

  pub fn with_processor(processor: Processor<String>) -> Self {
    Self {
      processor,
      details: Map::new(),
    }
  }

  fn check_search(&mut self) -> Result<(), CaseError> {
    info!("Testing search");
    let mut checks = Vec::with_capacity(SEARCH_EXPECTATIONS.len());

    for &(query, expected) in SEARCH_EXPECTATIONS {
      let actual = self.processor.search(&SearchQuery::new(query).with_limit(20))?.len();
      let passed = actual == expected;
      if passed {
        info!(query, actual, outcome = "success", "Search check passed");
      } else {
        warn!(query, expected, actual, "Search check mismatch");
      }
      checks.push(json!({ "query": query, "expected": expected, "actual": actual, "passed": passed }));
    }

    self.details.insert("search_tests".into(), Value::Array(checks));
    Ok(())
  }

  async fn check_stream(&mut self, cancel: CancellationToken) -> Result<(), CaseError> {
    info!("Testing stream processing");
    let start = Instant::now();
    let mut stream = self.processor.stream(cancel);
    let mut processed = 0usize;

    while let Some(record) = stream.next().await {
      let record = record?;
      processed += 1;

      if record.item.is_empty() {
        return Err(CaseError::failed("missing item in processed record"));
      }
      if record.category.is_empty() {
        return Err(CaseError::failed("missing category in processed record"));
      }
      if record.metadata.length == 0 {
        return Err(CaseError::failed("invalid metadata in processed record"));
      }
      if processed % 50 == 0 {
        debug!(processed, item = %record.item, "Stream check progress");
      }
    }

    let elapsed = start.elapsed();
    info!(processed, elapsed_ms = elapsed.as_millis() as u64, outcome = "success", "Stream check completed");
    self.details.insert(
      "stream_processing".into(),
      json!({
        "processed_count": processed,
        "duration_ms": elapsed.as_millis() as u64,
        "rate": rate(processed, elapsed),
      }),
    );
    Ok(())
  }

  fn check_statistics(&mut self) -> Result<(), CaseError> {
    info!("Testing statistics");
    let stats = self.processor.stats();
    stats.snapshot.verify()?;

    info!(total = stats.snapshot.total, outcome = "success", "Statistics check passed");
    self
      .details
      .insert("statistics".into(), serde_json::to_value(&stats).unwrap_or(Value::Null));
    Ok(())
  }

  fn check_performance(&mut self) -> Result<(), CaseError> {
    info!("Testing search performance");
    let start = Instant::now();
    for i in 0..PERF_QUERIES {
      self
        .processor
        .search(&SearchQuery::new(format!("test_query_{i}")).with_limit(10))?;
    }
    let elapsed = start.elapsed();

    if elapsed > PERF_THRESHOLD {
      warn!(elapsed_ms = elapsed.as_millis() as u64, queries = PERF_QUERIES, "Search performance warning");
    } else {
      info!(elapsed_ms = elapsed.as_millis() as u64, queries = PERF_QUERIES, outcome = "success", "Search performance good");
    }

    let before = SystemMetrics.memory();
    let scratch: Processor<String> = Processor::new(self.processor.config().clone());
    let after = SystemMetrics.memory();
    drop(scratch);

    let mut perf = json!({ "search_100_queries_ms": elapsed.as_millis() as u64 });
    if let (Some(before), Some(after)) = (before, after) {
      perf["memory_delta_bytes"] = json!(after.rss_bytes.saturating_sub(before.rss_bytes));
    }
    self.details.insert("performance".into(), perf);
    Ok(())
  }

  async fn check_concurrency(&mut self, cancel: CancellationToken) -> Result<(), CaseError> {
    info!("Testing concurrent processing");
    let outcome = self
      .processor
      .run_concurrent_queries(WORKERS, QUERIES_PER_WORKER, cancel)
      .await;

    self.details.insert(
      "concurrent_processing".into(),
      serde_json::to_value(&outcome).unwrap_or(Value::Null),
    );

    if outcome.cancelled {
      return Err(ProcessorError::Cancelled.into());
    }
    if outcome.failed_workers > 0 {
      return Err(CaseError::failed(format!("{} query worker(s) panicked", outcome.failed_workers)));
    }
    if outcome.total_success + outcome.total_errors != outcome.total_queries {
      return Err(
        ProcessorError::invalid_state(format!(
          "success {} + errors {} != queries {}",
          outcome.total_success, outcome.total_errors, outcome.total_queries
        ))
        .into(),
      );
    }
    Ok(())
  }
}

#[async_trait]
impl TestCase for ProcessorValidation {
  fn name(&self) -> &str {
    "Processor Validation Suite"
  }

  async fn run(&mut self, cancel: CancellationToken) -> Result<(), CaseError> {
    self.check_search()?;
    self.check_stream(cancel.clone()).await?;
    self.check_statistics()?;
    self.check_performance()?;
    self.check_concurrency(cancel).await
  }

  fn details(&self) -> Map<String, Value> {
    self.details.clone()
  }
}

fn subcategory_payload(entry: &Entry<'_>) -> String {
  entry.subcategory.to_string()
}

fn rate(count: usize, elapsed: Duration) -> f64 {
  let secs = elapsed.as_secs_f64();
  if secs > 0.0 { count as f64 / secs } else { 0.0 }
}
