//! Concurrent query worker pool.
//!
//! Spawns a fixed number of workers, each issuing a deterministic sequence of
//! searches and keeping a private [`WorkerOutcome`] tally. The coordinator
//! waits for every worker before summing, so no partial aggregate is ever
//! visible.
//!
//! A failed query (`NotFound` on a filter) is counted and the worker moves on.
//! Cancellation is checked before each query; a cancelled worker stops early
//! and its partial tally still counts toward the aggregate. A worker that
//! panics loses its tally and is counted in `failed_workers`.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::search::{SearchIndex, SearchQuery};

/// Produces the query for a `(worker_id, query_index)` pair.
///
/// Must be deterministic so runs are reproducible.
pub type QueryPlan = Arc<dyn Fn(usize, usize) -> SearchQuery + Send + Sync>;

/// Default plan: `worker_{id}_query_{n}` with no filters.
pub fn worker_scoped_plan(limit: usize) -> QueryPlan {
  Arc::new(move |worker_id: usize, query_index: usize| {
    SearchQuery::new(format!("worker_{worker_id}_query_{query_index}")).with_limit(limit)
  })
}

/// Per-worker tally. `queries_run == success_count + error_count` always.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOutcome {
  pub worker_id: usize,
  queries_run: u64,
  success_count: u64,
  error_count: u64,
  /// Worker stopped early because of cancellation
  pub cancelled: bool,
}

impl WorkerOutcome {
  fn new(worker_id: usize) -> Self {
    Self {
      worker_id,
      ..Default::default()
    }
  }

  fn record_success(&mut self) {
    self.queries_run += 1;
    self.success_count += 1;
  }

  fn record_error(&mut self) {
    self.queries_run += 1;
    self.error_count += 1;
  }

  pub fn queries_run(&self) -> u64 {
    self.queries_run
  }

  pub fn success_count(&self) -> u64 {
    self.success_count
  }

  pub fn error_count(&self) -> u64 {
    self.error_count
  }
}

/// Aggregate over all workers, sorted by `worker_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolOutcome {
  pub total_queries: u64,
  pub total_success: u64,
  pub total_errors: u64,
  pub workers: Vec<WorkerOutcome>,
  pub elapsed: Duration,
  pub queries_per_sec: f64,
  /// At least one worker stopped early
  pub cancelled: bool,
  /// Workers that panicked; their queries are missing from the totals
  pub failed_workers: usize,
}

impl PoolOutcome {
  fn merge(mut workers: Vec<WorkerOutcome>, failed_workers: usize, elapsed: Duration) -> Self {
    workers.sort_by_key(|w| w.worker_id);

    let total_queries = workers.iter().map(|w| w.queries_run).sum();
    let total_success = workers.iter().map(|w| w.success_count).sum();
    let total_errors = workers.iter().map(|w| w.error_count).sum();
    let secs = elapsed.as_secs_f64();

    Self {
      total_queries,
      total_success,
      total_errors,
      cancelled: workers.iter().any(|w| w.cancelled),
      failed_workers,
      workers,
      elapsed,
      queries_per_sec: if secs > 0.0 { total_queries as f64 / secs } else { 0.0 },
    }
  }
}

pub struct QueryWorkerPool {
  index: SearchIndex,
  plan: QueryPlan,
}

impl QueryWorkerPool {
  pub fn new(index: SearchIndex, query_limit: usize) -> Self {
    Self::with_plan(index, worker_scoped_plan(query_limit))
  }

  pub fn with_plan(index: SearchIndex, plan: QueryPlan) -> Self {
    Self { index, plan }
  }

  /// Run `worker_count` workers of `queries_per_worker` queries each.
  ///
  /// Must be called from within a tokio runtime.
  pub async fn run(&self, worker_count: usize, queries_per_worker: usize, cancel: CancellationToken) -> PoolOutcome {
    info!(worker_count, queries_per_worker, "Starting concurrent queries");
    let start = Instant::now();

    let handles: Vec<_> = (0..worker_count)
      .map(|worker_id| {
        let index = self.index.clone();
        let plan = self.plan.clone();
        let cancel = cancel.clone();
        tokio::spawn(query_worker(worker_id, queries_per_worker, index, plan, cancel))
      })
      .collect();

    let mut outcomes = Vec::with_capacity(worker_count);
    let mut failed_workers = 0;
    for (worker_id, joined) in futures::future::join_all(handles).await.into_iter().enumerate() {
      match joined {
        Ok(outcome) => outcomes.push(outcome),
        Err(e) => {
          failed_workers += 1;
          error!(worker_id, error = %e, "Query worker failed to complete");
        }
      }
    }

    let outcome = PoolOutcome::merge(outcomes, failed_workers, start.elapsed());
    info!(
      total_queries = outcome.total_queries,
      total_success = outcome.total_success,
      total_errors = outcome.total_errors,
      elapsed_ms = outcome.elapsed.as_millis() as u64,
      queries_per_sec = outcome.queries_per_sec,
      cancelled = outcome.cancelled,
      failed_workers = outcome.failed_workers,
      outcome = "success",
      "Concurrent queries completed"
    );
    outcome
  }
}

async fn query_worker(
  worker_id: usize,
  queries: usize,
  index: SearchIndex,
  plan: QueryPlan,
  cancel: CancellationToken,
) -> WorkerOutcome {
  let mut outcome = WorkerOutcome::new(worker_id);

  for query_index in 0..queries {
    if cancel.is_cancelled() {
      debug!(worker_id, completed = query_index, "Query worker cancelled");
      outcome.cancelled = true;
      break;
    }

    let query = plan(worker_id, query_index);
    match index.search(&query) {
      Ok(results) => {
        outcome.record_success();
        if query_index % 10 == 0 {
          debug!(worker_id, query_index, results = results.len(), "Query worker progress");
        }
      }
      Err(e) => {
        outcome.record_error();
        warn!(worker_id, query_index, error = %e, "Query failed");
      }
    }

    // Let other workers and the cancellation signal make progress
    tokio::task::yield_now().await;
  }

  outcome
}
