//! Processor facade.
//!
//! Owns the catalog and the statistics aggregator for its lifetime and wires
//! search, streaming, statistics, and the worker pool behind one API. The
//! payload type `T` is what each streamed [`DerivedRecord`] carries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
  catalog::{Catalog, Entry},
  config::ProcessorConfig,
  error::Result,
  metrics::{MemoryUsage, MetricsSource, SystemMetrics},
  pool::{PoolOutcome, QueryPlan, QueryWorkerPool},
  search::{SearchIndex, SearchQuery, SearchResult},
  stats::{StatsAggregator, StatsSnapshot},
  stream::{DerivedRecord, PayloadFn, RecordStream, StreamPipeline},
};

/// Statistics snapshot enriched with process metrics.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorStats {
  #[serde(flatten)]
  pub snapshot: StatsSnapshot,
  pub memory: Option<MemoryUsage>,
  pub live_tasks: Option<usize>,
  pub timestamp: DateTime<Utc>,
}

pub struct Processor<T> {
  config: ProcessorConfig,
  catalog: Arc<Catalog>,
  stats: Arc<StatsAggregator>,
  index: SearchIndex,
  pipeline: StreamPipeline<T>,
  metrics: Arc<dyn MetricsSource>,
}

impl<T: Default + Send + 'static> Processor<T> {
  /// Processor over the built-in catalog, with `T::default()` payloads.
  pub fn new(config: ProcessorConfig) -> Self {
    Self::with_catalog(Catalog::builtin(), config)
  }

  pub fn with_catalog(catalog: Catalog, config: ProcessorConfig) -> Self {
    Self::with_payload(catalog, config, |_: &Entry<'_>| T::default())
  }
}

impl<T: Send + 'static> Processor<T> {
  pub fn with_payload<F>(catalog: Catalog, config: ProcessorConfig, payload: F) -> Self
  where
    F: Fn(&Entry<'_>) -> T + Send + Sync + 'static,
  {
    info!(
      source = %config.source_name,
      categories = catalog.categories().count(),
      items = catalog.len(),
      outcome = "success",
      "Catalog initialized"
    );

    let catalog = Arc::new(catalog);
    let stats = Arc::new(StatsAggregator::new());
    let payload: PayloadFn<T> = Arc::new(payload);
    let pipeline = StreamPipeline::new(catalog.clone(), stats.clone(), payload, &config);

    Self {
      index: SearchIndex::new(catalog.clone()),
      catalog,
      stats,
      pipeline,
      metrics: Arc::new(SystemMetrics),
      config,
    }
  }

  /// Replace the process metrics source.
  pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSource>) -> Self {
    self.metrics = metrics;
    self
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn config(&self) -> &ProcessorConfig {
    &self.config
  }

  pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
    info!(
      query = %query.query,
      category = ?query.category,
      subcategory = ?query.subcategory,
      limit = query.limit,
      "Searching"
    );
    self.index.search(query)
  }

  /// Start a stream run. Must be called from within a tokio runtime.
  pub fn stream(&self, cancel: CancellationToken) -> RecordStream<T> {
    self.pipeline.start(cancel)
  }

  /// Convenience: run a full stream and collect every record.
  pub async fn stream_all(&self, cancel: CancellationToken) -> Result<Vec<DerivedRecord<T>>> {
    self.stream(cancel).collect().await
  }

  pub fn stats(&self) -> ProcessorStats {
    ProcessorStats {
      snapshot: self.stats.snapshot(),
      memory: self.metrics.memory(),
      live_tasks: self.metrics.live_tasks(),
      timestamp: Utc::now(),
    }
  }

  pub async fn run_concurrent_queries(
    &self,
    worker_count: usize,
    queries_per_worker: usize,
    cancel: CancellationToken,
  ) -> PoolOutcome {
    QueryWorkerPool::new(self.index.clone(), self.config.query_limit)
      .run(worker_count, queries_per_worker, cancel)
      .await
  }

  /// Run the worker pool with a custom query plan.
  pub async fn run_queries_with_plan(
    &self,
    plan: QueryPlan,
    worker_count: usize,
    queries_per_worker: usize,
    cancel: CancellationToken,
  ) -> PoolOutcome {
    QueryWorkerPool::with_plan(self.index.clone(), plan)
      .run(worker_count, queries_per_worker, cancel)
      .await
  }
}
