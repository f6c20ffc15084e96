mod catalog;
pub mod config;
mod error;
pub mod harness;
mod metrics;
mod pool;
mod processor;
mod search;
mod stats;
mod stream;

#[cfg(test)]
mod __tests__;

pub use catalog::{Catalog, CatalogBuilder, Category, Entry, Subcategory};
pub use config::ProcessorConfig;
pub use error::{NodeKind, ProcessorError, Result};
pub use metrics::{MemoryUsage, MetricsSource, NoMetrics, SystemMetrics};
pub use pool::{PoolOutcome, QueryPlan, QueryWorkerPool, WorkerOutcome, worker_scoped_plan};
pub use processor::{Processor, ProcessorStats};
pub use search::{SearchIndex, SearchQuery, SearchResult};
pub use stats::{StatsAggregator, StatsSnapshot};
pub use stream::{DerivedRecord, Metadata, PayloadFn, RecordStream, StreamPipeline};
