//! Runtime configuration for the processor.
//!
//! Built in code or from command-line flags; nothing here reads files.

use serde::{Deserialize, Serialize};

/// Processor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
  /// Label for the data source, logged at construction
  pub source_name: String,

  /// Capacity of the bounded records channel (default: 100)
  pub batch_size: usize,

  /// Value stamped into every record's `produced_by` metadata
  pub producer_name: String,

  /// Result limit for each query issued by the worker pool (default: 5)
  pub query_limit: usize,
}

impl Default for ProcessorConfig {
  fn default() -> Self {
    Self {
      source_name: "builtin".to_string(),
      batch_size: 100,
      producer_name: "StreamPipeline".to_string(),
      query_limit: 5,
    }
  }
}

impl ProcessorConfig {
  pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
    self.source_name = name.into();
    self
  }

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  pub fn with_query_limit(mut self, limit: usize) -> Self {
    self.query_limit = limit;
    self
  }

  /// Channel capacity, never zero (tokio rejects zero-capacity channels)
  pub(crate) fn channel_capacity(&self) -> usize {
    self.batch_size.max(1)
  }
}
