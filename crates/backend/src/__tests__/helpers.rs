//! Shared fixtures for processor integration tests.

use std::sync::Arc;

use crate::{
  catalog::{Catalog, Entry},
  config::ProcessorConfig,
  metrics::NoMetrics,
  processor::Processor,
};

pub const HAPPY: [&str; 10] = ["😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😊", "😇"];

/// One category `faces` with a single `happy` subcategory of 10 items.
pub fn faces_catalog() -> Catalog {
  Catalog::builder()
    .subcategory("faces", "happy", HAPPY)
    .build()
    .expect("build faces catalog")
}

/// Processor whose payload is the entry's subcategory, with metrics disabled
/// so snapshots are deterministic.
pub fn subcategory_processor(catalog: Catalog, config: ProcessorConfig) -> Processor<String> {
  Processor::with_payload(catalog, config, |e: &Entry<'_>| e.subcategory.to_string()).with_metrics(Arc::new(NoMetrics))
}

pub fn builtin_processor() -> Processor<String> {
  subcategory_processor(Catalog::builtin(), ProcessorConfig::default())
}
