//! Worker pool benchmark

use anyhow::Result;
use glyphbase::{Processor, ProcessorConfig};
use tokio_util::sync::CancellationToken;

pub async fn cmd_bench(workers: usize, queries: usize, cancel: CancellationToken) -> Result<()> {
  let processor: Processor<()> = Processor::new(ProcessorConfig::default());
  let outcome = processor.run_concurrent_queries(workers, queries, cancel).await;

  println!("Workers:      {}", outcome.workers.len());
  println!("Queries:      {}", outcome.total_queries);
  println!("Successful:   {}", outcome.total_success);
  println!("Errors:       {}", outcome.total_errors);
  if outcome.failed_workers > 0 {
    println!("Failed workers: {}", outcome.failed_workers);
  }
  println!("Elapsed:      {:?}", outcome.elapsed);
  println!("Queries/sec:  {:.1}", outcome.queries_per_sec);
  if outcome.cancelled {
    println!("(cancelled before completion)");
  }
  Ok(())
}
