//! Streaming and statistics

use anyhow::{Context, Result};
use glyphbase::{Entry, Processor, ProcessorConfig};
use tokio_util::sync::CancellationToken;

fn subcategory_processor() -> Processor<String> {
  Processor::with_payload(
    glyphbase::Catalog::builtin(),
    ProcessorConfig::default(),
    |e: &Entry<'_>| e.subcategory.to_string(),
  )
}

/// Print derived records as JSON lines, stopping after `limit` if given.
pub async fn cmd_stream(limit: Option<usize>, cancel: CancellationToken) -> Result<()> {
  let processor = subcategory_processor();
  let run = cancel.child_token();
  let mut stream = processor.stream(run.clone());
  let mut printed = 0usize;

  while let Some(record) = stream.next().await {
    let record = record.context("Stream interrupted")?;
    println!("{}", serde_json::to_string(&record)?);
    printed += 1;

    if limit.is_some_and(|limit| printed >= limit) {
      run.cancel();
      break;
    }
  }

  eprintln!("{printed} records");
  Ok(())
}

/// Stream the catalog once, then print the processor statistics.
pub async fn cmd_stats(cancel: CancellationToken) -> Result<()> {
  let processor = subcategory_processor();
  processor.stream_all(cancel).await.context("Stream interrupted")?;

  let stats = processor.stats();
  stats.snapshot.verify()?;
  println!("{}", serde_json::to_string_pretty(&stats)?);
  Ok(())
}
