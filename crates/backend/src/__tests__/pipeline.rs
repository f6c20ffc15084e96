//! Stream and statistics E2E tests.

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use futures::StreamExt;
  use pretty_assertions::assert_eq;
  use tokio_util::sync::CancellationToken;

  use crate::{
    __tests__::helpers::{builtin_processor, subcategory_processor},
    catalog::Catalog,
    config::ProcessorConfig,
    error::ProcessorError,
    stats::StatsAggregator,
  };

  /// Test: a completed run emits one record per entry, in traversal order,
  /// and the statistics account for every one of them.
  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_full_stream_matches_catalog_and_stats() {
    let processor = builtin_processor();
    let records = processor.stream_all(CancellationToken::new()).await.expect("stream");

    let expected: Vec<_> = processor
      .catalog()
      .entries()
      .map(|e| (e.category.to_string(), e.subcategory.to_string(), e.item.to_string()))
      .collect();
    let actual: Vec<_> = records
      .iter()
      .map(|r| (r.category.clone(), r.payload.clone(), r.item.clone()))
      .collect();
    assert_eq!(actual, expected);

    let stats = processor.stats();
    assert_eq!(stats.snapshot.total, 130);
    assert_eq!(stats.snapshot.category_sum(), stats.snapshot.total);
    assert_eq!(stats.snapshot.categories.get("faces"), Some(&40));
    assert_eq!(stats.snapshot.categories.get("nature"), Some(&30));
    stats.snapshot.verify().expect("consistent stats");
  }

  /// Test: every record carries well-formed metadata from the configured producer.
  #[tokio::test]
  async fn test_record_metadata() {
    let config = ProcessorConfig::default().with_source_name("fixtures");
    let processor = subcategory_processor(Catalog::builtin(), config);
    let records = processor.stream_all(CancellationToken::new()).await.expect("stream");

    for record in &records {
      assert!(record.metadata.length > 0);
      assert!(record.metadata.byte_size >= record.metadata.length);
      assert_eq!(record.metadata.content_hash.len(), 64);
      assert_eq!(record.metadata.produced_by, "StreamPipeline");
    }

    let mut ids: Vec<_> = records.iter().map(|r| r.metadata.correlation_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), records.len(), "correlation ids must be unique");
  }

  /// Test: two runs on the same processor accumulate statistics.
  #[tokio::test]
  async fn test_stats_accumulate_across_runs() {
    let processor = builtin_processor();
    processor.stream_all(CancellationToken::new()).await.expect("first run");
    processor.stream_all(CancellationToken::new()).await.expect("second run");

    let stats = processor.stats();
    assert_eq!(stats.snapshot.total, 260);
    assert_eq!(stats.snapshot.category_sum(), 260);
  }

  /// Test: cancelling after N delivered records stops delivery and reports
  /// `Cancelled`.
  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_cancel_after_n_records() {
    let processor = subcategory_processor(Catalog::builtin(), ProcessorConfig::default().with_batch_size(4));
    let cancel = CancellationToken::new();
    let mut stream = processor.stream(cancel.clone());

    for _ in 0..7 {
      stream.next().await.expect("record").expect("no error yet");
    }
    cancel.cancel();

    assert_eq!(stream.next().await.expect("terminal item").unwrap_err(), ProcessorError::Cancelled);
    assert!(stream.next().await.is_none());

    // Let the producer observe the token before checking counters
    tokio::time::sleep(Duration::from_millis(20)).await;
    let stats = processor.stats();
    assert!(stats.snapshot.total < 130);
    stats.snapshot.verify().expect("consistent after cancel");
  }

  /// Test: the raw error receiver yields `Cancelled` after a cancelled run.
  #[tokio::test]
  async fn test_cancel_reported_on_error_channel() {
    let processor = subcategory_processor(Catalog::builtin(), ProcessorConfig::default().with_batch_size(1));
    let cancel = CancellationToken::new();
    let (mut records, mut errors) = processor.stream(cancel.clone()).into_parts();

    records.recv().await.expect("first record");
    cancel.cancel();

    let err = tokio::time::timeout(Duration::from_secs(1), errors.recv())
      .await
      .expect("error within timeout")
      .expect("cancel error");
    assert_eq!(err, ProcessorError::Cancelled);
  }

  /// Test: the stream adapter yields the same records as `collect`.
  #[tokio::test]
  async fn test_into_stream_adapter() {
    let processor = builtin_processor();
    let items: Vec<_> = processor
      .stream(CancellationToken::new())
      .into_stream()
      .map(|r| r.expect("record").item)
      .collect()
      .await;

    assert_eq!(items.len(), 130);
    assert_eq!(items.first().map(String::as_str), Some("😀"));
  }

  /// Test: external increments racing a stream run never break the
  /// sum-equals-total invariant.
  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_increments_during_stream() {
    let stats = Arc::new(StatsAggregator::new());
    let writers: Vec<_> = (0..4)
      .map(|i| {
        let stats = stats.clone();
        tokio::spawn(async move {
          for n in 0..500 {
            stats.increment(if n % 2 == 0 { "even" } else { "odd" });
            if n % 50 == 0 {
              tokio::task::yield_now().await;
            }
          }
          i
        })
      })
      .collect();

    let readers = tokio::spawn({
      let stats = stats.clone();
      async move {
        for _ in 0..200 {
          stats.snapshot().verify().expect("consistent mid-run snapshot");
          tokio::task::yield_now().await;
        }
      }
    });

    for writer in writers {
      writer.await.expect("writer");
    }
    readers.await.expect("reader");

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.total, 2000);
    assert_eq!(snapshot.categories.get("even"), Some(&1000));
    assert_eq!(snapshot.categories.get("odd"), Some(&1000));
  }
}
