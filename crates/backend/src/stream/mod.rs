//! Streaming pipeline over the catalog.
//!
//! A single producer task walks the catalog in traversal order and emits one
//! [`DerivedRecord`] per entry onto a bounded channel:
//!
//! ```text
//! Catalog::entries() → build record → stats.increment() → records (bounded)
//!                                                        ↘ errors (cap 1)
//! ```
//!
//! The bounded channel is the only flow control. When the consumer falls
//! behind, the producer suspends on `send` until a slot frees up.
//!
//! # Cancellation
//!
//! The producer checks the token before each entry and while suspended on a
//! full channel. On cancellation it sends [`ProcessorError::Cancelled`] to the
//! error channel and stops without emitting the current record. A completed
//! run closes both channels without sending an error.

mod record;

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use self::record::{DerivedRecord, Metadata};
use crate::{
  catalog::{Catalog, Entry},
  config::ProcessorConfig,
  error::{ProcessorError, Result},
  stats::StatsAggregator,
};

/// Entries between progress notes.
const SAMPLE_INTERVAL: usize = 10;

/// Builds the payload carried by each record.
pub type PayloadFn<T> = Arc<dyn Fn(&Entry<'_>) -> T + Send + Sync>;

#[derive(Debug, Clone)]
struct StreamSettings {
  capacity: usize,
  producer_name: String,
}

impl From<&ProcessorConfig> for StreamSettings {
  fn from(config: &ProcessorConfig) -> Self {
    Self {
      capacity: config.channel_capacity(),
      producer_name: config.producer_name.clone(),
    }
  }
}

pub struct StreamPipeline<T> {
  catalog: Arc<Catalog>,
  stats: Arc<StatsAggregator>,
  payload: PayloadFn<T>,
  settings: StreamSettings,
}

impl<T: Send + 'static> StreamPipeline<T> {
  pub fn new(
    catalog: Arc<Catalog>,
    stats: Arc<StatsAggregator>,
    payload: PayloadFn<T>,
    config: &ProcessorConfig,
  ) -> Self {
    Self {
      catalog,
      stats,
      payload,
      settings: StreamSettings::from(config),
    }
  }

  /// Spawn the producer and return the consumer side.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start(&self, cancel: CancellationToken) -> RecordStream<T> {
    let (records_tx, records_rx) = mpsc::channel(self.settings.capacity);
    let (errors_tx, errors_rx) = mpsc::channel(1);

    let producer = Producer {
      catalog: self.catalog.clone(),
      stats: self.stats.clone(),
      payload: self.payload.clone(),
      settings: self.settings.clone(),
      records: records_tx,
      errors: errors_tx,
      cancel: cancel.clone(),
    };
    tokio::spawn(producer.run());

    RecordStream {
      records: records_rx,
      errors: errors_rx,
      cancel,
      done: false,
    }
  }
}

struct Producer<T> {
  catalog: Arc<Catalog>,
  stats: Arc<StatsAggregator>,
  payload: PayloadFn<T>,
  settings: StreamSettings,
  records: mpsc::Sender<DerivedRecord<T>>,
  errors: mpsc::Sender<ProcessorError>,
  cancel: CancellationToken,
}

impl<T: Send + 'static> Producer<T> {
  async fn run(self) {
    let total = self.catalog.len();
    info!(total, capacity = self.settings.capacity, "Stream processing started");

    let mut processed = 0usize;
    for entry in self.catalog.entries() {
      if self.cancel.is_cancelled() {
        debug!(processed, total, "Stream cancelled");
        self.report_cancelled();
        return;
      }

      let payload = (self.payload)(&entry);
      let record = DerivedRecord::from_entry(&entry, payload, &self.settings.producer_name);
      self.stats.increment(entry.category);

      tokio::select! {
        biased;
        _ = self.cancel.cancelled() => {
          debug!(processed, total, "Stream cancelled while waiting on consumer");
          self.report_cancelled();
          return;
        }
        result = self.records.send(record) => {
          if result.is_err() {
            debug!(processed, "Stream consumer dropped, stopping");
            return;
          }
        }
      }

      processed += 1;
      if is_sample_point(processed) {
        debug!(
          processed,
          category = entry.category,
          subcategory = entry.subcategory,
          "Stream progress"
        );
      }
    }

    info!(processed, outcome = "success", "Stream processing completed");
  }

  fn report_cancelled(&self) {
    // Capacity 1 and a single send per run, so this never finds the slot full
    let _ = self.errors.try_send(ProcessorError::Cancelled);
  }
}

fn is_sample_point(processed: usize) -> bool {
  processed % SAMPLE_INTERVAL == 0
}

/// Consumer side of a stream run.
///
/// Once the run's token is cancelled, [`RecordStream::next`] yields
/// `Err(Cancelled)` once and then `None`, even if records are still buffered.
pub struct RecordStream<T> {
  records: mpsc::Receiver<DerivedRecord<T>>,
  errors: mpsc::Receiver<ProcessorError>,
  cancel: CancellationToken,
  done: bool,
}

impl<T> RecordStream<T> {
  /// Next record, the terminating error, or `None` when the run is over.
  pub async fn next(&mut self) -> Option<Result<DerivedRecord<T>>> {
    if self.done {
      return None;
    }
    if self.cancel.is_cancelled() {
      return Some(Err(self.stop_cancelled()));
    }

    tokio::select! {
      biased;
      _ = self.cancel.cancelled() => Some(Err(self.stop_cancelled())),
      record = self.records.recv() => match record {
        Some(record) => Some(Ok(record)),
        None => {
          self.done = true;
          self.errors.recv().await.map(Err)
        }
      }
    }
  }

  /// Drain the run into a vector, failing on the first error.
  pub async fn collect(mut self) -> Result<Vec<DerivedRecord<T>>> {
    let mut records = Vec::new();
    while let Some(record) = self.next().await {
      records.push(record?);
    }
    Ok(records)
  }

  pub fn into_stream(self) -> impl Stream<Item = Result<DerivedRecord<T>>> {
    futures::stream::unfold(self, |mut stream| async move {
      let item = stream.next().await?;
      Some((item, stream))
    })
  }

  /// The raw `(records, errors)` receivers.
  pub fn into_parts(self) -> (mpsc::Receiver<DerivedRecord<T>>, mpsc::Receiver<ProcessorError>) {
    (self.records, self.errors)
  }

  pub fn cancellation(&self) -> &CancellationToken {
    &self.cancel
  }

  fn stop_cancelled(&mut self) -> ProcessorError {
    self.done = true;
    self.records.close();
    ProcessorError::Cancelled
  }
}
