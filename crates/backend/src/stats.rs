//! Thread-safe per-category counters.
//!
//! Counts and the running total live behind one mutex so a snapshot can
//! never observe a total that disagrees with its own category counts.

use std::{
  collections::{BTreeMap, HashMap},
  sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};

#[derive(Debug, Default)]
struct Counters {
  counts: HashMap<String, u64>,
  total: u64,
}

/// Monotonic category counters shared between concurrent producers.
#[derive(Debug, Default)]
pub struct StatsAggregator {
  inner: Mutex<Counters>,
}

impl StatsAggregator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Increment the count for `category`, creating it at zero first.
  pub fn increment(&self, category: &str) {
    let mut guard = self.lock();
    match guard.counts.get_mut(category) {
      Some(count) => *count += 1,
      None => {
        guard.counts.insert(category.to_string(), 1);
      }
    }
    guard.total += 1;
  }

  /// Consistent copy of the counters.
  pub fn snapshot(&self) -> StatsSnapshot {
    let guard = self.lock();
    StatsSnapshot {
      categories: guard.counts.iter().map(|(k, v)| (k.clone(), *v)).collect(),
      total: guard.total,
    }
  }

  // Every critical section leaves the counters consistent, so a poisoned
  // lock still guards valid data.
  fn lock(&self) -> MutexGuard<'_, Counters> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
  pub categories: BTreeMap<String, u64>,
  pub total: u64,
}

impl StatsSnapshot {
  pub fn category_sum(&self) -> u64 {
    self.categories.values().sum()
  }

  /// Check that the per-category counts add up to the total.
  pub fn verify(&self) -> Result<()> {
    let sum = self.category_sum();
    if sum != self.total {
      return Err(ProcessorError::invalid_state(format!(
        "category sum {sum} != total {}",
        self.total
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;

  #[test]
  fn test_increment_and_snapshot() {
    let stats = StatsAggregator::new();
    stats.increment("faces");
    stats.increment("faces");
    stats.increment("nature");

    let snap = stats.snapshot();
    assert_eq!(snap.categories.get("faces"), Some(&2));
    assert_eq!(snap.categories.get("nature"), Some(&1));
    assert_eq!(snap.total, 3);
    assert!(snap.verify().is_ok());
  }

  #[test]
  fn test_empty_snapshot_is_consistent() {
    let snap = StatsAggregator::new().snapshot();
    assert_eq!(snap.total, 0);
    assert!(snap.categories.is_empty());
    assert!(snap.verify().is_ok());
  }

  #[test]
  fn test_verify_detects_mismatch() {
    let mut snap = StatsSnapshot::default();
    snap.categories.insert("faces".to_string(), 4);
    snap.total = 5;

    let err = snap.verify().unwrap_err();
    assert_eq!(err.code(), 2001);
  }

  #[test]
  fn test_concurrent_increments_are_not_lost() {
    let stats = Arc::new(StatsAggregator::new());
    let categories = ["faces", "nature", "objects", "symbols"];

    std::thread::scope(|scope| {
      for t in 0..8 {
        let stats = &stats;
        scope.spawn(move || {
          for i in 0..1_000 {
            stats.increment(categories[(t + i) % categories.len()]);
          }
        });
      }

      // Snapshots taken mid-flight stay internally consistent
      scope.spawn(|| {
        for _ in 0..200 {
          assert!(stats.snapshot().verify().is_ok());
        }
      });
    });

    let snap = stats.snapshot();
    assert_eq!(snap.total, 8_000);
    assert_eq!(snap.category_sum(), 8_000);
    assert!(snap.categories.values().all(|&c| c == 2_000));
  }
}
