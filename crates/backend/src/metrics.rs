//! Process-wide metrics source consulted by `stats()`.
//!
//! Every reading is optional. A source that cannot produce a value returns
//! `None` and the caller omits that metric.

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessesToUpdate, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
  pub rss_bytes: u64,
  pub virtual_bytes: u64,
}

impl MemoryUsage {
  pub fn rss_mb(&self) -> u64 {
    self.rss_bytes / 1024 / 1024
  }
}

pub trait MetricsSource: Send + Sync {
  fn memory(&self) -> Option<MemoryUsage>;
  fn live_tasks(&self) -> Option<usize>;
}

/// Reads the current process via `sysinfo` and the ambient tokio runtime.
#[derive(Debug, Default)]
pub struct SystemMetrics;

impl MetricsSource for SystemMetrics {
  fn memory(&self) -> Option<MemoryUsage> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    system.process(pid).map(|process| MemoryUsage {
      rss_bytes: process.memory(),
      virtual_bytes: process.virtual_memory(),
    })
  }

  fn live_tasks(&self) -> Option<usize> {
    tokio::runtime::Handle::try_current()
      .ok()
      .map(|handle| handle.metrics().num_alive_tasks())
  }
}

/// A source with nothing to report.
#[derive(Debug, Default)]
pub struct NoMetrics;

impl MetricsSource for NoMetrics {
  fn memory(&self) -> Option<MemoryUsage> {
    None
  }

  fn live_tasks(&self) -> Option<usize> {
    None
  }
}
