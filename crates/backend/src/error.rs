//! Error types surfaced by the processing core.
//!
//! Every failure is a value returned to the caller. Each variant carries a
//! stable numeric code so an orchestration shell can classify it without
//! matching on the variant itself.

/// Error code range reported as a skip.
pub const SKIP_CODES: std::ops::Range<i32> = 1000..2000;
/// Error code range reported as a warning.
pub const WARNING_CODES: std::ops::Range<i32> = 2000..3000;

/// What kind of catalog node a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
  Category,
  Subcategory,
}

impl std::fmt::Display for NodeKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Category => write!(f, "Category"),
      Self::Subcategory => write!(f, "Subcategory"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
  /// A named category or subcategory does not exist.
  #[error("{kind} '{name}' not found")]
  NotFound { kind: NodeKind, name: String },
  /// Cancellation was observed mid-stream or mid-query.
  #[error("Operation cancelled")]
  Cancelled,
  /// Aggregated state failed an explicit consistency check.
  #[error("Invalid state: {0}")]
  InvalidState(String),
}

impl ProcessorError {
  /// Numeric code for the orchestration shell.
  ///
  /// - `1001`: cancelled (skip range)
  /// - `2001`: invalid state (warning range)
  /// - `3001`: not found (failure)
  pub fn code(&self) -> i32 {
    match self {
      Self::Cancelled => 1001,
      Self::InvalidState(_) => 2001,
      Self::NotFound { .. } => 3001,
    }
  }

  pub fn category_not_found(name: impl Into<String>) -> Self {
    Self::NotFound {
      kind: NodeKind::Category,
      name: name.into(),
    }
  }

  pub fn subcategory_not_found(name: impl Into<String>) -> Self {
    Self::NotFound {
      kind: NodeKind::Subcategory,
      name: name.into(),
    }
  }

  pub fn invalid_state(msg: impl Into<String>) -> Self {
    Self::InvalidState(msg.into())
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}

pub type Result<T, E = ProcessorError> = std::result::Result<T, E>;
