//! Records emitted by the stream pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::catalog::Entry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
  /// Unicode scalar count of the item
  pub length: usize,
  /// UTF-8 byte length of the item
  pub byte_size: usize,
  /// Lowercase hex SHA-256 of the item bytes
  pub content_hash: String,
  pub created_at: DateTime<Utc>,
  pub correlation_id: String,
  pub produced_by: String,
}

impl Metadata {
  pub(crate) fn for_item(item: &str, produced_by: &str) -> Self {
    Self {
      length: item.chars().count(),
      byte_size: item.len(),
      content_hash: hex::encode(Sha256::digest(item.as_bytes())),
      created_at: Utc::now(),
      correlation_id: Uuid::now_v7().to_string(),
      produced_by: produced_by.to_string(),
    }
  }
}

/// One record per catalog entry, carrying a caller-chosen payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRecord<T> {
  pub item: String,
  pub category: String,
  pub payload: T,
  pub metadata: Metadata,
}

impl<T> DerivedRecord<T> {
  pub(crate) fn from_entry(entry: &Entry<'_>, payload: T, produced_by: &str) -> Self {
    Self {
      item: entry.item.to_string(),
      category: entry.category.to_string(),
      payload,
      metadata: Metadata::for_item(entry.item, produced_by),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_metadata_for_multibyte_item() {
    // U+2601 U+FE0F: two scalars, six bytes
    let meta = Metadata::for_item("☁️", "test");
    assert_eq!(meta.length, 2);
    assert_eq!(meta.byte_size, 6);
    assert_eq!(meta.content_hash.len(), 64);
    assert_eq!(meta.produced_by, "test");
  }

  #[test]
  fn test_hash_is_deterministic_and_ids_are_unique() {
    let a = Metadata::for_item("🐶", "test");
    let b = Metadata::for_item("🐶", "test");
    assert_eq!(a.content_hash, b.content_hash);
    assert_ne!(a.correlation_id, b.correlation_id);
  }

  #[test]
  fn test_known_hash() {
    let meta = Metadata::for_item("abc", "test");
    assert_eq!(
      meta.content_hash,
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }
}
