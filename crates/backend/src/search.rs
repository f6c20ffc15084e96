//! Relevance-ranked search over catalog subcategory names.
//!
//! The match target is the subcategory *name*, not the item text. When a
//! name contains the query (case-insensitive), every item in that
//! subcategory becomes a candidate.
//!
//! ## Scoring
//!
//! ```text
//! base  = 100 exact | 80 prefix | 60 substring   (first match wins)
//! bonus = max(0, 20 - bytes(subcategory name))
//! score = base + bonus
//! ```
//!
//! Ties keep catalog traversal order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  catalog::{Catalog, Category, Subcategory},
  error::{ProcessorError, Result},
};

const EXACT_SCORE: f64 = 100.0;
const PREFIX_SCORE: f64 = 80.0;
const CONTAINS_SCORE: f64 = 60.0;
const LENGTH_BONUS_CAP: usize = 20;

/// Parameters for a single search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
  pub query: String,
  /// Restrict to one category (all categories when `None`)
  pub category: Option<String>,
  /// Restrict to one subcategory (all subcategories when `None`)
  pub subcategory: Option<String>,
  /// Maximum results; `0` means unlimited
  pub limit: usize,
}

impl SearchQuery {
  pub fn new(query: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      category: None,
      subcategory: None,
      limit: 0,
    }
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
    self.subcategory = Some(subcategory.into());
    self
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
  pub item: String,
  pub category: String,
  pub subcategory: String,
  pub relevance: f64,
}

/// Stateless search over a shared catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SearchIndex {
  catalog: Arc<Catalog>,
}

impl SearchIndex {
  pub fn new(catalog: Arc<Catalog>) -> Self {
    Self { catalog }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  /// Run a search.
  ///
  /// # Errors
  ///
  /// `NotFound` when a named category does not exist, or when a named
  /// subcategory exists in none of the selected categories.
  pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
    let categories = self.select_categories(query.category.as_deref())?;
    let scopes = select_subcategories(&categories, query.subcategory.as_deref())?;

    if query.query.is_empty() {
      debug!(category = ?query.category, "Empty query, no candidates");
      return Ok(Vec::new());
    }

    let needle = query.query.to_lowercase();
    let mut results = Vec::new();

    for (category, sub) in scopes {
      let name = sub.name().to_lowercase();
      if !name.contains(&needle) {
        continue;
      }

      let relevance = relevance(&needle, &name, sub.name());
      results.extend(sub.items().iter().map(|item| SearchResult {
        item: item.clone(),
        category: category.name().to_string(),
        subcategory: sub.name().to_string(),
        relevance,
      }));
    }

    // Stable sort keeps traversal order among ties
    results.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    if query.limit > 0 {
      results.truncate(query.limit);
    }

    debug!(query = %query.query, results = results.len(), "Search complete");
    Ok(results)
  }

  fn select_categories(&self, category: Option<&str>) -> Result<Vec<&Category>> {
    match category {
      Some(name) => Ok(vec![self.catalog.category(name)?]),
      None => Ok(self.catalog.categories().collect()),
    }
  }
}

/// Pair every selected category with the subcategories to scan.
fn select_subcategories<'a>(
  categories: &[&'a Category],
  subcategory: Option<&str>,
) -> Result<Vec<(&'a Category, &'a Subcategory)>> {
  let Some(name) = subcategory else {
    return Ok(
      categories
        .iter()
        .flat_map(|c| c.subcategories().iter().map(move |s| (*c, s)))
        .collect(),
    );
  };

  let scopes: Vec<_> = categories
    .iter()
    .filter_map(|c| c.subcategory(name).map(|s| (*c, s)))
    .collect();

  if scopes.is_empty() {
    return Err(ProcessorError::subcategory_not_found(name));
  }
  Ok(scopes)
}

/// Score a lowercased query against a lowercased subcategory name.
///
/// The length bonus uses the unlowered name's UTF-8 byte length.
fn relevance(query: &str, target: &str, name: &str) -> f64 {
  let base = if query == target {
    EXACT_SCORE
  } else if target.starts_with(query) {
    PREFIX_SCORE
  } else if target.contains(query) {
    CONTAINS_SCORE
  } else {
    0.0
  };

  base + LENGTH_BONUS_CAP.saturating_sub(name.len()) as f64
}
