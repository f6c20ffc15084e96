//! Immutable two-level catalog: category → subcategory → ordered items.
//!
//! Categories and subcategories keep their construction order. Traversal
//! order is load-bearing: the stream pipeline numbers entries by their
//! position in [`Catalog::entries`].

mod builtin;

use std::collections::HashMap;

use crate::error::{ProcessorError, Result};

/// A single `(category, subcategory, item)` triple borrowed from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
  pub category: &'a str,
  pub subcategory: &'a str,
  pub item: &'a str,
  /// Index of the item within its subcategory
  pub position: usize,
}

#[derive(Debug, Clone)]
pub struct Subcategory {
  name: String,
  items: Vec<String>,
}

impl Subcategory {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn items(&self) -> &[String] {
    &self.items
  }
}

#[derive(Debug, Clone)]
pub struct Category {
  name: String,
  subcategories: Vec<Subcategory>,
  by_name: HashMap<String, usize>,
}

impl Category {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Subcategories in construction order
  pub fn subcategories(&self) -> &[Subcategory] {
    &self.subcategories
  }

  pub fn subcategory(&self, name: &str) -> Option<&Subcategory> {
    self.by_name.get(name).map(|&i| &self.subcategories[i])
  }

  pub fn item_count(&self) -> usize {
    self.subcategories.iter().map(|s| s.items.len()).sum()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  categories: Vec<Category>,
  by_name: HashMap<String, usize>,
  len: usize,
}

impl Catalog {
  pub fn builder() -> CatalogBuilder {
    CatalogBuilder::default()
  }

  /// Look up a category by name.
  pub fn category(&self, name: &str) -> Result<&Category> {
    self
      .by_name
      .get(name)
      .map(|&i| &self.categories[i])
      .ok_or_else(|| ProcessorError::category_not_found(name))
  }

  /// Look up the ordered items of a subcategory.
  pub fn items(&self, category: &str, subcategory: &str) -> Result<&[String]> {
    self
      .category(category)?
      .subcategory(subcategory)
      .map(Subcategory::items)
      .ok_or_else(|| ProcessorError::subcategory_not_found(subcategory))
  }

  /// Categories in construction order
  pub fn categories(&self) -> impl Iterator<Item = &Category> {
    self.categories.iter()
  }

  /// Every entry in traversal order.
  ///
  /// Each call starts a fresh, independent traversal.
  pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
    self.categories.iter().flat_map(|category| {
      category.subcategories.iter().flat_map(move |sub| {
        sub.items.iter().enumerate().map(move |(position, item)| Entry {
          category: &category.name,
          subcategory: &sub.name,
          item,
          position,
        })
      })
    })
  }

  /// Total number of entries
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

/// Appends subcategories in construction order.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
  categories: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl CatalogBuilder {
  /// Add a subcategory with its items. A category seen before is extended.
  pub fn subcategory<I, S>(mut self, category: &str, subcategory: &str, items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let items = items.into_iter().map(Into::into).collect();
    match self.categories.iter_mut().find(|(name, _)| name == category) {
      Some((_, subs)) => subs.push((subcategory.to_string(), items)),
      None => self
        .categories
        .push((category.to_string(), vec![(subcategory.to_string(), items)])),
    }
    self
  }

  pub fn build(self) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    for (name, subs) in self.categories {
      let mut category = Category {
        name: name.clone(),
        subcategories: Vec::with_capacity(subs.len()),
        by_name: HashMap::with_capacity(subs.len()),
      };

      for (sub_name, items) in subs {
        if category.by_name.contains_key(&sub_name) {
          return Err(ProcessorError::invalid_state(format!(
            "duplicate subcategory '{sub_name}' in category '{name}'"
          )));
        }
        catalog.len += items.len();
        category.by_name.insert(sub_name.clone(), category.subcategories.len());
        category.subcategories.push(Subcategory { name: sub_name, items });
      }

      catalog.by_name.insert(name, catalog.categories.len());
      catalog.categories.push(category);
    }

    Ok(catalog)
  }
}
