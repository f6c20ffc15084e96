//! Catalog search

use anyhow::{Context, Result};
use glyphbase::{Processor, ProcessorConfig, SearchQuery};

pub fn cmd_search(query: &str, category: Option<String>, subcategory: Option<String>, limit: usize) -> Result<()> {
  let processor: Processor<()> = Processor::new(ProcessorConfig::default());

  let mut search = SearchQuery::new(query).with_limit(limit);
  if let Some(category) = category {
    search = search.with_category(category);
  }
  if let Some(subcategory) = subcategory {
    search = search.with_subcategory(subcategory);
  }

  let results = processor
    .search(&search)
    .with_context(|| format!("Search failed for: {query}"))?;

  if results.is_empty() {
    println!("No results for: {query}");
    return Ok(());
  }

  println!("Found {} results:\n", results.len());
  for result in &results {
    println!(
      "  {}  {}/{}  (relevance {:.0})",
      result.item, result.category, result.subcategory, result.relevance
    );
  }
  Ok(())
}
