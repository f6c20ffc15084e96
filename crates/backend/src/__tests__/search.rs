//! Search and worker pool E2E tests.

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use tokio_util::sync::CancellationToken;

  use crate::{
    __tests__::helpers::{HAPPY, builtin_processor, faces_catalog, subcategory_processor},
    config::ProcessorConfig,
    pool::QueryPlan,
    search::SearchQuery,
  };

  /// Test: a single `happy` subcategory of 10 items yields 10 tied results at
  /// 100 + (20 - 5).
  #[test]
  fn test_exact_match_scenario() {
    let processor = subcategory_processor(faces_catalog(), ProcessorConfig::default());
    let results = processor.search(&SearchQuery::new("happy").with_limit(20)).expect("search");

    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| r.relevance == 115.0));
    let items: Vec<_> = results.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(items, HAPPY);
  }

  #[test]
  fn test_no_match_is_empty() {
    let processor = builtin_processor();
    let results = processor.search(&SearchQuery::new("zzz_no_match").with_limit(10)).expect("search");
    assert!(results.is_empty());
  }

  /// Test: results respect the limit and never increase in relevance.
  #[test]
  fn test_limit_and_ordering() {
    let processor = builtin_processor();
    for query in ["a", "s", "an", "e"] {
      for limit in [1, 5, 13] {
        let results = processor.search(&SearchQuery::new(query).with_limit(limit)).expect("search");
        assert!(results.len() <= limit, "{query} limit {limit}");
        assert!(
          results.windows(2).all(|w| w[0].relevance >= w[1].relevance),
          "{query} results must be sorted"
        );
      }
    }
  }

  /// Test: a failed search has no effect on statistics.
  #[test]
  fn test_unknown_category_has_no_side_effects() {
    let processor = builtin_processor();
    let err = processor
      .search(&SearchQuery::new("happy").with_category("flags"))
      .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(processor.stats().snapshot.total, 0);
    assert!(processor.stats().snapshot.categories.is_empty());
  }

  /// Test: 5 workers x 20 queries accounts for every query.
  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_queries_totals() {
    let processor = builtin_processor();
    let outcome = processor.run_concurrent_queries(5, 20, CancellationToken::new()).await;

    assert_eq!(outcome.total_queries, 100);
    assert_eq!(outcome.total_success + outcome.total_errors, outcome.total_queries);
    assert_eq!(outcome.total_errors, 0);
    assert_eq!(outcome.failed_workers, 0);
    assert!(!outcome.cancelled);
    let ids: Vec<_> = outcome.workers.iter().map(|w| w.worker_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
  }

  /// Test: a plan that mixes valid and unknown filters splits successes and
  /// errors without stopping any worker.
  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_queries_with_failing_plan() {
    let processor = builtin_processor();
    let plan: QueryPlan = Arc::new(|_: usize, n: usize| {
      let query = SearchQuery::new("happy");
      if n % 4 == 0 { query.with_category("flags") } else { query.with_category("faces") }
    });

    let outcome = processor
      .run_queries_with_plan(plan, 3, 8, CancellationToken::new())
      .await;

    assert_eq!(outcome.total_queries, 24);
    assert_eq!(outcome.total_errors, 6);
    assert_eq!(outcome.total_success, 18);
    assert!(outcome.workers.iter().all(|w| w.queries_run() == 8));
  }
}
