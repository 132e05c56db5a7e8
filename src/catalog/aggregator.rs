//! Catalog aggregation: concurrent per-library fetches merged into one listing.

use futures_util::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::source::client::SourceClient;
use crate::source::error::SourceError;
use crate::source::types::{LibraryDescriptor, MediaItem};
use crate::store::library_config::LibraryConfigStore;
use crate::store::sort::compare_names;

/// Identifies one listing request so the caller can discard results that a
/// newer request superseded. In-flight fetches are not aborted; their
/// results simply fail the `is_current` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingToken(u64);

/// Merges media listings across the selected libraries of one server.
pub struct CatalogAggregator {
  library_config: Arc<LibraryConfigStore>,
  generation: AtomicU64,
}

impl CatalogAggregator {
  pub fn new(library_config: Arc<LibraryConfigStore>) -> Self {
    Self {
      library_config,
      generation: AtomicU64::new(0),
    }
  }

  /// Start a new listing generation, superseding any previous one.
  pub fn begin_listing(&self) -> ListingToken {
    ListingToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
  }

  /// Whether results for this token are still the latest request.
  pub fn is_current(&self, token: ListingToken) -> bool {
    self.generation.load(Ordering::SeqCst) == token.0
  }

  /// List the merged catalog of a server.
  ///
  /// Fans out one fetch per visible library and waits for every branch.
  /// If at least one library succeeds, the union of the successful items is
  /// returned sorted case-insensitively by name; per-library failures are
  /// logged only. If every library fails, the first error (in library
  /// enumeration order) is the call's failure.
  ///
  /// The output is deterministic for a fixed set of per-library results:
  /// branches are collected in enumeration order regardless of arrival
  /// order, and the final sort is stable, so equal names keep that order.
  pub async fn list_merged(
    &self,
    server_id: &str,
    libraries: &[LibraryDescriptor],
    source: &dyn SourceClient,
  ) -> Result<Vec<MediaItem>, SourceError> {
    let selected = self.library_config.filter(libraries, server_id);
    if selected.is_empty() {
      return Ok(Vec::new());
    }

    let fetches = selected.iter().map(|library| async move {
      let result = source.list_items(&library.id).await;
      (library, result)
    });
    let results = join_all(fetches).await;

    let mut merged = Vec::new();
    let mut succeeded = 0usize;
    let mut first_error = None;

    for (library, result) in results {
      match result {
        Ok(items) => {
          succeeded += 1;
          merged.extend(items);
        }
        Err(e) => {
          log::warn!("Listing library {} ({}) failed: {}", library.name, library.id, e);
          if first_error.is_none() {
            first_error = Some(e);
          }
        }
      }
    }

    if succeeded == 0 {
      if let Some(error) = first_error {
        return Err(error);
      }
    }

    merged.sort_by(compare_names);
    Ok(merged)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::mock::{item, library, MockSource, Reply};
  use crate::source::types::ItemKind;
  use crate::store::kv::MemoryStore;
  use crate::store::library_config::LibrarySelection;
  use std::collections::BTreeSet;

  fn aggregator() -> CatalogAggregator {
    CatalogAggregator::new(Arc::new(LibraryConfigStore::new(Arc::new(MemoryStore::new()))))
  }

  fn movie(id: &str, name: &str) -> crate::source::types::MediaItem {
    item(id, name, "s1", ItemKind::Movie)
  }

  #[tokio::test]
  async fn test_partial_failure_returns_sorted_union() {
    let mut source = MockSource::new("s1");
    source.items.insert(
      "l1".to_string(),
      Reply::Ok(vec![movie("1", "Banana"), movie("2", "apple")]),
    );
    source.items.insert("l2".to_string(), Reply::Timeout);

    let libs = vec![library("l1", "s1"), library("l2", "s1")];
    let merged = aggregator()
      .list_merged("s1", &libs, &source)
      .await
      .unwrap();

    let names: Vec<_> = merged.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["apple", "Banana"]);
  }

  #[tokio::test]
  async fn test_all_failed_surfaces_first_error() {
    let mut source = MockSource::new("s1");
    source.items.insert("l1".to_string(), Reply::Timeout);
    source.items.insert("l2".to_string(), Reply::Unavailable);

    let libs = vec![library("l1", "s1"), library("l2", "s1")];
    let err = aggregator()
      .list_merged("s1", &libs, &source)
      .await
      .unwrap_err();

    assert!(matches!(err, SourceError::Timeout));
  }

  #[tokio::test]
  async fn test_output_is_independent_of_arrival_order() {
    let libs = vec![library("l1", "s1"), library("l2", "s1")];

    let mut fast_first = MockSource::new("s1");
    fast_first
      .items
      .insert("l1".to_string(), Reply::Ok(vec![movie("1", "Same"), movie("2", "Zeta")]));
    fast_first
      .items
      .insert("l2".to_string(), Reply::Ok(vec![movie("3", "Same"), movie("4", "Alpha")]));

    let mut slow_first = MockSource::new("s1");
    slow_first.items = fast_first.items.clone();
    // Delay l1 so l2's response arrives first.
    slow_first.delays_ms.insert("l1".to_string(), 30);

    let agg = aggregator();
    let a = agg.list_merged("s1", &libs, &fast_first).await.unwrap();
    let b = agg.list_merged("s1", &libs, &slow_first).await.unwrap();

    let ids_a: Vec<_> = a.iter().map(|i| i.id.as_str()).collect();
    let ids_b: Vec<_> = b.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
    // Equal names keep library enumeration order: l1's "Same" before l2's.
    assert_eq!(ids_a, vec!["4", "1", "3", "2"]);
  }

  #[tokio::test]
  async fn test_selection_filters_fetches() {
    let config = Arc::new(LibraryConfigStore::new(Arc::new(MemoryStore::new())));
    config.save(LibrarySelection::new("s1", BTreeSet::from(["l2".to_string()])));
    let agg = CatalogAggregator::new(config);

    let mut source = MockSource::new("s1");
    // l1 would fail if it were fetched; the selection hides it.
    source.items.insert("l1".to_string(), Reply::Unavailable);
    source
      .items
      .insert("l2".to_string(), Reply::Ok(vec![movie("1", "Kept")]));

    let libs = vec![library("l1", "s1"), library("l2", "s1")];
    let merged = agg.list_merged("s1", &libs, &source).await.unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "Kept");
  }

  #[tokio::test]
  async fn test_no_libraries_is_empty_success() {
    let source = MockSource::new("s1");
    let merged = aggregator().list_merged("s1", &[], &source).await.unwrap();
    assert!(merged.is_empty());
  }

  #[test]
  fn test_new_listing_supersedes_previous() {
    let agg = aggregator();
    let first = agg.begin_listing();
    assert!(agg.is_current(first));

    let second = agg.begin_listing();
    assert!(!agg.is_current(first));
    assert!(agg.is_current(second));
  }
}
