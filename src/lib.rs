//! Playshelf core: unified library browsing and playback resolution over
//! heterogeneous media sources (WebDAV shares and Jellyfin servers).
//!
//! The UI asks the [`CatalogAggregator`] for a merged listing, expands a
//! picked item into playable units with [`catalog::expand`], and resolves a
//! unit into a [`PlaybackBundle`] with [`playback::resolve`] before handing
//! it to the external player.

use std::sync::Arc;

pub mod catalog;
pub mod config;
pub mod playback;
pub mod source;
pub mod store;

pub use catalog::{CatalogAggregator, ListingToken, PlayableUnit};
pub use config::{build_source, AppConfig, ServerConfig, ServerKind};
pub use playback::PlaybackBundle;
pub use source::{
  ItemKind, LibraryDescriptor, LibraryKind, MediaItem, SourceClient, SourceError, SubtitleTrack,
};
pub use store::{
  FileStore, KeyValueStore, LibraryConfigStore, LibrarySelection, MemoryStore, SortOption,
  SortPreference, SortPreferenceStore,
};

/// The core's long-lived services, constructed once at startup.
///
/// Stores are single instances shared by handle; nothing here is a global.
pub struct Core {
  pub library_config: Arc<LibraryConfigStore>,
  pub sort_preferences: Arc<SortPreferenceStore>,
  pub aggregator: CatalogAggregator,
}

impl Core {
  pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
    let library_config = Arc::new(LibraryConfigStore::new(kv.clone()));
    let sort_preferences = Arc::new(SortPreferenceStore::new(kv));
    let aggregator = CatalogAggregator::new(library_config.clone());

    Self {
      library_config,
      sort_preferences,
      aggregator,
    }
  }

  /// Core backed by the platform config directory.
  pub fn with_default_store() -> Result<Self, store::StoreError> {
    Ok(Self::new(Arc::new(FileStore::new()?)))
  }
}
