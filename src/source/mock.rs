//! Scripted SourceClient double shared by the core's tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::client::SourceClient;
use super::error::SourceError;
use super::types::{ItemKind, LibraryDescriptor, LibraryKind, MediaItem, SubtitleTrack};

/// Scripted reply for one mock endpoint.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
  Ok(T),
  Timeout,
  Unavailable,
  Unauthorized,
}

impl<T: Clone> Reply<T> {
  fn to_result(&self) -> Result<T, SourceError> {
    match self {
      Reply::Ok(value) => Ok(value.clone()),
      Reply::Timeout => Err(SourceError::Timeout),
      Reply::Unavailable => Err(SourceError::SourceUnavailable("mock".to_string())),
      Reply::Unauthorized => Err(SourceError::Unauthorized("mock".to_string())),
    }
  }
}

/// In-memory SourceClient with canned responses and optional per-key delays.
#[derive(Default)]
pub(crate) struct MockSource {
  pub server_id: String,
  pub source_name: String,
  pub libraries: Vec<LibraryDescriptor>,
  pub items: HashMap<String, Reply<Vec<MediaItem>>>,
  pub episodes: HashMap<String, Reply<Vec<MediaItem>>>,
  pub stream_urls: HashMap<String, Reply<String>>,
  pub subtitle_tracks: HashMap<String, Reply<Vec<SubtitleTrack>>>,
  /// Keyed by `"{unit_id}:{index}"`.
  pub subtitle_urls: HashMap<String, Reply<String>>,
  /// Artificial response latency per library id, to vary arrival order.
  pub delays_ms: HashMap<String, u64>,
}

impl MockSource {
  pub fn new(server_id: &str) -> Self {
    Self {
      server_id: server_id.to_string(),
      source_name: format!("mock-{}", server_id),
      ..Default::default()
    }
  }
}

#[async_trait]
impl SourceClient for MockSource {
  fn name(&self) -> &str {
    &self.source_name
  }

  fn server_id(&self) -> &str {
    &self.server_id
  }

  async fn list_libraries(&self) -> Result<Vec<LibraryDescriptor>, SourceError> {
    Ok(self.libraries.clone())
  }

  async fn list_items(&self, library_id: &str) -> Result<Vec<MediaItem>, SourceError> {
    if let Some(ms) = self.delays_ms.get(library_id) {
      tokio::time::sleep(Duration::from_millis(*ms)).await;
    }
    self
      .items
      .get(library_id)
      .map(Reply::to_result)
      .unwrap_or_else(|| Ok(Vec::new()))
  }

  async fn list_episodes(&self, series_id: &str) -> Result<Vec<MediaItem>, SourceError> {
    self
      .episodes
      .get(series_id)
      .map(Reply::to_result)
      .unwrap_or_else(|| Err(SourceError::Unknown(format!("unknown series {}", series_id))))
  }

  async fn resolve_stream_url(&self, unit_id: &str) -> Result<String, SourceError> {
    self
      .stream_urls
      .get(unit_id)
      .map(Reply::to_result)
      .unwrap_or_else(|| Err(SourceError::NotPlayable(unit_id.to_string())))
  }

  async fn list_subtitle_tracks(&self, unit_id: &str) -> Result<Vec<SubtitleTrack>, SourceError> {
    self
      .subtitle_tracks
      .get(unit_id)
      .map(Reply::to_result)
      .unwrap_or_else(|| Ok(Vec::new()))
  }

  async fn resolve_subtitle_url(&self, track: &SubtitleTrack) -> Result<String, SourceError> {
    let key = format!("{}:{}", track.unit_id, track.index);
    self
      .subtitle_urls
      .get(&key)
      .map(Reply::to_result)
      .unwrap_or_else(|| Err(SourceError::Unknown(format!("no url for track {}", key))))
  }
}

/// Bare item helper for tests.
pub(crate) fn item(id: &str, name: &str, server_id: &str, kind: ItemKind) -> MediaItem {
  MediaItem {
    id: id.to_string(),
    name: name.to_string(),
    server_id: server_id.to_string(),
    kind,
    parent_id: None,
    season_index: None,
    episode_index: None,
    sort_name: None,
    runtime_seconds: None,
    user_progress: None,
    size_bytes: None,
    modified_at: None,
  }
}

/// Library helper for tests.
pub(crate) fn library(id: &str, server_id: &str) -> LibraryDescriptor {
  LibraryDescriptor {
    id: id.to_string(),
    name: id.to_string(),
    server_id: server_id.to_string(),
    kind: LibraryKind::Mixed,
  }
}
