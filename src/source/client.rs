//! The SourceClient capability consumed by the aggregation and playback core.

use async_trait::async_trait;

use super::error::SourceError;
use super::types::{LibraryDescriptor, MediaItem, SubtitleTrack};

/// Abstract fetch operations over one media server.
///
/// Implemented by the WebDAV and Jellyfin adapters. The aggregation and
/// playback code never branches on which adapter it is talking to.
#[async_trait]
pub trait SourceClient: Send + Sync {
  /// Human-readable source name, shown alongside playback bundles.
  fn name(&self) -> &str;

  /// Stable identifier of the server this client talks to.
  fn server_id(&self) -> &str;

  /// List the browsable libraries on the server.
  async fn list_libraries(&self) -> Result<Vec<LibraryDescriptor>, SourceError>;

  /// List the items of one library.
  async fn list_items(&self, library_id: &str) -> Result<Vec<MediaItem>, SourceError>;

  /// List every episode of a series in one call.
  async fn list_episodes(&self, series_id: &str) -> Result<Vec<MediaItem>, SourceError>;

  /// Resolve a direct, player-ready stream URL for a playable unit.
  async fn resolve_stream_url(&self, unit_id: &str) -> Result<String, SourceError>;

  /// List the subtitle tracks available for a playable unit.
  async fn list_subtitle_tracks(&self, unit_id: &str) -> Result<Vec<SubtitleTrack>, SourceError>;

  /// Resolve the delivery URL of one subtitle track.
  async fn resolve_subtitle_url(&self, track: &SubtitleTrack) -> Result<String, SourceError>;
}
