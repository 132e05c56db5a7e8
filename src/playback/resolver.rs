//! Playback resolution: turn a playable unit into a player-ready bundle.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::catalog::normalizer::PlayableUnit;
use crate::source::client::SourceClient;
use crate::source::error::SourceError;
use crate::source::types::{has_extension, ItemKind, VIDEO_EXTENSIONS};

/// Everything the external player needs for one playback attempt.
///
/// A bundle always carries a non-empty stream URL; resolution failure is a
/// [`SourceError`], never a sentinel value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackBundle {
  pub stream_url: String,
  pub subtitle_urls: Vec<String>,
  pub source_name: String,
}

/// Cheap synchronous pre-check before any network call.
///
/// The wrapped item must match the unit variant, carry an ID, and - for
/// file-backed movies - a playable video extension.
pub fn validate_playability(unit: &PlayableUnit) -> bool {
  let item = unit.item();
  if item.id.is_empty() {
    return false;
  }

  match unit {
    PlayableUnit::Movie { item } => {
      item.kind == ItemKind::Movie
        && (!is_file_backed(&item.id) || has_extension(&item.name, VIDEO_EXTENSIONS))
    }
    PlayableUnit::Episode { item, .. } => item.kind == ItemKind::Episode,
  }
}

/// Item IDs that are themselves resource URLs (WebDAV files).
fn is_file_backed(id: &str) -> bool {
  id.starts_with("http://") || id.starts_with("https://")
}

/// Resolve the stream URL and subtitle URLs for one unit.
///
/// The stream lookup and the subtitle pipeline run concurrently; the bundle
/// is produced once both are done. A failed stream lookup fails the call.
/// Subtitle problems never do: a failed track listing degrades to no
/// subtitles, and tracks whose delivery URL cannot be resolved are dropped.
pub async fn resolve(
  unit: &PlayableUnit,
  source: &dyn SourceClient,
) -> Result<PlaybackBundle, SourceError> {
  if !validate_playability(unit) {
    return Err(SourceError::NotPlayable(unit.item().name.clone()));
  }

  let unit_id = unit.unit_id();
  let (stream, subtitle_urls) =
    tokio::join!(source.resolve_stream_url(unit_id), collect_subtitle_urls(unit_id, source));

  let stream_url = stream?;
  if stream_url.is_empty() {
    return Err(SourceError::NotPlayable(format!("empty stream URL for {}", unit_id)));
  }

  Ok(PlaybackBundle {
    stream_url,
    subtitle_urls,
    source_name: source.name().to_string(),
  })
}

async fn collect_subtitle_urls(unit_id: &str, source: &dyn SourceClient) -> Vec<String> {
  let tracks = match source.list_subtitle_tracks(unit_id).await {
    Ok(tracks) => tracks,
    Err(e) => {
      log::warn!("Listing subtitle tracks for {} failed: {}", unit_id, e);
      return Vec::new();
    }
  };

  let resolutions = join_all(
    tracks
      .iter()
      .map(|track| async move { (track, source.resolve_subtitle_url(track).await) }),
  )
  .await;

  let mut urls = Vec::new();
  for (track, result) in resolutions {
    match result {
      Ok(url) => urls.push(url),
      Err(e) => {
        log::debug!("Dropping subtitle track {} of {}: {}", track.index, unit_id, e);
      }
    }
  }
  urls
}
