//! Normalization of movies and series into one list of playable units.

use serde::{Deserialize, Serialize};

use crate::source::client::SourceClient;
use crate::source::error::SourceError;
use crate::source::types::{ItemKind, MediaItem};

/// A directly playable leaf, never a folder or series container.
///
/// Movies and episodes flow through the same downstream path; this variant
/// is the only place the distinction survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PlayableUnit {
  /// A standalone movie; indices are forced to 0 regardless of raw fields.
  Movie { item: MediaItem },
  /// One episode of a series.
  Episode { item: MediaItem, season: u32, episode: u32 },
}

impl PlayableUnit {
  pub fn item(&self) -> &MediaItem {
    match self {
      PlayableUnit::Movie { item } => item,
      PlayableUnit::Episode { item, .. } => item,
    }
  }

  /// The source-side ID playback is resolved against.
  pub fn unit_id(&self) -> &str {
    &self.item().id
  }

  pub fn season_index(&self) -> u32 {
    match self {
      PlayableUnit::Movie { .. } => 0,
      PlayableUnit::Episode { season, .. } => *season,
    }
  }

  pub fn episode_index(&self) -> u32 {
    match self {
      PlayableUnit::Movie { .. } => 0,
      PlayableUnit::Episode { episode, .. } => *episode,
    }
  }
}

/// Expand a media item into its ordered playable units.
///
/// A movie yields exactly one synthetic unit. A series yields one unit per
/// episode (fetched in a single call), ordered by `(season, episode)` with
/// missing indices treated as 0. Anything else is not expandable.
pub async fn expand(
  item: &MediaItem,
  source: &dyn SourceClient,
) -> Result<Vec<PlayableUnit>, SourceError> {
  match item.kind {
    ItemKind::Movie => Ok(vec![PlayableUnit::Movie { item: item.clone() }]),
    ItemKind::Series => {
      let mut episodes = source.list_episodes(&item.id).await?;
      episodes.sort_by_key(|ep| (ep.season_index.unwrap_or(0), ep.episode_index.unwrap_or(0)));

      Ok(
        episodes
          .into_iter()
          .map(|ep| {
            let season = ep.season_index.unwrap_or(0);
            let episode = ep.episode_index.unwrap_or(0);
            PlayableUnit::Episode { item: ep, season, episode }
          })
          .collect(),
      )
    }
    kind => Err(SourceError::UnsupportedItemType(format!("{:?}", kind))),
  }
}
