//! Core catalog types shared by all source adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File extensions treated as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
  "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "ts", "m2ts", "m4v", "mpg", "mpeg",
];

/// File extensions treated as subtitle tracks.
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "vtt"];

/// Kind of a browsable library collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryKind {
  Movies,
  Shows,
  Folders,
  Mixed,
}

/// A named, browsable collection of media items on one server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDescriptor {
  pub id: String,
  pub name: String,
  pub server_id: String,
  pub kind: LibraryKind,
}

/// Kind of a media item as reported by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
  Movie,
  Series,
  Episode,
  Folder,
}

/// A media item snapshot returned by a source.
///
/// Identity is `(server_id, id)`. Items are read-only; the core never
/// mutates them beyond computing display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
  pub id: String,
  pub name: String,
  pub server_id: String,
  pub kind: ItemKind,
  #[serde(default)]
  pub parent_id: Option<String>,
  #[serde(default)]
  pub season_index: Option<u32>,
  #[serde(default)]
  pub episode_index: Option<u32>,
  #[serde(default)]
  pub sort_name: Option<String>,
  #[serde(default)]
  pub runtime_seconds: Option<u64>,
  /// Watch progress in 0.0..=1.0, carried opaquely for the UI.
  #[serde(default)]
  pub user_progress: Option<f64>,
  #[serde(default)]
  pub size_bytes: Option<u64>,
  #[serde(default)]
  pub modified_at: Option<DateTime<Utc>>,
}

impl MediaItem {
  /// True for kinds that resolve to a single direct stream.
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, ItemKind::Movie | ItemKind::Episode)
  }
}

/// A subtitle track advertised by a source for one playable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
  pub unit_id: String,
  pub index: i32,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub format: Option<String>,
  /// Server-relative delivery path, when the source exposes one. Tracks
  /// without a resolvable delivery are dropped during playback resolution.
  #[serde(default)]
  pub delivery_path: Option<String>,
}

/// Case-insensitive extension check against an extension list.
pub fn has_extension(name: &str, extensions: &[&str]) -> bool {
  match name.rsplit_once('.') {
    Some((_, ext)) => extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)),
    None => false,
  }
}
