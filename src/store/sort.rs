//! Per-view sort preferences and the pure sorting function.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use super::kv::KeyValueStore;
use crate::source::types::{ItemKind, MediaItem};

const PREFERENCES_KEY: &str = "sort_preferences";

/// What to sort a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
  Name,
  Date,
  Size,
}

/// Sort option and direction for one scope (directory path or view id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortPreference {
  pub option: SortOption,
  pub ascending: bool,
}

impl Default for SortPreference {
  fn default() -> Self {
    Self {
      option: SortOption::Name,
      ascending: true,
    }
  }
}

/// Persisted, last-write-wins sort preference store.
///
/// The store only remembers preferences; sorting is [`sort_items`],
/// applied by the caller.
pub struct SortPreferenceStore {
  kv: Arc<dyn KeyValueStore>,
  preferences: RwLock<HashMap<String, SortPreference>>,
}

impl SortPreferenceStore {
  pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
    let preferences = match kv.get(PREFERENCES_KEY) {
      Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        log::warn!("Failed to parse stored sort preferences: {}", e);
        HashMap::new()
      }),
      None => HashMap::new(),
    };
    Self {
      kv,
      preferences: RwLock::new(preferences),
    }
  }

  /// Preference for a scope; never fails, defaults to name ascending.
  pub fn get(&self, scope_key: &str) -> SortPreference {
    self
      .preferences
      .read()
      .get(scope_key)
      .copied()
      .unwrap_or_default()
  }

  /// Save a preference, persisting immediately. Last write wins.
  pub fn set(&self, scope_key: &str, preference: SortPreference) {
    let mut preferences = self.preferences.write();
    preferences.insert(scope_key.to_string(), preference);
    match serde_json::to_vec(&*preferences) {
      Ok(bytes) => {
        if let Err(e) = self.kv.set(PREFERENCES_KEY, &bytes) {
          log::warn!("Failed to persist sort preferences: {}", e);
        }
      }
      Err(e) => log::warn!("Failed to encode sort preferences: {}", e),
    }
  }
}

/// Sort a listing in place per a preference.
///
/// Folders always sort ahead of files regardless of direction; descending
/// flips only the key order. Missing dates and sizes sort as 0; name is
/// the final tie key.
pub fn sort_items(items: &mut [MediaItem], preference: &SortPreference) {
  items.sort_by(|a, b| {
    let a_folder = a.kind == ItemKind::Folder;
    let b_folder = b.kind == ItemKind::Folder;
    if a_folder != b_folder {
      return if a_folder { Ordering::Less } else { Ordering::Greater };
    }

    let key_order = match preference.option {
      SortOption::Name => compare_names(a, b),
      SortOption::Date => a
        .modified_at
        .map(|d| d.timestamp())
        .unwrap_or(0)
        .cmp(&b.modified_at.map(|d| d.timestamp()).unwrap_or(0)),
      SortOption::Size => a.size_bytes.unwrap_or(0).cmp(&b.size_bytes.unwrap_or(0)),
    };

    // Descending flips the key only; equal keys still tie-break by
    // ascending name.
    let key_order = if preference.ascending {
      key_order
    } else {
      key_order.reverse()
    };
    key_order.then_with(|| compare_names(a, b))
  });
}

/// Case-insensitive name ordering used across all listings.
pub fn compare_names(a: &MediaItem, b: &MediaItem) -> Ordering {
  a.name.to_lowercase().cmp(&b.name.to_lowercase())
}
