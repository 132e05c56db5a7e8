//! Per-server library visibility selections with persistence.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::kv::KeyValueStore;
use crate::source::types::LibraryDescriptor;

const SELECTIONS_KEY: &str = "library_selections";

/// The libraries a user has chosen to show for one server.
///
/// An empty `selected_library_ids` set means "show all", not "show none".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySelection {
  pub server_id: String,
  pub selected_library_ids: BTreeSet<String>,
  pub last_updated: DateTime<Utc>,
}

impl LibrarySelection {
  pub fn new(server_id: impl Into<String>, selected_library_ids: BTreeSet<String>) -> Self {
    Self {
      server_id: server_id.into(),
      selected_library_ids,
      last_updated: Utc::now(),
    }
  }
}

/// Persisted, per-server library visibility store.
///
/// A single instance is constructed at startup and shared by handle;
/// read-modify-write pairs are serialized by the write lock.
pub struct LibraryConfigStore {
  kv: Arc<dyn KeyValueStore>,
  selections: RwLock<HashMap<String, LibrarySelection>>,
}

impl LibraryConfigStore {
  pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
    let selections = Self::load(kv.as_ref());
    Self {
      kv,
      selections: RwLock::new(selections),
    }
  }

  fn load(kv: &dyn KeyValueStore) -> HashMap<String, LibrarySelection> {
    let Some(bytes) = kv.get(SELECTIONS_KEY) else {
      return HashMap::new();
    };
    match serde_json::from_slice(&bytes) {
      Ok(map) => map,
      Err(e) => {
        log::warn!("Failed to parse stored library selections: {}", e);
        HashMap::new()
      }
    }
  }

  /// Persist the full selection map. Failures are logged and swallowed;
  /// losing a selection degrades to "show all" on next load.
  fn persist(&self, selections: &HashMap<String, LibrarySelection>) {
    match serde_json::to_vec(selections) {
      Ok(bytes) => {
        if let Err(e) = self.kv.set(SELECTIONS_KEY, &bytes) {
          log::warn!("Failed to persist library selections: {}", e);
        }
      }
      Err(e) => log::warn!("Failed to encode library selections: {}", e),
    }
  }

  /// Selection for a server, if one was ever saved.
  pub fn get(&self, server_id: &str) -> Option<LibrarySelection> {
    self.selections.read().get(server_id).cloned()
  }

  /// Upsert a selection, keyed by its server ID.
  pub fn save(&self, selection: LibrarySelection) {
    let mut selections = self.selections.write();
    selections.insert(selection.server_id.clone(), selection);
    self.persist(&selections);
  }

  /// Drop the selection for a server, restoring "show all".
  pub fn clear(&self, server_id: &str) {
    let mut selections = self.selections.write();
    if selections.remove(server_id).is_some() {
      self.persist(&selections);
    }
  }

  /// Whether a library is visible for its server.
  ///
  /// True when no selection exists and when the stored set is empty
  /// (both mean "show all"), otherwise set membership.
  pub fn is_visible(&self, library_id: &str, server_id: &str) -> bool {
    let selections = self.selections.read();
    match selections.get(server_id) {
      None => true,
      Some(selection) if selection.selected_library_ids.is_empty() => true,
      Some(selection) => selection.selected_library_ids.contains(library_id),
    }
  }

  /// Keep only the visible libraries, preserving input order.
  pub fn filter(&self, libraries: &[LibraryDescriptor], server_id: &str) -> Vec<LibraryDescriptor> {
    libraries
      .iter()
      .filter(|lib| self.is_visible(&lib.id, server_id))
      .cloned()
      .collect()
  }

  /// Flip one library's membership in the server's selection.
  ///
  /// Creates the selection on first toggle. The read-modify-write runs
  /// under a single write lock so concurrent toggles cannot interleave.
  pub fn toggle(&self, server_id: &str, library_id: &str) {
    let mut selections = self.selections.write();
    let selection = selections
      .entry(server_id.to_string())
      .or_insert_with(|| LibrarySelection::new(server_id, BTreeSet::new()));

    if !selection.selected_library_ids.remove(library_id) {
      selection.selected_library_ids.insert(library_id.to_string());
    }
    selection.last_updated = Utc::now();
    self.persist(&selections);
  }
}
