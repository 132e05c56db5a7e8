//! Key-value persistence collaborator.
//!
//! The stores serialize their own records; this layer only moves opaque
//! bytes. `FileStore` keeps one file per key under the config directory,
//! `MemoryStore` backs tests.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("no config directory available")]
  NoConfigDir,
}

/// Opaque byte storage keyed by string.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Option<Vec<u8>>;
  fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
  fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// File-backed store: one file per key inside a base directory.
pub struct FileStore {
  base_dir: PathBuf,
}

impl FileStore {
  /// Store rooted at the platform config directory (`<config>/playshelf`).
  pub fn new() -> Result<Self, StoreError> {
    let base_dir = dirs::config_dir()
      .ok_or(StoreError::NoConfigDir)?
      .join("playshelf");
    Self::with_dir(base_dir)
  }

  pub fn with_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
    std::fs::create_dir_all(&base_dir)?;
    Ok(Self { base_dir })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    // Keys are internal identifiers; keep them filesystem-safe anyway.
    let safe: String = key
      .chars()
      .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
      .collect();
    self.base_dir.join(safe)
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> Option<Vec<u8>> {
    std::fs::read(self.path_for(key)).ok()
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
    let path = self.path_for(key);
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StoreError> {
    match std::fs::remove_file(self.path_for(key)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
  map: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Option<Vec<u8>> {
    self.map.lock().get(key).cloned()
  }

  fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
    self.map.lock().insert(key.to_string(), value.to_vec());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StoreError> {
    self.map.lock().remove(key);
    Ok(())
  }
}
