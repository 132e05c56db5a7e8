//! Persisted user state: library selections and sort preferences.
//!
//! - `kv.rs` - opaque key-value byte storage collaborator
//! - `library_config.rs` - per-server library visibility
//! - `sort.rs` - per-view sort preferences + the pure sort function

pub mod kv;
pub mod library_config;
pub mod sort;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use library_config::{LibraryConfigStore, LibrarySelection};
pub use sort::{sort_items, SortOption, SortPreference, SortPreferenceStore};
