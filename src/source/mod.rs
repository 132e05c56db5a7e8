//! Media source abstraction and its two concrete adapters.
//!
//! - `client.rs` - the SourceClient capability consumed by the core
//! - `types.rs` - catalog types (libraries, items, subtitle tracks)
//! - `error.rs` - source error taxonomy
//! - `jellyfin.rs` - Jellyfin REST adapter
//! - `webdav.rs` - WebDAV PROPFIND adapter

pub mod client;
pub mod error;
pub mod jellyfin;
pub mod types;
pub mod webdav;

pub use client::SourceClient;
pub use error::SourceError;
pub use jellyfin::{Credentials, JellyfinSource};
pub use types::{
  ItemKind, LibraryDescriptor, LibraryKind, MediaItem, SubtitleTrack, SUBTITLE_EXTENSIONS,
  VIDEO_EXTENSIONS,
};
pub use webdav::WebdavSource;

#[cfg(test)]
pub(crate) mod mock;
