//! Playback resolution of a selected playable unit.

pub mod resolver;

pub use resolver::{resolve, validate_playability, PlaybackBundle};
