//! Library aggregation and playable-unit normalization.
//!
//! - `aggregator.rs` - concurrent per-library fan-out merged into one listing
//! - `normalizer.rs` - movies and series unified into ordered playable units

pub mod aggregator;
pub mod normalizer;

pub use aggregator::{CatalogAggregator, ListingToken};
pub use normalizer::{expand, PlayableUnit};
