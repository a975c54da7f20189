//! Fallback resolution through the shared metrics aggregator.
//!
//! - [`feed`] - The aggregator's derivatives and open-interest overviews
//! - [`resolver`] - Alias matching plus the static fallback tier

mod feed;
mod resolver;

pub use feed::{LlamaFeed, OverviewEntry, OverviewFeed, OverviewKind};
pub use resolver::FallbackResolver;
