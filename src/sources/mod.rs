//! Venue-native source connectors.
//!
//! Each connector produces a [`PartialRecord`] for exactly one venue from
//! that venue's own API. Connectors are independent: they never call each
//! other, and the orchestrator runs them all through one fan-out where a
//! failure or timeout simply means "no contribution".
//!
//! Open interest is always reported as notional USD. Where a venue only
//! exposes base-unit OI, the connector multiplies by the instrument's mark
//! price and sums across active instruments.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::models::PartialRecord;

mod apex;
mod aster;
mod drift;
mod dydx;
mod http;
mod hyperliquid;
mod lighter;
mod orderly;
mod paradex;

pub use apex::ApexConnector;
pub use aster::AsterConnector;
pub use drift::DriftConnector;
pub use dydx::DydxConnector;
pub use http::HttpClient;
pub use hyperliquid::HyperliquidConnector;
pub use lighter::LighterConnector;
pub use orderly::OrderlyConnector;
pub use paradex::ParadexConnector;

/// One upstream source for one venue.
pub trait Connector: Send + Sync {
    /// Registry id of the venue this connector reports for.
    fn venue_id(&self) -> &'static str;

    /// Single attempt at collecting metrics. Errors are absorbed by the
    /// caller; implementations just propagate with `?`.
    fn attempt<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, anyhow::Result<PartialRecord>>;
}

/// Every native connector, in a fixed order. Order only matters as a tie
/// breaker if two connectors ever report for the same venue.
pub fn default_connectors() -> Vec<Arc<dyn Connector>> {
    vec![
        Arc::new(HyperliquidConnector::default()),
        Arc::new(AsterConnector::default()),
        Arc::new(LighterConnector::default()),
        Arc::new(DydxConnector::default()),
        Arc::new(ParadexConnector::default()),
        Arc::new(DriftConnector::default()),
        Arc::new(ApexConnector::default()),
        Arc::new(OrderlyConnector::default()),
    ]
}
