//! Utility functions shared by connectors and the orchestrator.
//!
//! - [`validation`] - Sanity bounds for upstream USD figures
//! - [`conversion`] - Lenient number/string decoding for upstream JSON
//! - [`batch`] - Best-effort concurrent fan-out with per-task outcomes

mod batch;
mod conversion;
mod validation;

// ============================================
// Re-exports
// ============================================

// Fan-out
pub use batch::{fetch_in_batches, join_all_outcomes, Outcome, Task};

// Conversion utilities
pub use conversion::{de_f64_lenient, de_opt_f64_lenient, str_to_f64};

// Validation utilities
pub use validation::{
    notional_usd, validate_mark_price, validate_usd_amount, MAX_MARK_PRICE_USD, MAX_VENUE_USD,
};
