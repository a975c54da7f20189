//! Sanity bounds for figures reported by upstream sources.
//!
//! Upstream payloads are not trusted blindly. The bounds are loose enough for
//! the largest venues while catching unit and decimal errors:
//!
//! 1. VOLUME / OI: the largest venues report tens of billions per day. A
//!    single venue above $10T is a unit error (base units or cents).
//!
//! 2. PRICE: an instrument mark price above $10M is almost certainly a
//!    scaling error, and would multiply open interest into nonsense.

// ============================================
// Bounds
// ============================================

/// Maximum plausible USD amount (volume, OI, TVL) for one venue.
pub const MAX_VENUE_USD: f64 = 1e13;

/// Maximum plausible mark price of a single instrument.
pub const MAX_MARK_PRICE_USD: f64 = 1e7;

// ============================================
// Helpers
// ============================================

/// Validate a venue-level USD amount.
/// Returns `None` (no opinion) rather than zero when the figure is unusable.
#[inline]
pub fn validate_usd_amount(amount: f64) -> Option<f64> {
    if amount >= 0.0 && amount.is_finite() && amount <= MAX_VENUE_USD {
        Some(amount)
    } else {
        None
    }
}

/// Validate an instrument mark price. Zero is rejected since it would
/// silently erase that instrument's open interest.
#[inline]
pub fn validate_mark_price(price: f64) -> Option<f64> {
    if price > 0.0 && price.is_finite() && price <= MAX_MARK_PRICE_USD {
        Some(price)
    } else {
        None
    }
}

/// Notional USD value of a base-unit open interest at a mark price.
/// Returns 0.0 for an instrument whose inputs are unusable so one bad
/// market does not poison the venue total.
#[inline]
pub fn notional_usd(base_units: f64, mark_price: f64) -> f64 {
    match validate_mark_price(mark_price) {
        Some(price) if base_units.is_finite() && base_units > 0.0 => base_units * price,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_usd_amount() {
        assert_eq!(validate_usd_amount(0.0), Some(0.0));
        assert_eq!(validate_usd_amount(1.5e9), Some(1.5e9));
        assert_eq!(validate_usd_amount(-1.0), None);
        assert_eq!(validate_usd_amount(f64::NAN), None);
        assert_eq!(validate_usd_amount(2e13), None);
    }

    #[test]
    fn test_notional_skips_bad_instruments() {
        assert_eq!(notional_usd(2.0, 50_000.0), 100_000.0);
        assert_eq!(notional_usd(2.0, 0.0), 0.0);
        assert_eq!(notional_usd(f64::NAN, 10.0), 0.0);
        assert_eq!(notional_usd(3.0, 1e9), 0.0);
    }
}
