//! Day-over-day, week-over-week and month-over-month deltas.
//!
//! Pure functions over snapshots already in memory. A delta exists only
//! when a snapshot was recorded on exactly `base - N` days; gaps are never
//! interpolated.

use chrono::{Days, NaiveDate};

use crate::models::{MetricChange, Snapshot, SnapshotEntry, Variation, VenueMetrics};

/// Lookback windows in days: 24h, 7d, 30d.
pub const LOOKBACK_DAYS: [u64; 3] = [1, 7, 30];

/// The dates whose snapshots a variation as of `base` needs.
pub fn lookback_dates(base: NaiveDate) -> Vec<NaiveDate> {
    LOOKBACK_DAYS
        .iter()
        .filter_map(|days| base.checked_sub_days(Days::new(*days)))
        .collect()
}

/// `(current - previous) / previous`, or `None` when there is no usable
/// anchor. A zero anchor yields `None` rather than an infinite ratio.
pub fn percent_change(current: f64, previous: Option<f64>) -> Option<f64> {
    let previous = previous?;
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    let change = (current - previous) / previous;
    change.is_finite().then_some(change)
}

fn anchor<'a>(history: &'a [Snapshot], date: Option<NaiveDate>, venue_id: &str) -> Option<&'a SnapshotEntry> {
    let date = date?;
    history
        .iter()
        .find(|s| s.date == date)
        .and_then(|s| s.data.get(venue_id))
}

/// Variation of one venue's `current` figures as of `base`, against the
/// snapshots in `history` (which may hold any dates; only exact matches
/// on the lookback dates are used).
pub fn compute_variation(
    venue_id: &str,
    current: &SnapshotEntry,
    base: NaiveDate,
    history: &[Snapshot],
) -> Variation {
    let anchors: Vec<Option<&SnapshotEntry>> = LOOKBACK_DAYS
        .iter()
        .map(|days| anchor(history, base.checked_sub_days(Days::new(*days)), venue_id))
        .collect();

    let change = |metric: fn(&SnapshotEntry) -> f64| MetricChange {
        change_24h: percent_change(metric(current), anchors[0].map(metric)),
        change_7d: percent_change(metric(current), anchors[1].map(metric)),
        change_30d: percent_change(metric(current), anchors[2].map(metric)),
    };

    Variation {
        volume: change(|e| e.volume_24h),
        open_interest: change(|e| e.open_interest),
    }
}

/// Attaches a variation block to every record. An empty `history` (for
/// instance after a storage failure) yields all-missing deltas.
pub fn apply_variation(metrics: &mut [VenueMetrics], base: NaiveDate, history: &[Snapshot]) {
    for m in metrics.iter_mut() {
        let current = SnapshotEntry {
            volume_24h: m.volume_24h,
            open_interest: m.open_interest,
        };
        m.variation = Some(compute_variation(&m.id, &current, base, history));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn snapshot(d: &str, venue: &str, volume: f64, oi: f64) -> Snapshot {
        Snapshot::new(
            date(d),
            BTreeMap::from([(
                venue.to_string(),
                SnapshotEntry {
                    volume_24h: volume,
                    open_interest: oi,
                },
            )]),
        )
    }

    #[test]
    fn test_lookback_dates() {
        assert_eq!(
            lookback_dates(date("2024-03-01")),
            vec![date("2024-02-29"), date("2024-02-23"), date("2024-01-31")]
        );
    }

    #[test]
    fn test_day_over_day_change() {
        let history = vec![snapshot("2024-01-01", "a", 100.0, 0.0)];
        let current = SnapshotEntry {
            volume_24h: 150.0,
            open_interest: 10.0,
        };

        let variation = compute_variation("a", &current, date("2024-01-02"), &history);
        assert_eq!(variation.volume.change_24h, Some(0.5));
        assert_eq!(variation.volume.change_7d, None);
        assert_eq!(variation.volume.change_30d, None);
        // zero anchor
        assert_eq!(variation.open_interest.change_24h, None);
    }

    #[test]
    fn test_gap_yields_missing_delta() {
        let history = vec![
            snapshot("2024-01-01", "a", 100.0, 1.0),
            snapshot("2024-01-02", "a", 150.0, 1.0),
        ];
        let current = history[1].data["a"];

        let variation = compute_variation("a", &current, date("2024-01-10"), &history);
        assert_eq!(variation.volume.change_24h, None);
        assert!(variation.volume.is_empty());
        assert!(variation.open_interest.is_empty());
    }

    #[test]
    fn test_all_windows() {
        let history = vec![
            snapshot("2024-01-30", "a", 200.0, 100.0),
            snapshot("2024-01-24", "a", 400.0, 50.0),
            snapshot("2024-01-01", "a", 100.0, 200.0),
            snapshot("2024-01-30", "b", 1.0, 1.0),
        ];
        let current = SnapshotEntry {
            volume_24h: 100.0,
            open_interest: 100.0,
        };

        let variation = compute_variation("a", &current, date("2024-01-31"), &history);
        assert_eq!(variation.volume.change_24h, Some(-0.5));
        assert_eq!(variation.volume.change_7d, Some(-0.75));
        assert_eq!(variation.volume.change_30d, Some(0.0));
        assert_eq!(variation.open_interest.change_24h, Some(0.0));
        assert_eq!(variation.open_interest.change_7d, Some(1.0));
        assert_eq!(variation.open_interest.change_30d, Some(-0.5));
    }

    #[test]
    fn test_percent_change_guards() {
        assert_eq!(percent_change(10.0, Some(0.0)), None);
        assert_eq!(percent_change(0.0, Some(0.0)), None);
        assert_eq!(percent_change(10.0, None), None);
        assert_eq!(percent_change(f64::NAN, Some(1.0)), None);
        assert_eq!(percent_change(0.0, Some(4.0)), Some(-1.0));
    }

    #[test]
    fn test_apply_variation_with_empty_history() {
        let venue = crate::registry::venue("drift").unwrap();
        let mut metrics = vec![VenueMetrics::from_venue(venue)];
        apply_variation(&mut metrics, date("2024-01-31"), &[]);

        let variation = metrics[0].variation.unwrap();
        assert!(variation.volume.is_empty());
        assert!(variation.open_interest.is_empty());
    }
}
