use crate::models::PartialRecord;

/// Last-resort figures for a venue, used only for fields no live source
/// reports. Seeded with conservative historical estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackEstimate {
    pub venue_id: &'static str,
    pub volume_24h: f64,
    pub open_interest: f64,
    pub pair_count: u32,
}

impl FallbackEstimate {
    pub fn to_record(&self) -> PartialRecord {
        PartialRecord::default()
            .with_volume_24h(self.volume_24h)
            .with_open_interest(self.open_interest)
            .with_pair_count(self.pair_count)
    }
}

const fn estimate(venue_id: &'static str, volume_24h: f64, open_interest: f64, pair_count: u32) -> FallbackEstimate {
    FallbackEstimate {
        venue_id,
        volume_24h,
        open_interest,
        pair_count,
    }
}

pub static FALLBACK_ESTIMATES: &[FallbackEstimate] = &[
    estimate("hyperliquid", 6_000_000_000.0, 8_000_000_000.0, 180),
    estimate("aster", 2_000_000_000.0, 1_500_000_000.0, 150),
    estimate("lighter", 1_500_000_000.0, 700_000_000.0, 90),
    estimate("edgex", 1_000_000_000.0, 500_000_000.0, 80),
    estimate("jupiter", 300_000_000.0, 450_000_000.0, 5),
    estimate("gmx", 200_000_000.0, 300_000_000.0, 80),
    estimate("dydx", 150_000_000.0, 150_000_000.0, 200),
    estimate("paradex", 500_000_000.0, 250_000_000.0, 100),
    estimate("drift", 100_000_000.0, 200_000_000.0, 60),
    estimate("apex", 300_000_000.0, 80_000_000.0, 70),
    estimate("orderly", 150_000_000.0, 60_000_000.0, 90),
    estimate("vertex", 50_000_000.0, 20_000_000.0, 40),
    estimate("bluefin", 60_000_000.0, 30_000_000.0, 30),
    estimate("extended", 200_000_000.0, 120_000_000.0, 60),
    estimate("pacifica", 250_000_000.0, 100_000_000.0, 40),
    estimate("gains", 60_000_000.0, 50_000_000.0, 250),
    estimate("avantis", 80_000_000.0, 60_000_000.0, 80),
    estimate("ostium", 40_000_000.0, 40_000_000.0, 30),
    estimate("grvt", 150_000_000.0, 70_000_000.0, 70),
    estimate("hibachi", 30_000_000.0, 10_000_000.0, 15),
];
