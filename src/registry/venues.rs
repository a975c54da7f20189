/// Static metadata for one perpetual-futures venue.
///
/// These fields change rarely and upstream payloads are unreliable for them,
/// so they always win over anything fetched live.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueInfo {
    /// Stable slug, the key everywhere (snapshots, contributions, results)
    pub id: &'static str,
    pub name: &'static str,
    pub chain: &'static str,
    pub maker_fee: &'static str,
    pub taker_fee: &'static str,
    pub max_leverage: &'static str,
    pub referral_url: &'static str,
    pub icon: &'static str,
    /// Names the shared aggregator may list this venue under (slug, display
    /// name, numeric id). Matched case-insensitively.
    pub aliases: &'static [&'static str],
}

impl VenueInfo {
    pub fn matches_alias(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty()
            && (self.id.eq_ignore_ascii_case(candidate)
                || self.name.eq_ignore_ascii_case(candidate)
                || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(candidate)))
    }
}

pub static VENUES: &[VenueInfo] = &[
    VenueInfo {
        id: "hyperliquid",
        name: "Hyperliquid",
        chain: "Hyperliquid L1",
        maker_fee: "0.015%",
        taker_fee: "0.045%",
        max_leverage: "40x",
        referral_url: "https://app.hyperliquid.xyz/trade",
        icon: "/icons/hyperliquid.svg",
        aliases: &["hyperliquid-perps", "Hyperliquid Perps", "5507"],
    },
    VenueInfo {
        id: "aster",
        name: "Aster",
        chain: "BNB Chain",
        maker_fee: "0.01%",
        taker_fee: "0.035%",
        max_leverage: "1001x",
        referral_url: "https://www.asterdex.com/en/futures",
        icon: "/icons/aster.svg",
        aliases: &["aster-perps", "Aster Perps", "asterdex", "ApolloX"],
    },
    VenueInfo {
        id: "lighter",
        name: "Lighter",
        chain: "Ethereum (zk rollup)",
        maker_fee: "0%",
        taker_fee: "0%",
        max_leverage: "50x",
        referral_url: "https://app.lighter.xyz/trade",
        icon: "/icons/lighter.svg",
        aliases: &["lighter-perps", "Lighter Perps"],
    },
    VenueInfo {
        id: "edgex",
        name: "edgeX",
        chain: "StarkEx",
        maker_fee: "0.012%",
        taker_fee: "0.038%",
        max_leverage: "100x",
        referral_url: "https://pro.edgex.exchange/trade",
        icon: "/icons/edgex.svg",
        aliases: &["edgex-perps", "edgeX Perps"],
    },
    VenueInfo {
        id: "jupiter",
        name: "Jupiter Perps",
        chain: "Solana",
        maker_fee: "0.06%",
        taker_fee: "0.06%",
        max_leverage: "250x",
        referral_url: "https://jup.ag/perps",
        icon: "/icons/jupiter.svg",
        aliases: &["jupiter-perpetual-exchange", "Jupiter Perpetual Exchange", "jupiter-perps"],
    },
    VenueInfo {
        id: "gmx",
        name: "GMX",
        chain: "Arbitrum",
        maker_fee: "0.04%",
        taker_fee: "0.06%",
        max_leverage: "100x",
        referral_url: "https://app.gmx.io/#/trade",
        icon: "/icons/gmx.svg",
        aliases: &["gmx-v2-perps", "GMX V2 Perps", "gmx-v2", "gmx-perps"],
    },
    VenueInfo {
        id: "dydx",
        name: "dYdX",
        chain: "dYdX Chain",
        maker_fee: "0.01%",
        taker_fee: "0.05%",
        max_leverage: "50x",
        referral_url: "https://dydx.trade/trade/BTC-USD",
        icon: "/icons/dydx.svg",
        aliases: &["dydx-v4", "dYdX V4", "dydx-v4-perps"],
    },
    VenueInfo {
        id: "paradex",
        name: "Paradex",
        chain: "Paradex Chain",
        maker_fee: "0%",
        taker_fee: "0.02%",
        max_leverage: "50x",
        referral_url: "https://app.paradex.trade/trade/BTC-USD-PERP",
        icon: "/icons/paradex.svg",
        aliases: &["paradex-perps", "Paradex Perps"],
    },
    VenueInfo {
        id: "drift",
        name: "Drift",
        chain: "Solana",
        maker_fee: "-0.0025%",
        taker_fee: "0.035%",
        max_leverage: "101x",
        referral_url: "https://app.drift.trade/SOL-PERP",
        icon: "/icons/drift.svg",
        aliases: &["drift-trade", "Drift Trade", "drift-protocol", "Drift Protocol"],
    },
    VenueInfo {
        id: "apex",
        name: "ApeX Omni",
        chain: "Multichain",
        maker_fee: "0.02%",
        taker_fee: "0.05%",
        max_leverage: "100x",
        referral_url: "https://omni.apex.exchange/trade/BTCUSDT",
        icon: "/icons/apex.svg",
        aliases: &["apex-omni", "ApeX Protocol", "apex-pro"],
    },
    VenueInfo {
        id: "orderly",
        name: "Orderly",
        chain: "Multichain",
        maker_fee: "0.01%",
        taker_fee: "0.04%",
        max_leverage: "50x",
        referral_url: "https://orderly.network",
        icon: "/icons/orderly.svg",
        aliases: &["orderly-perps", "Orderly Perps", "orderly-network"],
    },
    VenueInfo {
        id: "vertex",
        name: "Vertex",
        chain: "Arbitrum",
        maker_fee: "0%",
        taker_fee: "0.02%",
        max_leverage: "20x",
        referral_url: "https://app.vertexprotocol.com",
        icon: "/icons/vertex.svg",
        aliases: &["vertex-perps", "Vertex Perps", "vertex-protocol"],
    },
    VenueInfo {
        id: "bluefin",
        name: "Bluefin",
        chain: "Sui",
        maker_fee: "0.01%",
        taker_fee: "0.035%",
        max_leverage: "20x",
        referral_url: "https://trade.bluefin.io",
        icon: "/icons/bluefin.svg",
        aliases: &["bluefin-perps", "Bluefin Perps"],
    },
    VenueInfo {
        id: "extended",
        name: "Extended",
        chain: "Starknet",
        maker_fee: "0%",
        taker_fee: "0.025%",
        max_leverage: "100x",
        referral_url: "https://app.extended.exchange/perp",
        icon: "/icons/extended.svg",
        aliases: &["extended-perps", "Extended Perps", "x10"],
    },
    VenueInfo {
        id: "pacifica",
        name: "Pacifica",
        chain: "Solana",
        maker_fee: "0.015%",
        taker_fee: "0.04%",
        max_leverage: "50x",
        referral_url: "https://app.pacifica.fi/trade",
        icon: "/icons/pacifica.svg",
        aliases: &["pacifica-perps", "Pacifica Perps"],
    },
    VenueInfo {
        id: "gains",
        name: "gTrade",
        chain: "Arbitrum",
        maker_fee: "0.03%",
        taker_fee: "0.06%",
        max_leverage: "1000x",
        referral_url: "https://gains.trade/trading",
        icon: "/icons/gains.svg",
        aliases: &["gains-network", "Gains Network", "gtrade"],
    },
    VenueInfo {
        id: "avantis",
        name: "Avantis",
        chain: "Base",
        maker_fee: "0%",
        taker_fee: "0.08%",
        max_leverage: "500x",
        referral_url: "https://www.avantisfi.com/trade",
        icon: "/icons/avantis.svg",
        aliases: &["avantis-perps", "Avantis Perps"],
    },
    VenueInfo {
        id: "ostium",
        name: "Ostium",
        chain: "Arbitrum",
        maker_fee: "0.03%",
        taker_fee: "0.1%",
        max_leverage: "200x",
        referral_url: "https://app.ostium.com/trade",
        icon: "/icons/ostium.svg",
        aliases: &["ostium-perps", "Ostium Perps"],
    },
    VenueInfo {
        id: "grvt",
        name: "GRVT",
        chain: "ZKsync",
        maker_fee: "-0.01%",
        taker_fee: "0.045%",
        max_leverage: "50x",
        referral_url: "https://grvt.io/exchange/perpetual/BTC-USDT",
        icon: "/icons/grvt.svg",
        aliases: &["grvt-perps", "GRVT Perps"],
    },
    VenueInfo {
        id: "hibachi",
        name: "Hibachi",
        chain: "Arbitrum",
        maker_fee: "0%",
        taker_fee: "0.045%",
        max_leverage: "20x",
        referral_url: "https://hibachi.xyz",
        icon: "/icons/hibachi.svg",
        aliases: &["hibachi-perps", "Hibachi Perps"],
    },
];
