use serde::{Deserialize, Serialize};

/// A coin the dashboard can chart.
///
/// Each coin is known under two ids: the spot-price API id (CoinGecko style,
/// e.g. "bitcoin") and the market-data ticker (Yahoo style, e.g. "BTC-USD").
///
/// **Equality** is based on `spot_id` only, so a coin looked up by name and
/// one built by hand compare equal as long as they point at the same asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Spot-price API id (e.g., "bitcoin")
    pub spot_id: String,

    /// Market-data ticker (e.g., "BTC-USD")
    pub ticker: String,

    /// Short display symbol (e.g., "₿")
    pub symbol: String,
}

impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.spot_id == other.spot_id
    }
}

impl Eq for Coin {}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.ticker)
    }
}

impl Coin {
    pub fn new(
        name: impl Into<String>,
        spot_id: impl Into<String>,
        ticker: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            spot_id: spot_id.into().to_lowercase(),
            ticker: ticker.into().to_uppercase(),
            symbol: symbol.into(),
        }
    }

    pub fn bitcoin() -> Self {
        Self::new("Bitcoin", "bitcoin", "BTC-USD", "₿")
    }

    /// Look up a catalog coin by display name, spot id or ticker (case-insensitive).
    pub fn find(query: &str) -> Option<Self> {
        let q = query.trim().to_lowercase();
        CATALOG
            .iter()
            .find(|(name, spot_id, ticker, _)| {
                name.to_lowercase() == q || *spot_id == q || ticker.to_lowercase() == q
            })
            .map(|(name, spot_id, ticker, symbol)| Self::new(*name, *spot_id, *ticker, *symbol))
    }

    /// All catalog coins, in display order (Bitcoin first).
    pub fn catalog() -> Vec<Self> {
        CATALOG
            .iter()
            .map(|(name, spot_id, ticker, symbol)| Self::new(*name, *spot_id, *ticker, *symbol))
            .collect()
    }
}

impl Default for Coin {
    fn default() -> Self {
        Self::bitcoin()
    }
}

// (name, spot id, ticker, symbol)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("Bitcoin", "bitcoin", "BTC-USD", "₿"),
    ("Ethereum", "ethereum", "ETH-USD", "Ξ"),
    ("Tether", "tether", "USDT-USD", "$"),
    ("BNB", "binancecoin", "BNB-USD", "BNB"),
    ("Solana", "solana", "SOL-USD", "◎"),
    ("XRP", "ripple", "XRP-USD", "XRP"),
    ("USDC", "usd-coin", "USDC-USD", "$"),
    ("Dogecoin", "dogecoin", "DOGE-USD", "Ð"),
    ("Cardano", "cardano", "ADA-USD", "₳"),
    ("Avalanche", "avalanche-2", "AVAX-USD", "AVAX"),
    ("Shiba Inu", "shiba-inu", "SHIB-USD", "SHIB"),
    ("TRON", "tron", "TRX-USD", "TRX"),
    ("Polkadot", "polkadot", "DOT-USD", "DOT"),
    ("Chainlink", "chainlink", "LINK-USD", "LINK"),
    ("Polygon", "matic-network", "MATIC-USD", "MATIC"),
    ("Litecoin", "litecoin", "LTC-USD", "Ł"),
    ("Bitcoin Cash", "bitcoin-cash", "BCH-USD", "BCH"),
    ("Uniswap", "uniswap", "UNI1-USD", "UNI"),
    ("Internet Computer", "internet-computer", "ICP-USD", "ICP"),
    ("Stellar", "stellar", "XLM-USD", "XLM"),
    ("OKB", "okb", "OKB-USD", "OKB"),
    ("Monero", "monero", "XMR-USD", "XMR"),
    ("Ethereum Classic", "ethereum-classic", "ETC-USD", "ETC"),
    ("Cosmos", "cosmos", "ATOM-USD", "ATOM"),
    ("Filecoin", "filecoin", "FIL-USD", "FIL"),
    ("Aptos", "aptos", "APT-USD", "APT"),
    ("Lido DAO", "lido-dao", "LDO-USD", "LDO"),
    ("Hedera", "hedera-hashgraph", "HBAR-USD", "HBAR"),
    ("Arbitrum", "arbitrum", "ARB-USD", "ARB"),
    ("VeChain", "vechain", "VET-USD", "VET"),
    ("Maker", "maker", "MKR-USD", "MKR"),
    ("Optimism", "optimism", "OP-USD", "OP"),
];
