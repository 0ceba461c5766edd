use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::coin::Coin;
use super::traits::SpotPriceProvider;

const BASE_URL: &str = "https://api.coincap.io/v2";
const PROVIDER: &str = "CoinCap";

/// CoinCap API provider, used as a fallback source for spot prices.
///
/// - **Free**: No API key required.
/// - **Quotes**: USD only (`priceUsd`), so it only serves "usd" requests.
/// - **Endpoint**: `/assets/{id}`
///
/// CoinCap ids mostly match CoinGecko ids; the few that differ are mapped
/// here, anything else is passed through unchanged.
pub struct CoinCapProvider {
    client: Client,
    base_url: String,
    /// Spot-API id → CoinCap asset id, for ids that differ between the two.
    id_overrides: HashMap<&'static str, &'static str>,
}

impl CoinCapProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let id_overrides = HashMap::from([
            ("binancecoin", "binance-coin"),
            ("ripple", "xrp"),
            ("avalanche-2", "avalanche"),
            ("matic-network", "polygon"),
        ]);

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            id_overrides,
        }
    }

    /// Resolve a coin to its CoinCap asset id.
    pub fn resolve_id(&self, coin: &Coin) -> String {
        self.id_overrides
            .get(coin.spot_id.as_str())
            .map(|id| id.to_string())
            .unwrap_or_else(|| coin.spot_id.clone())
    }

    /// Pull the USD price out of an `/assets/{id}` response body.
    pub fn parse_asset_price(body: &str, id: &str) -> Result<f64, CoreError> {
        let resp: AssetResponse = serde_json::from_str(body)?;
        resp.data
            .price_usd
            .ok_or_else(|| CoreError::api(PROVIDER, format!("No price data for {id}")))?
            .parse()
            .map_err(|e| CoreError::api(PROVIDER, format!("Invalid price format for {id}: {e}")))
    }
}

impl Default for CoinCapProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

// ── CoinCap API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct AssetResponse {
    data: AssetData,
}

#[derive(Deserialize)]
struct AssetData {
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
}

#[async_trait]
impl SpotPriceProvider for CoinCapProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supports_currency(&self, currency: &str) -> bool {
        currency.eq_ignore_ascii_case("usd")
    }

    async fn get_spot_price(&self, coin: &Coin, currency: &str) -> Result<f64, CoreError> {
        if !self.supports_currency(currency) {
            return Err(CoreError::api(
                PROVIDER,
                format!("Only USD quotes are available, not {currency}"),
            ));
        }

        let id = self.resolve_id(coin);
        let url = format!("{}/assets/{id}", self.base_url);

        tracing::debug!(provider = PROVIDER, coin = %id, "fetching spot price");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::api(PROVIDER, format!("HTTP {status} fetching {id}")));
        }

        let body = resp.text().await?;
        Self::parse_asset_price(&body, &id)
    }
}
