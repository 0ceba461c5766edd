use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::coin::Coin;
use super::traits::SpotPriceProvider;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER: &str = "CoinGecko";

/// CoinGecko provider for real-time spot prices.
///
/// - **Free**: No API key required for the public `/simple/price` endpoint.
/// - **Coverage**: Thousands of coins, dozens of quote currencies.
/// - **Response**: `{ "<coin id>": { "<currency>": <number> } }`
///
/// A missing coin or currency key in the response is reported as an API
/// error, so schema drift surfaces the same way as a failed request.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(BASE_URL, timeout)
    }

    /// Point the provider at another host (proxies, self-hosted mirrors).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Pull `body[id][currency]` out of a `/simple/price` response.
    pub fn parse_simple_price(body: &str, id: &str, currency: &str) -> Result<f64, CoreError> {
        let json: serde_json::Value = serde_json::from_str(body)?;

        let quotes = json.get(id).ok_or_else(|| {
            CoreError::api(PROVIDER, format!("No quote for '{id}' in response"))
        })?;

        quotes
            .get(currency)
            .ok_or_else(|| {
                CoreError::api(PROVIDER, format!("No '{currency}' price for '{id}' in response"))
            })?
            .as_f64()
            .ok_or_else(|| {
                CoreError::api(PROVIDER, format!("Non-numeric '{currency}' price for '{id}'"))
            })
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl SpotPriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_spot_price(&self, coin: &Coin, currency: &str) -> Result<f64, CoreError> {
        let id = coin.spot_id.as_str();
        let currency = currency.to_lowercase();
        let url = format!("{}/simple/price", self.base_url);

        tracing::debug!(provider = PROVIDER, coin = id, currency = %currency, "fetching spot price");

        let resp = self
            .client
            .get(&url)
            .query(&[("ids", id), ("vs_currencies", currency.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::api(
                PROVIDER,
                format!("HTTP {status} fetching {id}/{currency}"),
            ));
        }

        let body = resp.text().await?;
        Self::parse_simple_price(&body, id, &currency)
    }
}

