use std::future::Future;

use chrono::Utc;

use crate::errors::CoreError;
use crate::models::coin::Coin;
use crate::models::price::{DateRange, Series, SpotPrice};
use crate::models::settings::RetryConfig;
use crate::providers::registry::ProviderRegistry;

/// Fetches spot prices and daily history from the registered providers.
///
/// Nothing is cached: every call goes to the network. Providers are tried in
/// registration order and each one gets `retry.max_retries` extra attempts on
/// fetch errors before the next provider is asked.
pub struct PriceService {
    registry: ProviderRegistry,
    retry: RetryConfig,
}

impl PriceService {
    pub fn new(registry: ProviderRegistry, retry: RetryConfig) -> Self {
        Self { registry, retry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Current price of `coin` in `currency`.
    ///
    /// The returned value is validated to be finite and non-negative; a
    /// provider answering anything else is treated as failed.
    pub async fn get_spot_price(&self, coin: &Coin, currency: &str) -> Result<SpotPrice, CoreError> {
        let currency = currency.trim().to_lowercase();
        let providers = self.registry.spot_providers_for(&currency);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(format!("spot prices in {currency}")));
        }

        let mut last_error = None;
        for &provider in &providers {
            let quote_currency = currency.as_str();
            let result = self
                .with_retry(provider.name(), move || {
                    provider.get_spot_price(coin, quote_currency)
                })
                .await;

            match result {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    return Ok(SpotPrice {
                        currency,
                        value,
                        timestamp: Utc::now(),
                    });
                }
                Ok(value) => {
                    tracing::warn!(provider = provider.name(), value, "rejected invalid spot price");
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {}: {value} (must be finite and non-negative)",
                            coin.spot_id
                        ),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "spot price provider failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(format!("spot prices in {currency}"))))
    }

    /// Daily OHLCV series for `coin` over `range` (inclusive).
    ///
    /// An empty range (`start > end`) yields an empty series without touching
    /// the network. Rows outside the range or with a non-finite close are dropped.
    pub async fn get_series(&self, coin: &Coin, range: DateRange) -> Result<Series, CoreError> {
        if range.is_empty() {
            return Ok(Series::new());
        }

        let providers = self.registry.history_providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider("daily price history".into()));
        }

        let mut last_error = None;
        for &provider in &providers {
            let result = self
                .with_retry(provider.name(), move || {
                    provider.get_daily_bars(coin, range.start, range.end)
                })
                .await;

            match result {
                Ok(points) => {
                    let fetched = points.len();
                    let points: Vec<_> = points
                        .into_iter()
                        .filter(|p| range.contains(p.date) && p.close.is_finite())
                        .collect();
                    if points.len() != fetched {
                        tracing::debug!(
                            provider = provider.name(),
                            dropped = fetched - points.len(),
                            "dropped out-of-range or invalid rows"
                        );
                    }
                    return Ok(Series::from_points(points));
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "history provider failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider("daily price history".into())))
    }

    /// Run `op`, retrying fetch errors up to `max_retries` times with backoff.
    async fn with_retry<T, F, Fut>(&self, provider: &str, mut op: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_fetch_error() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::debug!(
                        provider,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
