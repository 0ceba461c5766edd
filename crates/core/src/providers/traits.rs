use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::coin::Coin;
use crate::models::price::PricePoint;

/// A source of current ("spot") prices.
///
/// Each API sits behind this trait; if one stops working it is replaced or
/// reordered in the registry and nothing else changes.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Whether this provider can quote in `currency` (lowercase code).
    fn supports_currency(&self, _currency: &str) -> bool {
        true
    }

    /// Current price of one unit of `coin` in `currency`.
    async fn get_spot_price(&self, coin: &Coin, currency: &str) -> Result<f64, CoreError>;
}

/// A source of daily OHLCV history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily bars for `coin` between `from` and `to`, both inclusive.
    ///
    /// Rows may come back in any order; an empty Vec means the provider has
    /// no data for the range and is not an error.
    async fn get_daily_bars(
        &self,
        coin: &Coin,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
