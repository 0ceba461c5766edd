use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::coin::Coin;

/// Earliest date the historical provider is expected to serve.
pub const MIN_HISTORY_DATE: (i32, u32, u32) = (2020, 1, 1);

/// User-configurable dashboard settings.
///
/// Defaults reproduce the stock dashboard: Bitcoin in USD, 20/50-day moving
/// averages, a 50-bin return histogram and the last 10 rows in the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// The coin to chart.
    pub coin: Coin,

    /// Currency for the spot price (e.g., "usd", "eur").
    pub currency: String,

    /// Trailing windows for the moving-average columns.
    pub ma_windows: Vec<usize>,

    /// Number of histogram bins for daily returns.
    pub histogram_bins: usize,

    /// How many of the most recent rows the table shows.
    pub table_rows: usize,

    /// Chart size in pixels (width, height).
    pub chart_size: (u32, u32),

    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Retry policy for both fetchers.
    pub retry: RetryConfig,
}

impl DashboardSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The provider's earliest date, used as the default range start.
    pub fn min_history_date() -> NaiveDate {
        let (y, m, d) = MIN_HISTORY_DATE;
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            coin: Coin::bitcoin(),
            currency: "usd".to_string(),
            ma_windows: vec![20, 50],
            histogram_bins: 50,
            table_rows: 10,
            chart_size: (1000, 400),
            timeout_secs: 10,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded retry with exponential backoff.
///
/// `max_retries` does not count the initial request; the default of 0 means a
/// single attempt per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 250,
            max_delay_ms: 5_000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed), capped at `max_delay_ms`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}
