use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use btc_dashboard_core::models::coin::Coin;
use btc_dashboard_core::models::price::DateRange;
use btc_dashboard_core::models::settings::{DashboardSettings, RetryConfig};
use chrono::NaiveDate;
use clap::Parser;

/// Render a crypto price dashboard (spot price, closing price, moving
/// averages, daily return histogram and data table) as one HTML page.
#[derive(Debug, Parser)]
#[command(name = "btc-dashboard", version, about)]
pub struct Args {
    /// First day of the history (inclusive). Defaults to 2020-01-01.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Last day of the history (inclusive). Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Coin name, spot id or ticker (e.g. "Bitcoin", "ethereum", "SOL-USD").
    #[arg(long, env = "BTC_DASHBOARD_COIN", default_value = "Bitcoin")]
    pub coin: String,

    /// Quote currency for the spot price.
    #[arg(long, env = "BTC_DASHBOARD_CURRENCY", default_value = "usd")]
    pub currency: String,

    /// Number of bins in the daily return histogram.
    #[arg(long, default_value_t = 50)]
    pub bins: usize,

    /// Rows shown in the data table (0 shows every row).
    #[arg(long, default_value_t = 10)]
    pub table_rows: usize,

    /// Extra attempts per provider on network or API errors.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Per-request HTTP timeout.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Write the page here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the supported coins and exit.
    #[arg(long)]
    pub list_coins: bool,
}

impl Args {
    /// The requested range, with 2020-01-01 and `today` filling in missing ends.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        DateRange::new(
            self.start.unwrap_or_else(DashboardSettings::min_history_date),
            self.end.unwrap_or(today),
        )
    }

    /// Like [`Args::range`], but refuses a start date after the end date.
    pub fn validated_range(&self, today: NaiveDate) -> Result<DateRange> {
        let range = self.range(today);
        if range.is_empty() {
            bail!("Start date must be before end date.");
        }
        Ok(range)
    }

    pub fn settings(&self) -> Result<DashboardSettings> {
        let coin = Coin::find(&self.coin).with_context(|| {
            format!("unknown coin '{}' (use --list-coins to see the catalog)", self.coin)
        })?;

        Ok(DashboardSettings {
            coin,
            currency: self.currency.trim().to_lowercase(),
            histogram_bins: self.bins,
            table_rows: self.table_rows,
            timeout_secs: self.timeout_secs,
            retry: RetryConfig::with_retries(self.retries),
            ..DashboardSettings::default()
        })
    }
}
