use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use time::OffsetDateTime;
use yahoo_finance_api::{Quote, YahooConnector};

use crate::errors::CoreError;
use crate::models::coin::Coin;
use crate::models::price::PricePoint;
use super::traits::HistoryProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Daily OHLCV bars from Yahoo Finance.
///
/// Crypto pairs are quoted as `<SYM>-USD` (e.g. "BTC-USD"), so history is
/// always USD-denominated. No API key is needed.
pub struct YahooFinanceProvider {
    connector: YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        YahooConnector::new()
            .map(|connector| Self { connector })
            .map_err(|e| CoreError::api(PROVIDER, format!("Failed to create connector: {e}")))
    }
}

/// Midnight UTC at the start of `date`.
fn day_start(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
    let secs = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| CoreError::api(PROVIDER, format!("Date {date} out of range: {e}")))
}

fn to_bar(quote: &Quote) -> Option<PricePoint> {
    let date = DateTime::from_timestamp(quote.timestamp, 0)?.date_naive();
    Some(PricePoint {
        date,
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        volume: Some(quote.volume),
    })
}

#[async_trait]
impl HistoryProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_daily_bars(
        &self,
        coin: &Coin,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        if from > to {
            return Ok(Vec::new());
        }

        let ticker = coin.ticker.as_str();
        // The upper bound is exclusive on Yahoo's side.
        let (start, end) = (day_start(from)?, day_start(to + Duration::days(1))?);

        tracing::debug!(provider = PROVIDER, ticker, %from, %to, "fetching daily bars");

        let response = self
            .connector
            .get_quote_history(ticker, start, end)
            .await
            .map_err(|e| CoreError::api(PROVIDER, format!("History request for {ticker} failed: {e}")))?;

        // `quotes()` errors when the chart has no rows at all.
        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::debug!(provider = PROVIDER, ticker, error = %e, "no quotes in range");
                return Ok(Vec::new());
            }
        };

        let bars: Vec<PricePoint> = quotes
            .iter()
            .filter_map(to_bar)
            .filter(|bar| (from..=to).contains(&bar.date))
            .collect();

        tracing::debug!(provider = PROVIDER, ticker, rows = bars.len(), "daily bars received");
        Ok(bars)
    }
}
