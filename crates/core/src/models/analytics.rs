use serde::{Deserialize, Serialize};

use super::price::{PricePoint, Series};

/// A trailing simple moving average over `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageColumn {
    /// Window length in points (inclusive of the current point).
    pub window: usize,

    /// One entry per series point; `None` for the first `window - 1` points.
    pub values: Vec<Option<f64>>,
}

/// The input series plus its derived columns.
///
/// Columns are aligned with `series`: same length, same order.
/// Input OHLCV values are never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSeries {
    pub series: Series,

    /// One column per configured window, in configuration order.
    pub moving_averages: Vec<MovingAverageColumn>,

    /// Fractional change of `close` from the previous point (0.02 == 2%).
    /// `None` at index 0 and wherever the previous close is zero.
    pub daily_returns: Vec<Option<f64>>,
}

/// A single table row view over an `AnalyzedSeries`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedRow<'a> {
    pub point: &'a PricePoint,
    /// (window, value) pairs in column order.
    pub moving_averages: Vec<(usize, Option<f64>)>,
    pub daily_return: Option<f64>,
}

impl AnalyzedSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The moving-average column for `window`, if it was computed.
    pub fn moving_average(&self, window: usize) -> Option<&[Option<f64>]> {
        self.moving_averages
            .iter()
            .find(|c| c.window == window)
            .map(|c| c.values.as_slice())
    }

    /// Defined daily returns only, in series order.
    pub fn defined_returns(&self) -> Vec<f64> {
        self.daily_returns.iter().filter_map(|r| *r).collect()
    }

    pub fn row(&self, index: usize) -> Option<AnalyzedRow<'_>> {
        let point = self.series.points().get(index)?;
        Some(AnalyzedRow {
            point,
            moving_averages: self
                .moving_averages
                .iter()
                .map(|c| (c.window, c.values.get(index).copied().flatten()))
                .collect(),
            daily_return: self.daily_returns.get(index).copied().flatten(),
        })
    }

    /// The last `n` rows in ascending date order.
    pub fn tail(&self, n: usize) -> Vec<AnalyzedRow<'_>> {
        let start = self.len().saturating_sub(n);
        (start..self.len()).filter_map(|i| self.row(i)).collect()
    }
}

/// Direction suggested by the last close relative to the two moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSignal {
    /// close > short MA > long MA
    Bullish,
    /// close < short MA < long MA
    Bearish,
    /// Anything in between.
    Mixed,
    /// One of the averages is not defined yet (series shorter than the window).
    Insufficient,
}

impl TrendSignal {
    pub fn describe(&self) -> &'static str {
        match self {
            TrendSignal::Bullish => "Bullish trend: Price above both moving averages.",
            TrendSignal::Bearish => "Bearish trend: Price below both moving averages.",
            TrendSignal::Mixed => "Mixed trend: Price between moving averages.",
            TrendSignal::Insufficient => {
                "Not enough history to compare price against both moving averages."
            }
        }
    }
}

impl std::fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSignal::Bullish => write!(f, "Bullish"),
            TrendSignal::Bearish => write!(f, "Bearish"),
            TrendSignal::Mixed => write!(f, "Mixed"),
            TrendSignal::Insufficient => write!(f, "Insufficient"),
        }
    }
}

/// Snapshot of the most recent point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAnalysis {
    pub last_close: f64,
    /// (window, value) for the short average.
    pub short_ma: (usize, Option<f64>),
    /// (window, value) for the long average.
    pub long_ma: (usize, Option<f64>),
    pub signal: TrendSignal,
}

/// Summary statistics over the defined daily returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when `count == 1`.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}
