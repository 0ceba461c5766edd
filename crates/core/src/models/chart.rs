use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::{QuickAnalysis, ReturnStats};
use super::coin::Coin;
use super::price::{DateRange, SpotPrice};

/// One independently-failing unit of the dashboard page.
///
/// The core decides the state of every panel; the page writer only renders
/// whatever state it is handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Panel<T> {
    /// Content is available.
    Ready(T),
    /// The data set was empty for the selected range.
    NoData,
    /// Fetching or drawing failed; the message is shown as a warning.
    Unavailable(String),
}

impl<T> Panel<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    /// Self-contained SVG document.
    pub svg: String,
}

/// One equal-width histogram bin, `[lower, upper)` except the last bin which
/// also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of daily returns: the drawn chart plus the bin counts behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistogram {
    pub chart: Chart,
    pub bins: Vec<HistogramBin>,
    pub stats: Option<ReturnStats>,
}

/// One row of the data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
    /// (window, value) pairs in column order.
    pub moving_averages: Vec<(usize, Option<f64>)>,
    pub daily_return: Option<f64>,
}

/// Everything one pipeline run produces for the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayArtifacts {
    pub coin: Coin,
    pub range: DateRange,
    pub generated_at: DateTime<Utc>,

    pub spot: Panel<SpotPrice>,
    pub close_chart: Panel<Chart>,
    pub moving_average_chart: Panel<Chart>,
    pub return_histogram: Panel<ReturnHistogram>,
    pub table: Panel<Vec<TableRow>>,
    pub analysis: Panel<QuickAnalysis>,

    /// Number of points in the fetched series (before table truncation).
    pub series_len: usize,
}

impl DisplayArtifacts {
    pub fn title(&self) -> String {
        format!("{} {} Price Dashboard", self.coin.symbol, self.coin.name)
    }
}
