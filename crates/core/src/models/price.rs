use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. A series holds at most one point per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PricePoint {
    /// A bar where open, high, low and close are all `close`.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }
}

/// Daily price history, ascending by date with no duplicate dates.
///
/// Built fresh for every query and thrown away afterwards; nothing here is
/// persisted. The ordering invariant is enforced on construction so analytics
/// can index neighbours directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from provider rows in any order.
    /// Rows are sorted by date; for a repeated date the last row wins.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps provider order within a date, so `last` is well defined.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(prev) if prev.date == point.date => *prev = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Current market price of a coin, as returned by a spot-price provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPrice {
    /// Lowercase currency code the value is quoted in (e.g. "usd").
    pub currency: String,
    pub value: f64,
    /// When the value was fetched.
    pub timestamp: DateTime<Utc>,
}

/// Inclusive date range selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start > end`. Such a range selects no dates.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
