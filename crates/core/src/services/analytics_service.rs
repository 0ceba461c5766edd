use crate::models::analytics::{
    AnalyzedSeries, MovingAverageColumn, QuickAnalysis, ReturnStats, TrendSignal,
};
use crate::models::price::Series;

/// Derives moving averages, daily returns and summary figures from a series.
///
/// Pure computation: no I/O, no failure modes. Degenerate inputs (empty
/// series, windows longer than the series, a zero previous close) produce
/// absent values instead of errors.
pub struct AnalyticsService {
    windows: Vec<usize>,
}

impl AnalyticsService {
    pub fn new(windows: Vec<usize>) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Add one moving-average column per configured window plus the daily
    /// return column. Output is aligned with the input series.
    pub fn analyze(&self, series: &Series) -> AnalyzedSeries {
        let closes = series.closes();

        let moving_averages = self
            .windows
            .iter()
            .map(|&window| MovingAverageColumn {
                window,
                values: Self::moving_average(&closes, window),
            })
            .collect();

        AnalyzedSeries {
            series: series.clone(),
            moving_averages,
            daily_returns: Self::daily_returns(&closes),
        }
    }

    /// Trailing simple moving average.
    ///
    /// `result[i]` is the mean of `values[i + 1 - window ..= i]` for
    /// `i >= window - 1` and `None` before that. A zero window yields all `None`.
    pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
        if window == 0 || values.len() < window {
            return vec![None; values.len()];
        }

        let mut out = vec![None; window - 1];
        out.extend(
            values
                .windows(window)
                .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
        );
        out
    }

    /// Fractional change from the previous value: `(v[i] - v[i-1]) / v[i-1]`.
    ///
    /// `None` at index 0 and wherever the previous value is zero or the result
    /// is not finite.
    pub fn daily_returns(values: &[f64]) -> Vec<Option<f64>> {
        if values.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(values.len());
        out.push(None);
        out.extend(values.windows(2).map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            if prev == 0.0 {
                return None;
            }
            let r = (curr - prev) / prev;
            r.is_finite().then_some(r)
        }));
        out
    }

    /// Compare the last close against the shortest and longest configured
    /// averages. `None` for an empty series or when no window is configured.
    pub fn quick_analysis(&self, analyzed: &AnalyzedSeries) -> Option<QuickAnalysis> {
        let last = analyzed.series.points().last()?;
        let index = analyzed.len() - 1;

        let short = *self.windows.iter().min()?;
        let long = *self.windows.iter().max()?;

        let value_at = |window: usize| {
            analyzed
                .moving_average(window)
                .and_then(|col| col.get(index).copied().flatten())
        };
        let short_ma = value_at(short);
        let long_ma = value_at(long);

        Some(QuickAnalysis {
            last_close: last.close,
            short_ma: (short, short_ma),
            long_ma: (long, long_ma),
            signal: Self::trend_signal(last.close, short_ma, long_ma),
        })
    }

    /// Bullish when `close > short > long`, Bearish when `close < short < long`,
    /// Mixed otherwise. Insufficient if either average is missing.
    pub fn trend_signal(close: f64, short_ma: Option<f64>, long_ma: Option<f64>) -> TrendSignal {
        match (short_ma, long_ma) {
            (Some(short), Some(long)) => {
                if close > short && short > long {
                    TrendSignal::Bullish
                } else if close < short && short < long {
                    TrendSignal::Bearish
                } else {
                    TrendSignal::Mixed
                }
            }
            _ => TrendSignal::Insufficient,
        }
    }

    /// Count, mean, sample standard deviation and extremes of `returns`.
    pub fn return_stats(returns: &[f64]) -> Option<ReturnStats> {
        if returns.is_empty() {
            return None;
        }

        let count = returns.len();
        let n = count as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let std_dev = if count > 1 {
            let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(ReturnStats {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(vec![20, 50])
    }
}
