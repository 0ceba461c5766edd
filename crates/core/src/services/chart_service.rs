use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::errors::CoreError;
use crate::models::analytics::AnalyzedSeries;
use crate::models::chart::{Chart, HistogramBin};
use crate::models::coin::Coin;
use crate::models::price::Series;

const CLOSE_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
// Colours for successive moving-average windows.
const MA_COLORS: [RGBColor; 3] = [
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0x94, 0x67, 0xbd),
];

/// Draws the dashboard charts as SVG documents.
///
/// The core computes all the numbers; these charts are just one view of
/// them. Callers are expected to route empty inputs to a "no data" panel, but
/// an empty series is still rejected here with a render error rather than a panic.
pub struct ChartService {
    size: (u32, u32),
    bins: usize,
}

impl ChartService {
    pub fn new(size: (u32, u32), bins: usize) -> Self {
        Self {
            size,
            bins: bins.max(1),
        }
    }

    /// Closing price over time.
    pub fn close_chart(&self, coin: &Coin, series: &Series) -> Result<Chart, CoreError> {
        let points: Vec<(NaiveDate, f64)> = series.iter().map(|p| (p.date, p.close)).collect();
        let title = format!("{} Closing Price", coin.name);
        let svg = self.draw_lines(&title, &[("Close".to_string(), CLOSE_COLOR, points)])?;
        Ok(Chart { title, svg })
    }

    /// Closing price with every moving-average column overlaid.
    pub fn moving_average_chart(
        &self,
        coin: &Coin,
        analyzed: &AnalyzedSeries,
    ) -> Result<Chart, CoreError> {
        let dates: Vec<NaiveDate> = analyzed.series.iter().map(|p| p.date).collect();

        let mut lines = vec![(
            "Close".to_string(),
            CLOSE_COLOR,
            analyzed.series.iter().map(|p| (p.date, p.close)).collect::<Vec<_>>(),
        )];
        for (i, column) in analyzed.moving_averages.iter().enumerate() {
            let defined: Vec<(NaiveDate, f64)> = dates
                .iter()
                .zip(&column.values)
                .filter_map(|(d, v)| v.map(|v| (*d, v)))
                .collect();
            if defined.is_empty() {
                continue;
            }
            lines.push((
                format!("{}-day MA", column.window),
                MA_COLORS[i % MA_COLORS.len()],
                defined,
            ));
        }

        let windows: Vec<String> = analyzed
            .moving_averages
            .iter()
            .map(|c| c.window.to_string())
            .collect();
        let title = format!(
            "{} Price with Moving Averages ({} days)",
            coin.name,
            windows.join(", ")
        );
        let svg = self.draw_lines(&title, &lines)?;
        Ok(Chart { title, svg })
    }

    /// Histogram of daily returns (fractions, labelled as percentages).
    pub fn return_histogram(
        &self,
        coin: &Coin,
        returns: &[f64],
    ) -> Result<(Chart, Vec<HistogramBin>), CoreError> {
        let bins = Self::histogram_bins(returns, self.bins);
        if bins.is_empty() {
            return Err(CoreError::Render("no daily returns to plot".into()));
        }

        let title = format!("Histogram of {} Daily Returns", coin.name);
        let x_min = bins.first().map(|b| b.lower).unwrap_or(0.0);
        let x_max = bins.last().map(|b| b.upper).unwrap_or(1.0);
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, ("sans-serif", 22.0).into_font())
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(x_min..x_max, 0.0..(y_max * 1.1).max(1.0))
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .x_desc("Daily Return")
                .y_desc("Frequency")
                .x_label_formatter(&|v: &f64| format!("{:.1}%", v * 100.0))
                .y_label_formatter(&|v: &f64| format!("{v:.0}"))
                .draw()
                .map_err(render_err)?;

            chart
                .draw_series(bins.iter().map(|b| {
                    Rectangle::new(
                        [(b.lower, 0.0), (b.upper, b.count as f64)],
                        CLOSE_COLOR.mix(0.7).filled(),
                    )
                }))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        Ok((Chart { title, svg }, bins))
    }

    /// Split `values` into `bins` equal-width bins over `[min, max]`.
    ///
    /// The maximum lands in the last bin. Non-finite values are ignored. When
    /// every value is equal there is a single bin of width 1 centred on it.
    pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return vec![HistogramBin {
                lower: min - 0.5,
                upper: min + 0.5,
                count: finite.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for v in finite {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }
        out
    }

    /// Decimal places for price tick labels over `[min, max]`.
    ///
    /// Whole numbers once the span reaches 10; below that, two significant
    /// digits past the span's leading digit (so 0.00002-priced coins still get
    /// distinct ticks). A zero span falls back to the magnitude of the values.
    pub fn axis_decimals(min: f64, max: f64) -> usize {
        let span = (max - min).abs();
        let scale = if span > 0.0 { span } else { min.abs().max(max.abs()) };
        if !scale.is_finite() || scale <= 0.0 || scale >= 10.0 {
            return 0;
        }
        ((-scale.log10()).ceil() as i64 + 2).clamp(0, 12) as usize
    }

    fn draw_lines(
        &self,
        title: &str,
        lines: &[(String, RGBColor, Vec<(NaiveDate, f64)>)],
    ) -> Result<String, CoreError> {
        let all: Vec<&(NaiveDate, f64)> = lines.iter().flat_map(|(_, _, pts)| pts).collect();
        if all.is_empty() {
            return Err(CoreError::Render(format!("{title}: nothing to plot")));
        }

        let first = all.iter().map(|p| p.0).min().unwrap_or_default();
        let last = all.iter().map(|p| p.0).max().unwrap_or_default();
        let min_price = all.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_price = all.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        // Pad both axes so single points and flat lines still get a visible range.
        let padding = ((max_price - min_price) * 0.1).max(max_price.abs() * 0.01).max(1e-8);
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;
        let x_min = first - Duration::days(1);
        let x_max = last + Duration::days(1);
        let decimals = Self::axis_decimals(y_min, y_max);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22.0).into_font())
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Price (USD)")
                .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
                .y_label_formatter(&|v: &f64| format!("{v:.decimals$}"))
                .draw()
                .map_err(render_err)?;

            for (label, color, points) in lines {
                let color = *color;
                if points.len() == 1 {
                    chart
                        .draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))
                        .map_err(render_err)?
                        .label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
                } else {
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                        .map_err(render_err)?
                        .label(label.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                }
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        Ok(svg)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new((1000, 400), 50)
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Render(e.to_string())
}
