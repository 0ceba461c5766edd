use std::fmt::Write as _;

use crate::format::{self, escape_html};
use crate::models::analytics::{QuickAnalysis, TrendSignal};
use crate::models::chart::{Chart, DisplayArtifacts, Panel, ReturnHistogram, TableRow};
use crate::models::price::SpotPrice;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected range.";
pub const SPOT_UNAVAILABLE_MESSAGE: &str = "Real-time price unavailable.";
// Historical bars come from `<SYM>-USD` tickers.
const HISTORY_CURRENCY: &str = "usd";
const DISCLAIMER: &str =
    "Disclaimer: This dashboard is for informational purposes only and does not constitute financial advice.";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; color: #222; }
aside { width: 260px; padding: 1.5em; background: #f4f6f8; min-height: 100vh; box-sizing: border-box; }
main { flex: 1; padding: 1.5em 2em; }
.metric-label { font-size: 1.2em; }
.metric-value { font-size: 2.5em; font-weight: bold; color: #1f77b4; }
.warning { background: #fff4e5; border-left: 4px solid #ff9800; padding: 0.6em 1em; }
.info { background: #e8f1fb; border-left: 4px solid #1f77b4; padding: 0.6em 1em; }
.success { background: #e9f7ef; border-left: 4px solid #2ca02c; padding: 0.6em 1em; }
.error { background: #fdecea; border-left: 4px solid #d62728; padding: 0.6em 1em; }
table { border-collapse: collapse; font-size: 0.9em; }
th, td { padding: 0.3em 0.8em; border-bottom: 1px solid #ddd; text-align: right; }
th:first-child, td:first-child { text-align: left; }
"#;

/// Writes `DisplayArtifacts` as a single self-contained HTML page.
///
/// Layout mirrors the interactive dashboard: a sidebar with the selected
/// controls, then the spot-price metric, three charts, the data table and a
/// quick analysis. Each panel renders its own state independently.
pub struct PageService {
    currency: String,
}

impl PageService {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn render_html(&self, artifacts: &DisplayArtifacts) -> String {
        let title = escape_html(&artifacts.title());
        let mut html = String::new();

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
        );

        self.write_sidebar(&mut html, artifacts);

        let _ = write!(html, "<main>\n<h1>{title}</h1>\n");
        self.write_spot_panel(&mut html, artifacts);

        write_section(&mut html, "Historical Closing Price", &artifacts.close_chart, write_chart);
        write_section(
            &mut html,
            "Price with Moving Averages",
            &artifacts.moving_average_chart,
            write_chart,
        );
        write_section(
            &mut html,
            "Histogram of Daily Returns",
            &artifacts.return_histogram,
            write_histogram,
        );

        let table_heading = match &artifacts.table {
            Panel::Ready(rows) => format!("Data Table (Last {} Days)", rows.len()),
            _ => "Data Table".to_string(),
        };
        let currency = HISTORY_CURRENCY;
        write_section(&mut html, &table_heading, &artifacts.table, |out, rows| {
            write_table(out, rows, currency)
        });
        write_section(&mut html, "Quick Analysis", &artifacts.analysis, |out, analysis| {
            write_analysis(out, analysis, currency)
        });

        let _ = write!(
            html,
            "<hr>\n<p><small>{}</small></p>\n</main>\n</body>\n</html>\n",
            escape_html(DISCLAIMER)
        );
        html
    }

    fn write_sidebar(&self, html: &mut String, artifacts: &DisplayArtifacts) {
        let _ = write!(
            html,
            "<aside>\n<h2>Crypto Price Analysis</h2>\n\
             <p>Analyze price trends, moving averages, and daily returns with real-time and historical data.</p>\n\
             <dl>\n<dt>Coin</dt><dd>{}</dd>\n<dt>Start Date</dt><dd>{}</dd>\n<dt>End Date</dt><dd>{}</dd>\n\
             <dt>Spot currency</dt><dd>{}</dd>\n<dt>Data points</dt><dd>{}</dd>\n</dl>\n\
             <p><small>Generated {}</small></p>\n</aside>\n",
            escape_html(&artifacts.coin.name),
            artifacts.range.start,
            artifacts.range.end,
            escape_html(&self.currency.to_uppercase()),
            artifacts.series_len,
            artifacts.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }

    fn write_spot_panel(&self, html: &mut String, artifacts: &DisplayArtifacts) {
        html.push_str("<section class=\"spot\">\n");
        match &artifacts.spot {
            Panel::Ready(SpotPrice { currency, value, .. }) => {
                let _ = write!(
                    html,
                    "<div class=\"metric-label\">Current {} Price ({})</div>\n\
                     <div class=\"metric-value\">{}</div>\n",
                    escape_html(&artifacts.coin.name),
                    escape_html(&currency.to_uppercase()),
                    escape_html(&format::price(*value, currency)),
                );
            }
            Panel::NoData => {
                let _ = writeln!(html, "<p class=\"warning\">{SPOT_UNAVAILABLE_MESSAGE}</p>");
            }
            Panel::Unavailable(message) => {
                let _ = writeln!(
                    html,
                    "<p class=\"warning\">{SPOT_UNAVAILABLE_MESSAGE} {}</p>",
                    escape_html(message)
                );
            }
        }
        html.push_str("</section>\n");
    }
}

impl Default for PageService {
    fn default() -> Self {
        Self::new("usd")
    }
}

fn write_section<T>(
    html: &mut String,
    heading: &str,
    panel: &Panel<T>,
    body: impl FnOnce(&mut String, &T),
) {
    let _ = writeln!(html, "<section>\n<h3>{}</h3>", escape_html(heading));
    match panel {
        Panel::Ready(value) => body(html, value),
        Panel::NoData => {
            let _ = writeln!(html, "<p class=\"warning\">{NO_DATA_MESSAGE}</p>");
        }
        Panel::Unavailable(message) => {
            let _ = writeln!(html, "<p class=\"warning\">{}</p>", escape_html(message));
        }
    }
    html.push_str("</section>\n");
}

fn write_chart(html: &mut String, chart: &Chart) {
    let _ = writeln!(html, "<figure>{}</figure>", chart.svg);
}

fn write_histogram(html: &mut String, histogram: &ReturnHistogram) {
    write_chart(html, &histogram.chart);
    if let Some(stats) = &histogram.stats {
        let _ = writeln!(
            html,
            "<p>{} returns · mean {} · std dev {} · min {} · max {}</p>",
            stats.count,
            format::percent(stats.mean),
            format::percent(stats.std_dev),
            format::percent(stats.min),
            format::percent(stats.max),
        );
    }
}

fn write_table(html: &mut String, rows: &[TableRow], currency: &str) {
    html.push_str("<table>\n<thead><tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume</th>");
    if let Some(first) = rows.first() {
        for (window, _) in &first.moving_averages {
            let _ = write!(html, "<th>MA_{window}</th>");
        }
    }
    html.push_str("<th>Daily Return</th></tr></thead>\n<tbody>\n");

    for row in rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            row.date,
            escape_html(&format::price(row.open, currency)),
            escape_html(&format::price(row.high, currency)),
            escape_html(&format::price(row.low, currency)),
            escape_html(&format::price(row.close, currency)),
            format::volume(row.volume),
        );
        for (_, value) in &row.moving_averages {
            let _ = write!(
                html,
                "<td>{}</td>",
                escape_html(&format::optional_price(*value, currency))
            );
        }
        let _ = writeln!(html, "<td>{}</td></tr>", format::optional_percent(row.daily_return));
    }
    html.push_str("</tbody>\n</table>\n");
}

fn write_analysis(html: &mut String, analysis: &QuickAnalysis, currency: &str) {
    let _ = writeln!(
        html,
        "<ul>\n<li><strong>Last Close:</strong> {}</li>\n\
         <li><strong>{}-day MA:</strong> {}</li>\n<li><strong>{}-day MA:</strong> {}</li>\n</ul>",
        escape_html(&format::price(analysis.last_close, currency)),
        analysis.short_ma.0,
        escape_html(&format::optional_price(analysis.short_ma.1, currency)),
        analysis.long_ma.0,
        escape_html(&format::optional_price(analysis.long_ma.1, currency)),
    );

    let class = match analysis.signal {
        TrendSignal::Bullish => "success",
        TrendSignal::Bearish => "error",
        TrendSignal::Mixed | TrendSignal::Insufficient => "info",
    };
    let _ = writeln!(html, "<p class=\"{class}\">{}</p>", analysis.signal.describe());
}
