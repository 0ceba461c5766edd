pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{NaiveDate, Utc};
use models::{
    analytics::AnalyzedSeries,
    chart::{DisplayArtifacts, Panel, ReturnHistogram, TableRow},
    price::{DateRange, Series, SpotPrice},
    settings::DashboardSettings,
};
use providers::registry::ProviderRegistry;
use services::{
    analytics_service::AnalyticsService, chart_service::ChartService, page_service::PageService,
    price_service::PriceService,
};

use errors::CoreError;

/// Main entry point for the dashboard core library.
///
/// One call to [`CryptoDashboard::render`] is one user interaction: fetch the
/// spot price and the daily series, derive the analytics, draw the charts. No
/// state survives between calls apart from the settings.
#[must_use]
pub struct CryptoDashboard {
    settings: DashboardSettings,
    price_service: PriceService,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    page_service: PageService,
}

impl std::fmt::Debug for CryptoDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoDashboard")
            .field("settings", &self.settings)
            .field("spot_providers", &self.price_service.registry().spot_provider_names())
            .field("history_providers", &self.price_service.registry().history_provider_names())
            .finish()
    }
}

impl CryptoDashboard {
    /// Build a dashboard backed by the default public providers.
    pub fn new(settings: DashboardSettings) -> Self {
        let registry = ProviderRegistry::new_with_defaults(&settings);
        Self::with_registry(settings, registry)
    }

    /// Build a dashboard backed by a caller-supplied provider registry.
    pub fn with_registry(settings: DashboardSettings, registry: ProviderRegistry) -> Self {
        let price_service = PriceService::new(registry, settings.retry.clone());
        let analytics_service = AnalyticsService::new(settings.ma_windows.clone());
        let chart_service = ChartService::new(settings.chart_size, settings.histogram_bins);
        let page_service = PageService::new(settings.currency.clone());

        Self {
            settings,
            price_service,
            analytics_service,
            chart_service,
            page_service,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// The full available range: the provider's earliest date through `today`.
    #[must_use]
    pub fn default_range(today: NaiveDate) -> DateRange {
        DateRange::new(DashboardSettings::min_history_date(), today)
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Run the whole fetch → analyze → draw pipeline for `range`.
    ///
    /// Never fails: every panel carries its own success, "no data" or
    /// warning state.
    pub async fn render(&self, range: DateRange) -> DisplayArtifacts {
        let coin = &self.settings.coin;
        tracing::info!(coin = %coin, start = %range.start, end = %range.end, "rendering dashboard");

        // The two fetches are independent.
        let (spot, series) = tokio::join!(
            self.price_service.get_spot_price(coin, &self.settings.currency),
            self.price_service.get_series(coin, range),
        );

        self.assemble(range, spot, series)
    }

    /// Turn fetch results into display artifacts.
    ///
    /// Split out of [`render`](Self::render) so the panel logic can be driven
    /// with any combination of successes and failures.
    pub fn assemble(
        &self,
        range: DateRange,
        spot: Result<SpotPrice, CoreError>,
        series: Result<Series, CoreError>,
    ) -> DisplayArtifacts {
        let coin = self.settings.coin.clone();

        let spot = match spot {
            Ok(price) => Panel::Ready(price),
            Err(e) => {
                tracing::warn!(error = %e, "spot price unavailable");
                Panel::Unavailable(e.to_string())
            }
        };

        let series = match series {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(error = %e, "price history unavailable");
                let message = format!("Could not load price history: {e}");
                return DisplayArtifacts {
                    coin,
                    range,
                    generated_at: Utc::now(),
                    spot,
                    close_chart: Panel::Unavailable(message.clone()),
                    moving_average_chart: Panel::Unavailable(message.clone()),
                    return_histogram: Panel::Unavailable(message.clone()),
                    table: Panel::Unavailable(message.clone()),
                    analysis: Panel::Unavailable(message),
                    series_len: 0,
                };
            }
        };

        if series.is_empty() {
            tracing::info!("no price history for the selected range");
            return DisplayArtifacts {
                coin,
                range,
                generated_at: Utc::now(),
                spot,
                close_chart: Panel::NoData,
                moving_average_chart: Panel::NoData,
                return_histogram: Panel::NoData,
                table: Panel::NoData,
                analysis: Panel::NoData,
                series_len: 0,
            };
        }

        let analyzed = self.analytics_service.analyze(&series);

        let close_chart = chart_panel(self.chart_service.close_chart(&coin, &series));
        let moving_average_chart =
            chart_panel(self.chart_service.moving_average_chart(&coin, &analyzed));
        let return_histogram = self.histogram_panel(&analyzed);
        let table = Panel::Ready(self.table_rows(&analyzed));
        let analysis = match self.analytics_service.quick_analysis(&analyzed) {
            Some(analysis) => Panel::Ready(analysis),
            None => Panel::NoData,
        };

        DisplayArtifacts {
            coin,
            range,
            generated_at: Utc::now(),
            spot,
            close_chart,
            moving_average_chart,
            return_histogram,
            table,
            analysis,
            series_len: series.len(),
        }
    }

    /// Render `range` straight to an HTML page.
    pub async fn render_html(&self, range: DateRange) -> String {
        let artifacts = self.render(range).await;
        self.to_html(&artifacts)
    }

    #[must_use]
    pub fn to_html(&self, artifacts: &DisplayArtifacts) -> String {
        self.page_service.render_html(artifacts)
    }

    /// Render `range` and write the HTML page to `path`.
    /// Returns the artifacts so the caller can report on panel states.
    pub async fn write_report(
        &self,
        range: DateRange,
        path: impl AsRef<std::path::Path>,
    ) -> Result<DisplayArtifacts, CoreError> {
        let artifacts = self.render(range).await;
        std::fs::write(path.as_ref(), self.to_html(&artifacts))?;
        Ok(artifacts)
    }

    // ── Individual stages ───────────────────────────────────────────

    /// Current price of the configured coin in the configured currency.
    pub async fn fetch_spot_price(&self) -> Result<SpotPrice, CoreError> {
        self.price_service
            .get_spot_price(&self.settings.coin, &self.settings.currency)
            .await
    }

    /// Daily series of the configured coin over `range`.
    pub async fn fetch_series(&self, range: DateRange) -> Result<Series, CoreError> {
        self.price_service.get_series(&self.settings.coin, range).await
    }

    #[must_use]
    pub fn analyze(&self, series: &Series) -> AnalyzedSeries {
        self.analytics_service.analyze(series)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn histogram_panel(&self, analyzed: &AnalyzedSeries) -> Panel<ReturnHistogram> {
        let returns = analyzed.defined_returns();
        if returns.is_empty() {
            return Panel::NoData;
        }

        match self.chart_service.return_histogram(&self.settings.coin, &returns) {
            Ok((chart, bins)) => Panel::Ready(ReturnHistogram {
                chart,
                bins,
                stats: AnalyticsService::return_stats(&returns),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "histogram could not be drawn");
                Panel::Unavailable(e.to_string())
            }
        }
    }

    /// The last `table_rows` rows (all rows when `table_rows == 0`).
    fn table_rows(&self, analyzed: &AnalyzedSeries) -> Vec<TableRow> {
        let n = match self.settings.table_rows {
            0 => analyzed.len(),
            n => n,
        };
        analyzed
            .tail(n)
            .into_iter()
            .map(|row| TableRow {
                date: row.point.date,
                open: row.point.open,
                high: row.point.high,
                low: row.point.low,
                close: row.point.close,
                volume: row.point.volume,
                moving_averages: row.moving_averages,
                daily_return: row.daily_return,
            })
            .collect()
    }
}

fn chart_panel<T>(result: Result<T, CoreError>) -> Panel<T> {
    match result {
        Ok(chart) => Panel::Ready(chart),
        Err(e) => {
            tracing::warn!(error = %e, "chart could not be drawn");
            Panel::Unavailable(e.to_string())
        }
    }
}
