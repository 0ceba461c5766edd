use std::io::Write;

use anyhow::{Context, Result};
use btc_dashboard::args::Args;
use btc_dashboard::logging;
use btc_dashboard_core::models::chart::{DisplayArtifacts, Panel};
use btc_dashboard_core::models::coin::Coin;
use btc_dashboard_core::CryptoDashboard;
use chrono::Utc;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_logging(&logging::LoggingConfig::from_env())?;

    if args.list_coins {
        for coin in Coin::catalog() {
            println!("{:<24} {:<24} {}", coin.name, coin.spot_id, coin.ticker);
        }
        return Ok(());
    }

    let range = args.validated_range(Utc::now().date_naive())?;

    let settings = args.settings()?;
    let dashboard = CryptoDashboard::new(settings);
    tracing::debug!(?dashboard, "dashboard ready");

    let artifacts = match &args.output {
        Some(path) => dashboard
            .write_report(range, path)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let artifacts = dashboard.render(range).await;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(dashboard.to_html(&artifacts).as_bytes())
                .context("failed to write page to stdout")?;
            stdout.flush()?;
            artifacts
        }
    };

    log_summary(&artifacts);
    Ok(())
}

fn log_summary(artifacts: &DisplayArtifacts) {
    let state = |ready: bool| if ready { "ok" } else { "missing" };
    tracing::info!(
        points = artifacts.series_len,
        spot = state(artifacts.spot.is_ready()),
        close_chart = state(artifacts.close_chart.is_ready()),
        ma_chart = state(artifacts.moving_average_chart.is_ready()),
        histogram = state(artifacts.return_histogram.is_ready()),
        table = state(artifacts.table.is_ready()),
        "dashboard rendered"
    );
    if let Panel::Ready(analysis) = &artifacts.analysis {
        tracing::info!(signal = %analysis.signal, "{}", analysis.signal.describe());
    }
}
