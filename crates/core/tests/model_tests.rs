// ═══════════════════════════════════════════════════════════════════
// Model Tests — Series, DateRange, Coin, DashboardSettings, Panel
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::time::Duration;

use btc_dashboard_core::models::analytics::TrendSignal;
use btc_dashboard_core::models::chart::Panel;
use btc_dashboard_core::models::coin::Coin;
use btc_dashboard_core::models::price::{DateRange, PricePoint, Series};
use btc_dashboard_core::models::settings::{DashboardSettings, RetryConfig};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bar(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
    PricePoint::from_close(make_date(y, m, d), close)
}

// ═══════════════════════════════════════════════════════════════════
// Series
// ═══════════════════════════════════════════════════════════════════

mod series {
    use super::*;

    #[test]
    fn new_series_is_empty() {
        let s = Series::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(s.first_date().is_none());
        assert!(s.last_date().is_none());
    }

    #[test]
    fn from_points_sorts_ascending() {
        let s = Series::from_points(vec![
            bar(2024, 1, 3, 3.0),
            bar(2024, 1, 1, 1.0),
            bar(2024, 1, 2, 2.0),
        ]);

        let dates: Vec<NaiveDate> = s.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![make_date(2024, 1, 1), make_date(2024, 1, 2), make_date(2024, 1, 3)]
        );
        assert_eq!(s.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_points_keeps_last_row_for_duplicate_date() {
        let s = Series::from_points(vec![
            bar(2024, 1, 1, 1.0),
            bar(2024, 1, 2, 2.0),
            bar(2024, 1, 1, 9.0),
        ]);

        assert_eq!(s.len(), 2);
        assert_eq!(s.points()[0].close, 9.0);
        assert_eq!(s.points()[1].close, 2.0);
    }

    #[test]
    fn first_and_last_date() {
        let s = Series::from_points(vec![bar(2024, 3, 5, 1.0), bar(2024, 2, 1, 1.0)]);
        assert_eq!(s.first_date(), Some(make_date(2024, 2, 1)));
        assert_eq!(s.last_date(), Some(make_date(2024, 3, 5)));
    }

    #[test]
    fn from_close_fills_ohlc() {
        let p = bar(2024, 1, 1, 42.0);
        assert_eq!(p.open, 42.0);
        assert_eq!(p.high, 42.0);
        assert_eq!(p.low, 42.0);
        assert_eq!(p.close, 42.0);
        assert!(p.volume.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Series::from_points(vec![bar(2024, 1, 1, 1.5), bar(2024, 1, 2, 2.5)]);
        let json = serde_json::to_string(&s).unwrap();
        let back: Series = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
// DateRange
// ═══════════════════════════════════════════════════════════════════

mod date_range {
    use super::*;

    #[test]
    fn start_after_end_is_empty() {
        let r = DateRange::new(make_date(2024, 2, 1), make_date(2024, 1, 1));
        assert!(r.is_empty());
        assert!(!r.contains(make_date(2024, 1, 15)));
    }

    #[test]
    fn single_day_range() {
        let d = make_date(2024, 1, 1);
        let r = DateRange::new(d, d);
        assert!(!r.is_empty());
        assert!(r.contains(d));
        assert!(!r.contains(make_date(2024, 1, 2)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let r = DateRange::new(make_date(2024, 1, 1), make_date(2024, 1, 31));
        assert!(r.contains(make_date(2024, 1, 1)));
        assert!(r.contains(make_date(2024, 1, 31)));
        assert!(!r.contains(make_date(2023, 12, 31)));
        assert!(!r.contains(make_date(2024, 2, 1)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Coin
// ═══════════════════════════════════════════════════════════════════

mod coin {
    use super::*;

    #[test]
    fn default_is_bitcoin() {
        let c = Coin::default();
        assert_eq!(c.name, "Bitcoin");
        assert_eq!(c.spot_id, "bitcoin");
        assert_eq!(c.ticker, "BTC-USD");
    }

    #[test]
    fn new_normalizes_ids() {
        let c = Coin::new("Ethereum", "ETHEREUM", "eth-usd", "Ξ");
        assert_eq!(c.spot_id, "ethereum");
        assert_eq!(c.ticker, "ETH-USD");
    }

    #[test]
    fn display_shows_name_and_ticker() {
        assert_eq!(Coin::bitcoin().to_string(), "Bitcoin (BTC-USD)");
    }

    #[test]
    fn find_by_name_id_or_ticker() {
        assert_eq!(Coin::find("Bitcoin"), Some(Coin::bitcoin()));
        assert_eq!(Coin::find("bitcoin"), Some(Coin::bitcoin()));
        assert_eq!(Coin::find("btc-usd"), Some(Coin::bitcoin()));
        assert_eq!(Coin::find("  BITCOIN  "), Some(Coin::bitcoin()));
    }

    #[test]
    fn find_unknown_is_none() {
        assert!(Coin::find("not-a-coin").is_none());
        assert!(Coin::find("").is_none());
    }

    #[test]
    fn catalog_starts_with_bitcoin() {
        let catalog = Coin::catalog();
        assert_eq!(catalog.first(), Some(&Coin::bitcoin()));
        assert!(catalog.len() > 10);
    }

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = Coin::catalog();
        let mut ids: Vec<&str> = catalog.iter().map(|c| c.spot_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn equality_uses_spot_id_only() {
        let a = Coin::new("Bitcoin", "bitcoin", "BTC-USD", "₿");
        let b = Coin::new("BTC", "bitcoin", "XBT-USD", "B");
        assert_eq!(a, b);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = DashboardSettings::default();
        assert_eq!(s.coin, Coin::bitcoin());
        assert_eq!(s.currency, "usd");
        assert_eq!(s.ma_windows, vec![20, 50]);
        assert_eq!(s.histogram_bins, 50);
        assert_eq!(s.table_rows, 10);
        assert_eq!(s.timeout(), Duration::from_secs(10));
        assert_eq!(s.retry.max_retries, 0);
    }

    #[test]
    fn min_history_date_is_2020() {
        assert_eq!(DashboardSettings::min_history_date(), make_date(2020, 1, 1));
    }

    #[test]
    fn retry_delay_grows_and_caps() {
        let r = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 500,
            backoff_factor: 2.0,
        };
        assert_eq!(r.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(r.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(r.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(r.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(r.delay_for_attempt(10), Duration::from_millis(500));
    }

    #[test]
    fn with_retries_keeps_backoff_defaults() {
        let r = RetryConfig::with_retries(3);
        assert_eq!(r.max_retries, 3);
        assert_eq!(r.initial_delay_ms, RetryConfig::default().initial_delay_ms);
        assert_eq!(RetryConfig::none().max_retries, 0);
    }

    #[test]
    fn settings_serde_roundtrip() {
        let s = DashboardSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: DashboardSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.coin, s.coin);
        assert_eq!(back.ma_windows, s.ma_windows);
        assert_eq!(back.retry, s.retry);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Panel / TrendSignal
// ═══════════════════════════════════════════════════════════════════

mod panel {
    use super::*;

    #[test]
    fn ready_panel() {
        let p = Panel::Ready(5);
        assert!(p.is_ready());
        assert_eq!(p.as_ready(), Some(&5));
    }

    #[test]
    fn non_ready_panels() {
        let empty: Panel<i32> = Panel::NoData;
        let failed: Panel<i32> = Panel::Unavailable("boom".into());
        assert!(!empty.is_ready());
        assert!(failed.as_ready().is_none());
    }

    #[test]
    fn trend_signal_display() {
        assert_eq!(TrendSignal::Bullish.to_string(), "Bullish");
        assert_eq!(TrendSignal::Bearish.to_string(), "Bearish");
        assert!(TrendSignal::Mixed.describe().starts_with("Mixed trend"));
        assert!(TrendSignal::Insufficient.describe().contains("Not enough history"));
    }
}
