// ═══════════════════════════════════════════════════════════════════
// Analytics Tests — moving averages, daily returns, quick analysis,
// return statistics
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, NaiveDate};

use btc_dashboard_core::format;
use btc_dashboard_core::models::analytics::TrendSignal;
use btc_dashboard_core::models::price::{PricePoint, Series};
use btc_dashboard_core::services::analytics_service::AnalyticsService;

fn series_from_closes(closes: &[f64]) -> Series {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    Series::from_points(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::from_close(start + Duration::days(i as i64), c))
            .collect(),
    )
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// Moving average
// ═══════════════════════════════════════════════════════════════════

mod moving_average {
    use super::*;

    #[test]
    fn defined_from_window_minus_one() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let ma = AnalyticsService::moving_average(&values, 3);

        assert_eq!(ma.len(), values.len());
        assert!(ma[0].is_none());
        assert!(ma[1].is_none());
        for i in 2..values.len() {
            let expected = values[i - 2..=i].iter().sum::<f64>() / 3.0;
            assert!(approx_eq(ma[i].unwrap(), expected), "index {i}");
        }
    }

    #[test]
    fn window_of_one_is_identity() {
        let values = vec![5.0, 7.0, 9.0];
        let ma = AnalyticsService::moving_average(&values, 1);
        assert_eq!(ma, vec![Some(5.0), Some(7.0), Some(9.0)]);
    }

    #[test]
    fn window_equal_to_length_defines_last_only() {
        let values = vec![2.0, 4.0, 6.0, 8.0];
        let ma = AnalyticsService::moving_average(&values, 4);
        assert_eq!(ma, vec![None, None, None, Some(5.0)]);
    }

    #[test]
    fn window_longer_than_series_is_all_absent() {
        let ma = AnalyticsService::moving_average(&[1.0, 2.0, 3.0], 20);
        assert_eq!(ma, vec![None, None, None]);
    }

    #[test]
    fn zero_window_is_all_absent() {
        let ma = AnalyticsService::moving_average(&[1.0, 2.0], 0);
        assert_eq!(ma, vec![None, None]);
    }

    #[test]
    fn empty_input() {
        assert!(AnalyticsService::moving_average(&[], 20).is_empty());
    }

    #[test]
    fn ma20_on_long_series() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let analyzed = AnalyticsService::default().analyze(&series_from_closes(&closes));

        let ma20 = analyzed.moving_average(20).unwrap();
        let ma50 = analyzed.moving_average(50).unwrap();
        assert!(ma20[18].is_none());
        // mean of 100..=119
        assert!(approx_eq(ma20[19].unwrap(), 109.5));
        assert!(ma50[48].is_none());
        // mean of 100..=149
        assert!(approx_eq(ma50[49].unwrap(), 124.5));
        // mean of 110..=159
        assert!(approx_eq(ma50[59].unwrap(), 134.5));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Daily returns
// ═══════════════════════════════════════════════════════════════════

mod daily_returns {
    use super::*;

    #[test]
    fn absent_at_first_index() {
        let r = AnalyticsService::daily_returns(&[100.0, 110.0]);
        assert!(r[0].is_none());
        assert!(approx_eq(r[1].unwrap(), 0.1));
    }

    #[test]
    fn five_point_scenario() {
        let analyzed =
            AnalyticsService::default().analyze(&series_from_closes(&[100.0, 102.0, 101.0, 105.0, 104.0]));

        let formatted: Vec<String> = analyzed
            .daily_returns
            .iter()
            .map(|r| format::optional_percent(*r))
            .collect();
        assert_eq!(formatted, vec!["—", "2.00%", "-0.98%", "3.96%", "-0.95%"]);

        assert!(analyzed.moving_average(20).unwrap().iter().all(Option::is_none));
        assert!(analyzed.moving_average(50).unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn single_point_has_no_returns() {
        let r = AnalyticsService::daily_returns(&[100.0]);
        assert_eq!(r, vec![None]);
    }

    #[test]
    fn empty_input() {
        assert!(AnalyticsService::daily_returns(&[]).is_empty());
    }

    #[test]
    fn zero_previous_close_is_absent() {
        let r = AnalyticsService::daily_returns(&[100.0, 0.0, 50.0, 55.0]);
        assert!(approx_eq(r[1].unwrap(), -1.0));
        assert!(r[2].is_none());
        assert!(approx_eq(r[3].unwrap(), 0.1));
    }
}

// ═══════════════════════════════════════════════════════════════════
// analyze()
// ═══════════════════════════════════════════════════════════════════

mod analyze {
    use super::*;

    #[test]
    fn columns_align_with_series() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let analyzed = AnalyticsService::new(vec![2, 3]).analyze(&series);

        assert_eq!(analyzed.len(), 5);
        assert_eq!(analyzed.daily_returns.len(), 5);
        for column in &analyzed.moving_averages {
            assert_eq!(column.values.len(), 5);
        }
        assert_eq!(analyzed.series, series);
    }

    #[test]
    fn empty_series() {
        let analyzed = AnalyticsService::default().analyze(&Series::new());
        assert!(analyzed.is_empty());
        assert!(analyzed.daily_returns.is_empty());
        assert!(analyzed.defined_returns().is_empty());
        assert!(analyzed.tail(10).is_empty());
    }

    #[test]
    fn columns_follow_window_order() {
        let analyzed = AnalyticsService::new(vec![50, 20, 5]).analyze(&series_from_closes(&[1.0]));
        let windows: Vec<usize> = analyzed.moving_averages.iter().map(|c| c.window).collect();
        assert_eq!(windows, vec![50, 20, 5]);
        assert!(analyzed.moving_average(7).is_none());
    }

    #[test]
    fn tail_returns_last_rows_ascending() {
        let closes: Vec<f64> = (1..=15).map(f64::from).collect();
        let analyzed = AnalyticsService::new(vec![3]).analyze(&series_from_closes(&closes));

        let tail = analyzed.tail(10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0].point.close, 6.0);
        assert_eq!(tail[9].point.close, 15.0);
        assert!(tail.windows(2).all(|w| w[0].point.date < w[1].point.date));
        assert_eq!(tail[9].moving_averages, vec![(3, Some(14.0))]);
    }

    #[test]
    fn tail_longer_than_series() {
        let analyzed = AnalyticsService::default().analyze(&series_from_closes(&[1.0, 2.0]));
        assert_eq!(analyzed.tail(10).len(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Quick analysis
// ═══════════════════════════════════════════════════════════════════

mod quick_analysis {
    use super::*;

    #[test]
    fn trend_signal_rules() {
        assert_eq!(AnalyticsService::trend_signal(110.0, Some(105.0), Some(100.0)), TrendSignal::Bullish);
        assert_eq!(AnalyticsService::trend_signal(90.0, Some(95.0), Some(100.0)), TrendSignal::Bearish);
        assert_eq!(AnalyticsService::trend_signal(100.0, Some(105.0), Some(95.0)), TrendSignal::Mixed);
        assert_eq!(AnalyticsService::trend_signal(100.0, None, Some(95.0)), TrendSignal::Insufficient);
        assert_eq!(AnalyticsService::trend_signal(100.0, Some(95.0), None), TrendSignal::Insufficient);
    }

    #[test]
    fn rising_series_is_bullish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let svc = AnalyticsService::default();
        let qa = svc.quick_analysis(&svc.analyze(&series_from_closes(&closes))).unwrap();

        assert_eq!(qa.last_close, 159.0);
        assert_eq!(qa.short_ma.0, 20);
        assert_eq!(qa.long_ma.0, 50);
        assert_eq!(qa.signal, TrendSignal::Bullish);
    }

    #[test]
    fn falling_series_is_bearish() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let svc = AnalyticsService::default();
        let qa = svc.quick_analysis(&svc.analyze(&series_from_closes(&closes))).unwrap();
        assert_eq!(qa.signal, TrendSignal::Bearish);
    }

    #[test]
    fn short_series_is_insufficient() {
        let svc = AnalyticsService::default();
        let qa = svc
            .quick_analysis(&svc.analyze(&series_from_closes(&[100.0, 102.0, 101.0])))
            .unwrap();
        assert_eq!(qa.last_close, 101.0);
        assert!(qa.short_ma.1.is_none());
        assert_eq!(qa.signal, TrendSignal::Insufficient);
    }

    #[test]
    fn empty_series_has_no_analysis() {
        let svc = AnalyticsService::default();
        assert!(svc.quick_analysis(&svc.analyze(&Series::new())).is_none());
    }

    #[test]
    fn no_windows_has_no_analysis() {
        let svc = AnalyticsService::new(vec![]);
        assert!(svc.quick_analysis(&svc.analyze(&series_from_closes(&[1.0]))).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Return statistics
// ═══════════════════════════════════════════════════════════════════

mod return_stats {
    use super::*;

    #[test]
    fn empty_is_none() {
        assert!(AnalyticsService::return_stats(&[]).is_none());
    }

    #[test]
    fn single_value_has_zero_std_dev() {
        let stats = AnalyticsService::return_stats(&[0.05]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 0.05);
        assert_eq!(stats.max, 0.05);
    }

    #[test]
    fn sample_standard_deviation() {
        let stats = AnalyticsService::return_stats(&[0.01, 0.02, 0.03, 0.04]).unwrap();
        assert_eq!(stats.count, 4);
        assert!(approx_eq(stats.mean, 0.025));
        // sqrt(sum of squared deviations / (n - 1)) = sqrt(0.0005 / 3)
        assert!(approx_eq(stats.std_dev, (0.0005f64 / 3.0).sqrt()));
        assert_eq!(stats.min, 0.01);
        assert_eq!(stats.max, 0.04);
    }
}
