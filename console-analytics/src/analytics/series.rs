//! Chart series builder
//!
//! Turns daily buckets into fixed-length numeric arrays for bar charts.
//! Positions are stable so every series lines up with the same x-axis labels.

use serde::Serialize;
use shared::models::{ChartMetric, DailyBucket, DashboardMetrics, MetricSummary, Trend};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Exactly `length` values of `metric`, oldest first
///
/// With more buckets than slots the most recent `length` are kept; with
/// fewer, the tail is zero-filled.
pub fn to_fixed_length_series(
    buckets: &[DailyBucket],
    metric: ChartMetric,
    length: usize,
) -> Vec<f64> {
    let skip = buckets.len().saturating_sub(length);
    let mut series: Vec<f64> = buckets[skip..]
        .iter()
        .map(|b| sanitize(b.metric(metric)))
        .collect();
    series.resize(length, 0.0);
    series
}

/// Largest value of the series, never below 1
pub fn max_value(series: &[f64]) -> f64 {
    series
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(1.0, f64::max)
}

/// Bar height in percent of `max`, clamped to `[0, 100]`
pub fn bar_height_percent(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Summary card for one metric
///
/// `change` and `trend` are fixed placeholders until period-over-period
/// comparison exists.
pub fn build_metric_summary(
    total: f64,
    buckets: &[DailyBucket],
    metric: ChartMetric,
    length: usize,
) -> MetricSummary {
    let daily = to_fixed_length_series(buckets, metric, length);
    MetricSummary {
        total: sanitize(total),
        change: 0.0,
        trend: Trend::Up,
        max_value: max_value(&daily),
        daily,
    }
}

/// `Mon..Sun` repeated to `length`
///
/// Observed-day buckets are not tied to actual weekdays; the labels only
/// express relative order.
pub fn weekday_labels(length: usize) -> Vec<String> {
    WEEKDAY_LABELS
        .iter()
        .cycle()
        .take(length)
        .map(|s| (*s).to_string())
        .collect()
}

/// `MM-DD` label per bucket, blank for padded slots
pub fn date_labels(buckets: &[DailyBucket], length: usize) -> Vec<String> {
    let skip = buckets.len().saturating_sub(length);
    let mut labels: Vec<String> = buckets[skip..]
        .iter()
        .map(|b| b.date.format("%m-%d").to_string())
        .collect();
    labels.resize(length, String::new());
    labels
}

/// Chart ready for rendering: one bar per slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub metric: ChartMetric,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub max_value: f64,
    /// Bar heights in percent of `max_value`
    pub heights: Vec<f64>,
}

impl ChartView {
    pub fn from_report(report: &DashboardMetrics, metric: ChartMetric) -> Self {
        let summary = report.summary(metric);
        Self {
            metric,
            labels: report.labels.clone(),
            values: summary.daily.clone(),
            max_value: summary.max_value,
            heights: summary
                .daily
                .iter()
                .map(|v| bar_height_percent(*v, summary.max_value))
                .collect(),
        }
    }
}

#[inline]
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bucket(day: u32, orders: u32, revenue: f64) -> DailyBucket {
        DailyBucket {
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            orders,
            revenue,
            customers: orders,
            avg_order_value: if orders > 0 { revenue / f64::from(orders) } else { 0.0 },
        }
    }

    #[test]
    fn test_series_length_is_fixed() {
        assert_eq!(to_fixed_length_series(&[], ChartMetric::Revenue, 7), vec![0.0; 7]);

        let three = vec![bucket(1, 1, 5.0), bucket(2, 2, 6.0), bucket(3, 1, 7.0)];
        assert_eq!(
            to_fixed_length_series(&three, ChartMetric::Revenue, 7),
            vec![5.0, 6.0, 7.0, 0.0, 0.0, 0.0, 0.0]
        );

        let ten: Vec<DailyBucket> = (1..=10).map(|d| bucket(d, d, f64::from(d))).collect();
        let series = to_fixed_length_series(&ten, ChartMetric::Orders, 7);
        assert_eq!(series, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_series_replaces_non_finite_values() {
        let buckets = vec![bucket(1, 1, f64::NAN), bucket(2, 1, f64::INFINITY)];
        let series = to_fixed_length_series(&buckets, ChartMetric::Revenue, 2);
        assert_eq!(series, vec![0.0, 0.0]);
    }

    #[test]
    fn test_max_value_floor() {
        assert_eq!(max_value(&[0.0, 0.0, 0.0]), 1.0);
        assert_eq!(max_value(&[]), 1.0);
        assert_eq!(max_value(&[0.5, 0.2]), 1.0);
        assert_eq!(max_value(&[3.0, 12.5, 7.0]), 12.5);
    }

    #[test]
    fn test_bar_height_percent() {
        assert_eq!(bar_height_percent(5.0, 10.0), 50.0);
        assert_eq!(bar_height_percent(0.0, 1.0), 0.0);
        assert_eq!(bar_height_percent(12.0, 10.0), 100.0);
        assert_eq!(bar_height_percent(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_summary_placeholders() {
        let summary = build_metric_summary(42.0, &[bucket(1, 2, 42.0)], ChartMetric::Revenue, 7);
        assert_eq!(summary.total, 42.0);
        assert_eq!(summary.change, 0.0);
        assert_eq!(summary.trend, Trend::Up);
        assert_eq!(summary.daily.len(), 7);
        assert_eq!(summary.max_value, 42.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(weekday_labels(7).first().unwrap(), "Mon");
        assert_eq!(weekday_labels(7).last().unwrap(), "Sun");
        assert_eq!(weekday_labels(9)[7], "Mon");

        let labels = date_labels(&[bucket(5, 1, 1.0)], 3);
        assert_eq!(labels, vec!["10-05".to_string(), String::new(), String::new()]);
    }
}
