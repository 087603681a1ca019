//! Dashboard reports
//!
//! Two views share the pipeline (window → buckets → series):
//! - overview: fixed 7-day window, buckets on the days that have orders
//! - analytics: selectable range, one bucket per calendar day, plus top
//!   items and customer insights

use chrono::{DateTime, Utc};
use shared::models::{
    BucketStrategy, ChartMetric, DailyBucket, DashboardMetrics, Order, RemoteSummary, TimeRange,
    WindowInfo,
};

use super::aggregator::{WindowTotals, bucket_by_day};
use super::customers::customer_insights;
use super::items::top_selling_items;
use super::series::{build_metric_summary, date_labels, weekday_labels};
use super::window::select_window;
use crate::core::config::AnalyticsConfig;
use crate::utils::money::to_f64;

/// Headline totals after reconciliation with the remote summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledTotals {
    pub revenue: f64,
    pub orders: f64,
    pub customers: f64,
    pub average_order: f64,
}

/// Pick between locally computed and remote totals, field by field
///
/// A remote field wins only when `trust_remote` is set and the field parsed
/// to a finite number. The analytics endpoint is known to return `NaN`, in
/// which case the local value stands. Customers are always local.
pub fn reconcile_totals(
    local: &WindowTotals,
    remote: Option<&RemoteSummary>,
    trust_remote: bool,
) -> ReconciledTotals {
    let local_totals = ReconciledTotals {
        revenue: to_f64(local.revenue),
        orders: local.orders as f64,
        customers: local.customers as f64,
        average_order: to_f64(local.average_order_value()),
    };

    let Some(remote) = remote.filter(|_| trust_remote) else {
        return local_totals;
    };

    let pick = |value: Option<f64>, local: f64, field: &str| match value {
        Some(v) if v.is_finite() => v,
        _ => {
            tracing::debug!(field, local, "Remote summary field unusable, using local value");
            local
        }
    };

    ReconciledTotals {
        revenue: pick(remote.total_revenue, local_totals.revenue, "totalRevenue"),
        orders: pick(remote.total_orders, local_totals.orders, "totalOrders"),
        customers: local_totals.customers,
        average_order: pick(
            remote.average_order_value,
            local_totals.average_order,
            "averageOrderValue",
        ),
    }
}

/// Overview cards and 7-slot charts
pub fn overview_report(
    orders: &[Order],
    remote: Option<&RemoteSummary>,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> DashboardMetrics {
    let days = config.overview_days;
    let slots = days as usize;
    let selection = select_window(orders, days, now, config.empty_window_policy);
    let strategy = BucketStrategy::ObservedDays { limit: slots };
    let buckets = bucket_by_day(&selection.orders, strategy, config.timezone, now);
    let totals = WindowTotals::compute(&selection.orders);

    let mut report = assemble(
        &totals,
        remote,
        &buckets,
        slots,
        config.trust_remote_summary,
        WindowInfo {
            days,
            strategy,
            widened: selection.widened,
        },
    );
    report.labels = weekday_labels(slots);

    tracing::debug!(
        orders = totals.orders,
        days_with_orders = buckets.len(),
        widened = selection.widened,
        "Overview report computed"
    );
    report
}

/// Analytics view for a selectable range, with top items and insights
pub fn analytics_report(
    orders: &[Order],
    remote: Option<&RemoteSummary>,
    range: TimeRange,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> DashboardMetrics {
    let days = range.days();
    let slots = days as usize;
    let selection = select_window(orders, days, now, config.empty_window_policy);
    let strategy = BucketStrategy::CalendarWindow { days };
    let buckets = bucket_by_day(&selection.orders, strategy, config.timezone, now);
    let totals = WindowTotals::compute(&selection.orders);

    let mut report = assemble(
        &totals,
        remote,
        &buckets,
        slots,
        config.trust_remote_summary,
        WindowInfo {
            days,
            strategy,
            widened: selection.widened,
        },
    );
    report.labels = date_labels(&buckets, slots);
    report.top_selling_items = Some(top_selling_items(
        selection.orders.iter().copied(),
        config.top_items_limit,
    ));
    report.customer_insights = Some(customer_insights(&selection.orders));

    tracing::debug!(
        ?range,
        orders = totals.orders,
        widened = selection.widened,
        "Analytics report computed"
    );
    report
}

fn assemble(
    totals: &WindowTotals,
    remote: Option<&RemoteSummary>,
    buckets: &[DailyBucket],
    slots: usize,
    trust_remote: bool,
    window: WindowInfo,
) -> DashboardMetrics {
    let headline = reconcile_totals(totals, remote, trust_remote);
    DashboardMetrics {
        revenue: build_metric_summary(headline.revenue, buckets, ChartMetric::Revenue, slots),
        orders: build_metric_summary(headline.orders, buckets, ChartMetric::Orders, slots),
        customers: build_metric_summary(headline.customers, buckets, ChartMetric::Customers, slots),
        average_order: build_metric_summary(
            headline.average_order,
            buckets,
            ChartMetric::AverageOrderValue,
            slots,
        ),
        top_selling_items: None,
        customer_insights: None,
        labels: Vec::new(),
        window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{line_item, order_at, test_config};
    use crate::core::config::EmptyWindowPolicy;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_overview_of_no_orders_is_all_zero() {
        let report = overview_report(&[], None, now(), &test_config());

        for metric in ChartMetric::ALL {
            let summary = report.summary(metric);
            assert_eq!(summary.total, 0.0);
            assert_eq!(summary.daily, vec![0.0; 7]);
            assert_eq!(summary.max_value, 1.0);
        }
        assert_eq!(report.labels.len(), 7);
        assert!(!report.window.widened);
        assert!(report.top_selling_items.is_none());
    }

    #[test]
    fn test_overview_nan_total_keeps_order_count() {
        let orders = vec![
            order_at(1, now() - Duration::hours(1), "10.00", Some("1")),
            order_at(2, now() - Duration::hours(2), "abc", Some("1")),
            order_at(3, now() - Duration::hours(3), "5.00", Some("2")),
        ];
        let report = overview_report(&orders, None, now(), &test_config());

        assert_eq!(report.revenue.total, 15.0);
        assert_eq!(report.orders.total, 3.0);
        assert_eq!(report.customers.total, 2.0);
        assert_eq!(report.average_order.total, 5.0);
        assert_eq!(report.revenue.daily[0], 15.0);
        assert!(report.revenue.daily.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_stale_orders_fall_back_to_full_list() {
        let orders = vec![
            order_at(1, now() - Duration::days(60), "10.00", Some("a")),
            order_at(2, now() - Duration::days(61), "20.00", Some("b")),
        ];
        let config = test_config();

        let report = overview_report(&orders, None, now(), &config);
        assert!(report.window.widened);
        assert_eq!(report.revenue.total, 30.0);
        assert_eq!(report.orders.total, 2.0);
        // observed-days buckets come from the widened list, so the chart is not blank
        assert_eq!(report.revenue.daily[..2], [20.0, 10.0]);

        let report = analytics_report(&orders, None, TimeRange::Week, now(), &config);
        assert!(report.window.widened);
        assert_eq!(report.revenue.total, 30.0);
        assert_eq!(report.revenue.daily, vec![0.0; 7]);
    }

    #[test]
    fn test_empty_policy_reports_zero() {
        let orders = vec![order_at(1, now() - Duration::days(60), "10.00", Some("a"))];
        let mut config = test_config();
        config.empty_window_policy = EmptyWindowPolicy::Empty;

        let report = analytics_report(&orders, None, TimeRange::Week, now(), &config);
        assert!(!report.window.widened);
        assert_eq!(report.revenue.total, 0.0);
        assert_eq!(report.customer_insights, Some(Default::default()));
    }

    #[test]
    fn test_analytics_series_length_follows_range() {
        let orders = vec![order_at(1, now() - Duration::days(3), "8.00", Some("a"))];
        let config = test_config();

        for range in [TimeRange::Today, TimeRange::Week, TimeRange::Month, TimeRange::Quarter] {
            let report = analytics_report(&orders, None, range, now(), &config);
            let slots = range.days() as usize;
            assert_eq!(report.labels.len(), slots);
            for metric in ChartMetric::ALL {
                assert_eq!(report.summary(metric).daily.len(), slots);
            }
        }
    }

    #[test]
    fn test_analytics_includes_items_and_insights() {
        let mut first = order_at(1, now() - Duration::days(1), "20.00", Some("a"));
        first.items = vec![line_item(Some(1), "Tortilla", 2, "6.00")];
        let mut second = order_at(2, now(), "8.00", Some("a"));
        second.items = vec![line_item(Some(2), "Cafe", 4, "2.00")];

        let report =
            analytics_report(&[first, second], None, TimeRange::Week, now(), &test_config());
        let top = report.top_selling_items.unwrap();
        assert_eq!(top[0].name, "Cafe");
        assert_eq!(top[1].name, "Tortilla");

        let insights = report.customer_insights.unwrap();
        assert_eq!(insights.repeat_customer_percentage, 100);
        assert_eq!(insights.avg_orders_per_customer, 2.0);
        assert_eq!(report.labels.last().unwrap(), "10-16");
    }

    #[test]
    fn test_remote_summary_overrides_only_valid_fields() {
        let orders = vec![
            order_at(1, now(), "10.00", Some("a")),
            order_at(2, now(), "30.00", Some("b")),
        ];
        let remote = RemoteSummary {
            total_orders: Some(5.0),
            total_revenue: None,
            average_order_value: Some(f64::NAN),
        };
        let config = test_config();

        let report = overview_report(&orders, Some(&remote), now(), &config);
        assert_eq!(report.orders.total, 5.0);
        assert_eq!(report.revenue.total, 40.0);
        assert_eq!(report.average_order.total, 20.0);
    }

    #[test]
    fn test_remote_summary_ignored_when_untrusted() {
        let orders = vec![order_at(1, now(), "10.00", Some("a"))];
        let remote = RemoteSummary {
            total_orders: Some(99.0),
            total_revenue: Some(999.0),
            average_order_value: Some(9.0),
        };
        let mut config = test_config();
        config.trust_remote_summary = false;

        let report = overview_report(&orders, Some(&remote), now(), &config);
        assert_eq!(report.orders.total, 1.0);
        assert_eq!(report.revenue.total, 10.0);
    }
}
