//! 控制台统计服务
//!
//! 持有订单数据、远端汇总、报告缓存和设置存储。报告仅在订单、远端汇总、
//! 时间范围或业务日变化时重新计算。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::models::{
    ChartMetric, ConsoleSettings, DashboardMetrics, Order, RemoteSummary, TimeRange,
    orders_from_json,
};

use crate::analytics::{
    ChartView, ReportCache, ReportView, analytics_report, overview_report,
};
use crate::core::config::AnalyticsConfig;
use crate::settings::{JsonFileSettingsStore, SettingsStore};
use crate::utils::AppResult;
use crate::utils::time::business_today;

/// Orders and remote summary, versioned by `revision`
///
/// Every change bumps the revision so cached reports become stale.
#[derive(Debug, Clone, Default)]
pub struct OrderFeed {
    orders: Arc<Vec<Order>>,
    remote: Option<RemoteSummary>,
    revision: u64,
}

impl OrderFeed {
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn remote(&self) -> Option<&RemoteSummary> {
        self.remote.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the order list, returns the new revision
    pub fn replace(&mut self, orders: Vec<Order>) -> u64 {
        self.orders = Arc::new(orders);
        self.bump()
    }

    pub fn set_remote(&mut self, remote: Option<RemoteSummary>) -> u64 {
        self.remote = remote;
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// Console analytics facade
pub struct ConsoleAnalytics {
    config: Arc<AnalyticsConfig>,
    feed: RwLock<OrderFeed>,
    cache: ReportCache,
    store: Arc<dyn SettingsStore>,
    settings: RwLock<ConsoleSettings>,
}

impl ConsoleAnalytics {
    /// Create the service, loading persisted settings from `store`
    pub fn new(config: AnalyticsConfig, store: Arc<dyn SettingsStore>) -> AppResult<Self> {
        let settings = store.load()?;
        tracing::info!(
            timezone = %config.timezone,
            range = ?settings.analytics_range,
            metric = ?settings.analytics_metric,
            "Console analytics ready"
        );
        Ok(Self {
            config: Arc::new(config),
            feed: RwLock::new(OrderFeed::default()),
            cache: ReportCache::new(),
            store,
            settings: RwLock::new(settings),
        })
    }

    /// Create the service with settings stored at `config.settings_path()`
    pub fn with_file_store(config: AnalyticsConfig) -> AppResult<Self> {
        let store = Arc::new(JsonFileSettingsStore::new(config.settings_path()));
        Self::new(config, store)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub fn revision(&self) -> u64 {
        self.feed.read().revision()
    }

    // ========== Orders ==========

    /// Replace the orders, returns the new feed revision
    pub fn replace_orders(&self, orders: Vec<Order>) -> u64 {
        let count = orders.len();
        let revision = self.feed.write().replace(orders);
        tracing::info!(count, revision, "Orders replaced");
        revision
    }

    /// Parse and load an orders JSON payload
    ///
    /// A payload that is not JSON is rejected and the current orders stay.
    pub fn load_orders_json(&self, payload: &str) -> AppResult<u64> {
        let orders = orders_from_json(payload, self.config.timezone)?;
        Ok(self.replace_orders(orders))
    }

    pub fn set_remote_summary(&self, remote: Option<RemoteSummary>) -> u64 {
        self.feed.write().set_remote(remote)
    }

    pub fn load_remote_summary_json(&self, payload: &str) -> AppResult<u64> {
        let remote = RemoteSummary::from_json(payload)?;
        Ok(self.set_remote_summary(Some(remote)))
    }

    // ========== Reports ==========

    pub fn overview(&self) -> Arc<DashboardMetrics> {
        self.overview_at(Utc::now())
    }

    pub fn overview_at(&self, now: DateTime<Utc>) -> Arc<DashboardMetrics> {
        let feed = self.feed.read().clone();
        let day = business_today(now, self.config.timezone);
        self.cache
            .get_or_compute(ReportView::Overview, feed.revision(), day, || {
                overview_report(feed.orders(), feed.remote(), now, &self.config)
            })
    }

    /// Analytics report for the persisted range
    pub fn analytics(&self) -> Arc<DashboardMetrics> {
        self.analytics_at(Utc::now())
    }

    pub fn analytics_at(&self, now: DateTime<Utc>) -> Arc<DashboardMetrics> {
        let range = self.settings.read().analytics_range;
        let feed = self.feed.read().clone();
        let day = business_today(now, self.config.timezone);
        self.cache
            .get_or_compute(ReportView::Analytics(range), feed.revision(), day, || {
                analytics_report(feed.orders(), feed.remote(), range, now, &self.config)
            })
    }

    /// Chart for the persisted range and metric
    pub fn chart(&self) -> ChartView {
        self.chart_at(Utc::now())
    }

    pub fn chart_at(&self, now: DateTime<Utc>) -> ChartView {
        let metric = self.settings.read().analytics_metric;
        ChartView::from_report(&self.analytics_at(now), metric)
    }

    // ========== Settings ==========

    pub fn settings(&self) -> ConsoleSettings {
        self.settings.read().clone()
    }

    pub fn select_range(&self, range: TimeRange) -> AppResult<()> {
        self.update_settings(|s| s.analytics_range = range)
    }

    pub fn select_metric(&self, metric: ChartMetric) -> AppResult<()> {
        self.update_settings(|s| s.analytics_metric = metric)
    }

    /// Apply `f` and persist; in-memory settings change only if saving succeeds
    pub fn update_settings(&self, f: impl FnOnce(&mut ConsoleSettings)) -> AppResult<()> {
        let mut settings = self.settings.write();
        let mut next = settings.clone();
        f(&mut next);
        if next == *settings {
            return Ok(());
        }

        self.store.save(&next)?;
        *settings = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{order_at, test_config};
    use crate::settings::MemorySettingsStore;
    use chrono::{Duration, TimeZone};
    use shared::{AppError, ErrorCode};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn service() -> ConsoleAnalytics {
        ConsoleAnalytics::new(test_config(), Arc::new(MemorySettingsStore::new())).unwrap()
    }

    struct FailingStore;

    impl SettingsStore for FailingStore {
        fn load(&self) -> AppResult<ConsoleSettings> {
            Ok(ConsoleSettings::default())
        }

        fn save(&self, _settings: &ConsoleSettings) -> AppResult<()> {
            Err(AppError::system_busy("disk full"))
        }
    }

    #[test]
    fn test_replace_orders_bumps_revision() {
        let service = service();
        assert_eq!(service.revision(), 0);
        assert_eq!(service.replace_orders(Vec::new()), 1);
        assert_eq!(service.set_remote_summary(None), 2);
    }

    #[test]
    fn test_overview_is_memoized_per_revision() {
        let service = service();
        service.replace_orders(vec![order_at(1, now(), "10.00", Some("a"))]);

        let first = service.overview_at(now());
        let second = service.overview_at(now());
        assert!(Arc::ptr_eq(&first, &second));

        service.replace_orders(vec![
            order_at(1, now(), "10.00", Some("a")),
            order_at(2, now(), "5.00", Some("b")),
        ]);
        let third = service.overview_at(now());
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.revenue.total, 15.0);
    }

    #[test]
    fn test_next_business_day_recomputes() {
        let service = service();
        service.replace_orders(vec![order_at(1, now(), "10.00", None)]);

        let today = service.overview_at(now());
        let tomorrow = service.overview_at(now() + Duration::days(1));
        assert!(!Arc::ptr_eq(&today, &tomorrow));
    }

    #[test]
    fn test_metric_change_reuses_analytics_report() {
        let service = service();
        service.replace_orders(vec![order_at(1, now(), "12.00", Some("a"))]);

        let revenue = service.chart_at(now());
        assert_eq!(revenue.metric, ChartMetric::Revenue);
        assert_eq!(revenue.values.last(), Some(&12.0));

        service.select_metric(ChartMetric::Orders).unwrap();
        let orders = service.chart_at(now());
        assert_eq!(orders.values.last(), Some(&1.0));
        assert_eq!(orders.heights.last(), Some(&100.0));
        assert_eq!(service.cache().stats(), (1, 1));
    }

    #[test]
    fn test_range_change_recomputes() {
        let service = service();
        service.replace_orders(vec![order_at(1, now(), "12.00", Some("a"))]);

        assert_eq!(service.analytics_at(now()).labels.len(), 7);
        service.select_range(TimeRange::Month).unwrap();
        assert_eq!(service.analytics_at(now()).labels.len(), 30);
        assert_eq!(service.settings().analytics_range, TimeRange::Month);
    }

    #[test]
    fn test_invalid_payload_keeps_orders() {
        let service = service();
        service.load_orders_json(r#"[{"id":1,"total":"4.50"}]"#).unwrap();

        let err = service.load_orders_json("not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderPayloadInvalid);
        assert_eq!(service.revision(), 1);
        assert_eq!(service.feed.read().orders().len(), 1);
    }

    #[test]
    fn test_extreme_amounts_do_not_break_reports() {
        let service = service();
        service
            .load_orders_json(
                r#"[
                    {"id": 1, "createdAt": "2026-10-16T10:00:00Z", "total": "79228162514264337593543950335", "userId": 1},
                    {"id": 2, "createdAt": "2026-10-16T11:00:00Z", "total": "79228162514264337593543950335", "userId": 2,
                     "items": [{"menuItemId": 9, "price": "79228162514264337593543950335", "quantity": 2}]}
                ]"#,
            )
            .unwrap();

        let overview = service.overview_at(now());
        assert_eq!(overview.orders.total, 2.0);
        assert!(overview.revenue.total.is_finite());
        assert!(overview.revenue.total > 0.0);

        let analytics = service.analytics_at(now());
        let top = analytics.top_selling_items.as_ref().unwrap();
        assert_eq!(top[0].sales, 2);
        assert!(top[0].revenue.is_finite());
    }

    #[test]
    fn test_failed_save_keeps_settings() {
        let service = ConsoleAnalytics::new(test_config(), Arc::new(FailingStore)).unwrap();

        let err = service.select_range(TimeRange::Quarter).unwrap_err();
        assert_eq!(err.code, ErrorCode::SystemBusy);
        assert_eq!(service.settings().analytics_range, TimeRange::Week);
    }
}
