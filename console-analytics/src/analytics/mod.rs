//! 订单统计 - 控制台仪表盘的客户端聚合
//!
//! # 数据流
//!
//! ```text
//! orders ─► window ─► aggregator (daily buckets, totals) ─► series ─► report
//!                      items / customers (analytics view only)
//! ```
//!
//! Everything here is pure and synchronous: malformed input degrades to zero
//! contributions instead of errors.

pub mod aggregator;
pub mod cache;
pub mod customers;
pub mod dashboard;
pub mod items;
pub mod series;
pub mod window;

pub use aggregator::{WindowTotals, bucket_by_day, count_unique_customers, sum_revenue};
pub use cache::{ReportCache, ReportView};
pub use customers::customer_insights;
pub use dashboard::{ReconciledTotals, analytics_report, overview_report, reconcile_totals};
pub use items::top_selling_items;
pub use series::{ChartView, bar_height_percent, max_value, to_fixed_length_series};
pub use window::{WindowSelection, select_window};
