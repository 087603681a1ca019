//! Dashboard analytics models
//!
//! Output of the console's client-side aggregation. Field names serialize in
//! camelCase because the presentation layer reads them directly.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::order::{is_truthy, parse_decimal};
use crate::error::{AppError, AppResult, ErrorCode};

/// Metric a chart series is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartMetric {
    #[default]
    Revenue,
    Orders,
    Customers,
    AverageOrderValue,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 4] = [
        ChartMetric::Revenue,
        ChartMetric::Orders,
        ChartMetric::Customers,
        ChartMetric::AverageOrderValue,
    ];
}

/// Trend direction (period-over-period comparison is not computed yet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Up,
    Down,
}

/// One calendar day of aggregated orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    /// Business date (YYYY-MM-DD)
    pub date: NaiveDate,
    pub orders: u32,
    pub revenue: f64,
    pub customers: u32,
    pub avg_order_value: f64,
}

impl DailyBucket {
    /// Zero bucket for a day without orders
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            orders: 0,
            revenue: 0.0,
            customers: 0,
            avg_order_value: 0.0,
        }
    }

    /// Read one metric off the bucket
    pub fn metric(&self, metric: ChartMetric) -> f64 {
        match metric {
            ChartMetric::Revenue => self.revenue,
            ChartMetric::Orders => f64::from(self.orders),
            ChartMetric::Customers => f64::from(self.customers),
            ChartMetric::AverageOrderValue => self.avg_order_value,
        }
    }
}

/// Summary card + bar chart data for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub total: f64,
    pub change: f64,
    pub trend: Trend,
    /// Fixed-length series, oldest first
    pub daily: Vec<f64>,
    /// Never below 1, callers divide by it
    pub max_value: f64,
}

/// Best-selling menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub sales: u64,
    pub revenue: f64,
}

/// Repeat-customer statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsights {
    pub total_customers: u32,
    pub repeat_customers: u32,
    /// 0..=100, rounded to an integer
    pub repeat_customer_percentage: u32,
    /// Rounded to one decimal
    pub avg_orders_per_customer: f64,
}

/// How daily buckets were enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BucketStrategy {
    /// Distinct days that actually have orders, most recent `limit` kept
    ObservedDays { limit: usize },
    /// Every calendar day of the trailing window, empty days included
    CalendarWindow { days: u32 },
}

/// Window the report was computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    pub days: u32,
    pub strategy: BucketStrategy,
    /// The window was empty and the report fell back to every order
    pub widened: bool,
}

/// Full dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub revenue: MetricSummary,
    pub orders: MetricSummary,
    pub customers: MetricSummary,
    pub average_order: MetricSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_selling_items: Option<Vec<TopSellingItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_insights: Option<CustomerInsights>,
    /// X-axis labels aligned with every `daily` series
    pub labels: Vec<String>,
    pub window: WindowInfo,
}

impl DashboardMetrics {
    /// Summary backing a chart metric
    pub fn summary(&self, metric: ChartMetric) -> &MetricSummary {
        match metric {
            ChartMetric::Revenue => &self.revenue,
            ChartMetric::Orders => &self.orders,
            ChartMetric::Customers => &self.customers,
            ChartMetric::AverageOrderValue => &self.average_order,
        }
    }
}

// ============================================================================
// Remote summary
// ============================================================================

/// Precomputed summary from the analytics endpoint
///
/// The endpoint is known to return `NaN` for these fields, so each one is
/// kept only when it parses to a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSummary {
    pub total_orders: Option<f64>,
    pub total_revenue: Option<f64>,
    pub average_order_value: Option<f64>,
}

impl RemoteSummary {
    /// Decode a summary payload; non-object payloads yield an empty summary
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            tracing::warn!("Analytics summary is not an object, ignoring it");
            return Self::default();
        };

        let field = |camel: &str, snake: &str| -> Option<f64> {
            let raw = map
                .get(camel)
                .filter(|v| is_truthy(v))
                .or_else(|| map.get(snake))
                .or_else(|| map.get(camel))?;
            let parsed = parse_decimal(raw).and_then(|d| d.to_f64());
            if parsed.is_none() {
                tracing::debug!(field = camel, value = %raw, "Discarding invalid summary field");
            }
            parsed.filter(|f| f.is_finite())
        };

        Self {
            total_orders: field("totalOrders", "total_orders"),
            total_revenue: field("totalRevenue", "total_revenue"),
            average_order_value: field("averageOrderValue", "average_order_value"),
        }
    }

    /// Decode a JSON text payload
    pub fn from_json(payload: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| AppError::with_message(ErrorCode::SummaryPayloadInvalid, e.to_string()))?;
        Ok(Self::from_value(&value))
    }
}
