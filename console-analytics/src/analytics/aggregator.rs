//! Order aggregation: revenue, unique customers and per-day buckets

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{BucketStrategy, DailyBucket, Order};

use crate::utils::money::{safe_average, sum_saturating, to_f64};
use crate::utils::time::{business_today, day_key, trailing_days};

/// Sum of valid order totals
///
/// Orders whose total is missing or not a number contribute zero. A sum
/// beyond the `Decimal` range saturates.
pub fn sum_revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Decimal {
    sum_saturating(orders.into_iter().map(|o| o.total.amount()))
}

/// Number of distinct customer ids; orders without one are not counted
pub fn count_unique_customers<'a>(orders: impl IntoIterator<Item = &'a Order>) -> usize {
    orders
        .into_iter()
        .filter_map(|o| o.customer_id.as_ref())
        .collect::<HashSet<_>>()
        .len()
}

/// Totals across a whole window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowTotals {
    /// Every order in the window, including ones with invalid totals
    pub orders: usize,
    pub revenue: Decimal,
    pub customers: usize,
    /// Orders whose total was missing or not a number
    pub invalid_totals: usize,
}

impl WindowTotals {
    pub fn compute(orders: &[&Order]) -> Self {
        let invalid_totals = orders.iter().filter(|o| !o.total.is_valid()).count();
        if invalid_totals > 0 {
            tracing::debug!(
                invalid_totals,
                "Orders with unparsable totals contribute zero revenue"
            );
        }

        Self {
            orders: orders.len(),
            revenue: sum_revenue(orders.iter().copied()),
            customers: count_unique_customers(orders.iter().copied()),
            invalid_totals,
        }
    }

    /// revenue / orders, zero for an empty window
    pub fn average_order_value(&self) -> Decimal {
        safe_average(self.revenue, self.orders)
    }
}

/// Group orders into per-day buckets
///
/// Orders without a timestamp cannot be placed on a day and are left out.
/// - `ObservedDays`: only days that have orders, ascending, the most recent
///   `limit` kept.
/// - `CalendarWindow`: every day from `today - (days - 1)` through today in
///   the business time zone, empty days included.
pub fn bucket_by_day(
    orders: &[&Order],
    strategy: BucketStrategy,
    tz: Tz,
    now: DateTime<Utc>,
) -> Vec<DailyBucket> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&Order>> = BTreeMap::new();
    for order in orders {
        if let Some(ts) = order.created_at {
            by_day.entry(day_key(ts, tz)).or_default().push(order);
        }
    }

    match strategy {
        BucketStrategy::ObservedDays { limit } => {
            let skip = by_day.len().saturating_sub(limit);
            by_day
                .iter()
                .skip(skip)
                .map(|(date, day_orders)| build_bucket(*date, day_orders))
                .collect()
        }
        BucketStrategy::CalendarWindow { days } => {
            trailing_days(business_today(now, tz), days)
                .into_iter()
                .map(|date| match by_day.get(&date) {
                    Some(day_orders) => build_bucket(date, day_orders),
                    None => DailyBucket::empty(date),
                })
                .collect()
        }
    }
}

fn build_bucket(date: NaiveDate, orders: &[&Order]) -> DailyBucket {
    let totals = WindowTotals::compute(orders);
    DailyBucket {
        date,
        orders: u32::try_from(totals.orders).unwrap_or(u32::MAX),
        revenue: to_f64(totals.revenue),
        customers: u32::try_from(totals.customers).unwrap_or(u32::MAX),
        avg_order_value: to_f64(totals.average_order_value()),
    }
}
