//! Customer insights

use std::collections::HashMap;

use shared::models::{CustomerInsights, Order};

/// Repeat-customer statistics over `orders`
///
/// `avg_orders_per_customer` divides every order in the slice (anonymous
/// ones included) by the number of distinct customers. Both ratios are zero
/// when no order carries a customer id.
pub fn customer_insights(orders: &[&Order]) -> CustomerInsights {
    let mut per_customer: HashMap<_, u32> = HashMap::new();
    for id in orders.iter().filter_map(|o| o.customer_id.as_ref()) {
        *per_customer.entry(id).or_default() += 1;
    }

    let total_customers = per_customer.len();
    if total_customers == 0 {
        return CustomerInsights::default();
    }

    let repeat_customers = per_customer.values().filter(|n| **n > 1).count();
    let repeat_pct = (100.0 * repeat_customers as f64 / total_customers as f64).round();
    let avg_orders = orders.len() as f64 / total_customers as f64;

    CustomerInsights {
        total_customers: u32::try_from(total_customers).unwrap_or(u32::MAX),
        repeat_customers: u32::try_from(repeat_customers).unwrap_or(u32::MAX),
        repeat_customer_percentage: repeat_pct as u32,
        avg_orders_per_customer: (avg_orders * 10.0).round() / 10.0,
    }
}
