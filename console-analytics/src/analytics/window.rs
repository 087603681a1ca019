//! Trailing window selection

use chrono::{DateTime, Utc};
use shared::models::Order;

use crate::core::config::EmptyWindowPolicy;
use crate::utils::time::window_start;

/// Orders chosen for a report
#[derive(Debug, Clone)]
pub struct WindowSelection<'a> {
    pub orders: Vec<&'a Order>,
    /// Nothing fell inside the window and the full list was used instead
    pub widened: bool,
}

/// Keep orders created within `[now - days, now]`
///
/// Orders without a timestamp never match the window. When the window is
/// empty but `orders` is not, [`EmptyWindowPolicy::FallbackToAll`] returns
/// every order (timestamped or not) and flags the selection as widened.
pub fn select_window(
    orders: &[Order],
    days: u32,
    now: DateTime<Utc>,
    policy: EmptyWindowPolicy,
) -> WindowSelection<'_> {
    let start = window_start(now, days);
    let in_window: Vec<&Order> = orders
        .iter()
        .filter(|o| o.created_at.is_some_and(|ts| ts >= start && ts <= now))
        .collect();

    if in_window.is_empty() && !orders.is_empty() && policy == EmptyWindowPolicy::FallbackToAll {
        tracing::warn!(
            days,
            total = orders.len(),
            "No orders inside the selected window, falling back to the full list"
        );
        return WindowSelection {
            orders: orders.iter().collect(),
            widened: true,
        };
    }

    tracing::debug!(days, selected = in_window.len(), total = orders.len(), "Window selected");
    WindowSelection {
        orders: in_window,
        widened: false,
    }
}
