//! Top-selling menu items

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{LineItem, Order, TopSellingItem};

use crate::utils::money::{add_saturating, to_f64};

/// Grouping key for line items
///
/// Ordering doubles as the tie-break when two items have equal sales.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ItemKey {
    Menu(i64),
    Name(String),
    Unknown,
}

impl ItemKey {
    fn of(item: &LineItem) -> Self {
        match (item.menu_item_id, &item.name) {
            (Some(id), _) => Self::Menu(id),
            (None, Some(name)) => Self::Name(name.clone()),
            (None, None) => Self::Unknown,
        }
    }

    fn fallback_name(&self) -> String {
        match self {
            Self::Menu(id) => format!("Item #{id}"),
            Self::Name(name) => name.clone(),
            Self::Unknown => "Unknown item".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ItemTally {
    name: Option<String>,
    sales: u64,
    revenue: Decimal,
}

/// Best sellers across `orders`, by units sold
///
/// Items are keyed by menu item id, then by name. Sorted by `sales`
/// descending; equal sales are ordered by menu item id, then name.
pub fn top_selling_items<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    limit: usize,
) -> Vec<TopSellingItem> {
    let mut tallies: BTreeMap<ItemKey, ItemTally> = BTreeMap::new();

    for item in orders.into_iter().flat_map(|o| o.items.iter()) {
        let tally = tallies.entry(ItemKey::of(item)).or_default();
        if tally.name.is_none() {
            tally.name.clone_from(&item.name);
        }
        tally.sales = tally.sales.saturating_add(u64::from(item.quantity));
        tally.revenue = add_saturating(tally.revenue, item.line_total());
    }

    let mut ranked: Vec<(ItemKey, ItemTally)> = tallies.into_iter().collect();
    ranked.sort_by(|(ka, a), (kb, b)| b.sales.cmp(&a.sales).then_with(|| ka.cmp(kb)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(key, tally)| TopSellingItem {
            menu_item_id: match key {
                ItemKey::Menu(id) => Some(id),
                _ => None,
            },
            name: tally.name.unwrap_or_else(|| key.fallback_name()),
            sales: tally.sales,
            revenue: to_f64(tally.revenue),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{line_item, order_with_items};

    #[test]
    fn test_sorted_by_sales_with_deterministic_ties() {
        let orders = vec![
            order_with_items(1, vec![line_item(Some(10), "Paella", 3, "12.00")]),
            order_with_items(2, vec![line_item(Some(20), "Croquetas", 7, "6.50")]),
            order_with_items(3, vec![line_item(Some(30), "Flan", 1, "4.00")]),
            order_with_items(4, vec![line_item(Some(15), "Gazpacho", 7, "5.00")]),
        ];

        let top = top_selling_items(&orders, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].sales, 7);
        assert_eq!(top[1].sales, 7);
        // equal sales: lower menu item id first
        assert_eq!(top[0].menu_item_id, Some(15));
        assert_eq!(top[1].menu_item_id, Some(20));

        let top = top_selling_items(&orders, 5);
        let sales: Vec<u64> = top.iter().map(|t| t.sales).collect();
        assert_eq!(sales, vec![7, 7, 3, 1]);
    }

    #[test]
    fn test_accumulates_across_orders() {
        let orders = vec![
            order_with_items(
                1,
                vec![
                    line_item(Some(10), "Paella", 2, "12.00"),
                    line_item(Some(11), "Sangria", 1, "15.00"),
                ],
            ),
            order_with_items(2, vec![line_item(Some(10), "Paella", 1, "12.00")]),
        ];

        let top = top_selling_items(&orders, 5);
        assert_eq!(top[0].name, "Paella");
        assert_eq!(top[0].sales, 3);
        assert_eq!(top[0].revenue, 36.0);
        assert_eq!(top[1].name, "Sangria");
        assert_eq!(top[1].revenue, 15.0);
    }

    #[test]
    fn test_items_without_id_or_name() {
        let mut nameless = line_item(Some(42), "", 2, "1.00");
        nameless.name = None;
        let mut anonymous = line_item(None, "", 1, "3.00");
        anonymous.name = None;

        let orders = vec![order_with_items(1, vec![nameless, anonymous])];
        let top = top_selling_items(&orders, 5);
        assert_eq!(top[0].name, "Item #42");
        assert_eq!(top[1].name, "Unknown item");
        assert_eq!(top[1].menu_item_id, None);
    }

    #[test]
    fn test_extreme_prices_and_quantities() {
        let orders = vec![
            order_with_items(1, vec![line_item(Some(1), "Caviar", 2, "79228162514264337593543950335")]),
            order_with_items(2, vec![line_item(Some(1), "Caviar", u32::MAX, "1.00")]),
            order_with_items(3, vec![line_item(Some(2), "Bread", u32::MAX, "0.50")]),
        ];

        let top = top_selling_items(&orders, 5);
        assert_eq!(top[0].menu_item_id, Some(1));
        assert_eq!(top[0].sales, u64::from(u32::MAX) + 2);
        assert!(top[0].revenue.is_finite());
        assert!(top[0].revenue > 0.0);
        assert_eq!(top[1].sales, u64::from(u32::MAX));
    }

    #[test]
    fn test_no_items() {
        assert!(top_selling_items(std::iter::empty(), 5).is_empty());
    }
}
