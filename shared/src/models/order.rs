//! Order Model
//!
//! Order records reach the console from two backend layers: camelCase API
//! responses and snake_case database rows. [`RawOrder`] accepts both shapes
//! as-is; [`Order::from_raw`] folds them into one canonical record so the
//! analytics code never looks at two field names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, ErrorCode};

// ============================================================================
// Raw records (wire shape)
// ============================================================================

/// Order record exactly as the orders endpoint returns it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOrder {
    pub id: Option<Value>,
    #[serde(rename = "createdAt")]
    pub created_at_camel: Option<Value>,
    pub created_at: Option<Value>,
    pub total: Option<Value>,
    #[serde(rename = "totalAmount")]
    pub total_amount: Option<Value>,
    #[serde(rename = "userId")]
    pub user_id_camel: Option<Value>,
    pub user_id: Option<Value>,
    pub status: Option<Value>,
    pub items: Option<Value>,
}

/// Line item as embedded in a raw order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLineItem {
    #[serde(rename = "menuItemId")]
    pub menu_item_id_camel: Option<Value>,
    pub menu_item_id: Option<Value>,
    pub name: Option<Value>,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
}

// ============================================================================
// Canonical records
// ============================================================================

/// Order status
///
/// Unknown statuses are kept verbatim; the analytics code does not filter on
/// status, the surrounding console screens do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Completed,
    Cancelled,
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "ready" => Self::Ready,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_string()
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }
}

/// Parsed order total
///
/// `Invalid` covers absent, unparsable and non-finite totals. Such orders
/// still count as orders but contribute nothing to revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum OrderTotal {
    Valid(Decimal),
    Invalid,
}

impl OrderTotal {
    /// Amount contributed to revenue sums
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Valid(v) => *v,
            Self::Invalid => Decimal::ZERO,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Customer identifier, canonicalized to text so `1` and `"1"` collapse
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build from a JSON value, dropping falsy identifiers (null, 0, "", false)
    ///
    /// A literal `true` is truthy and becomes the id `"true"`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    (i != 0).then(|| Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64()
                        .filter(|f| *f != 0.0 && f.is_finite())
                        .map(|f| Self(f.to_string()))
                }
            }
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Bool(true) => Some(Self("true".to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub menu_item_id: Option<i64>,
    pub name: Option<String>,
    /// Always >= 1; unparsable quantities count as one unit, huge ones
    /// saturate at `u32::MAX`
    pub quantity: u32,
    /// Unit price; unparsable prices are zero
    pub price: Decimal,
}

/// Canonical order record consumed by the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub total: OrderTotal,
    pub customer_id: Option<CustomerId>,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Normalize a raw record
    ///
    /// Dual keys resolve like a JavaScript `a || b`: the first truthy value
    /// wins. Naive timestamps are read in the business time zone `tz`.
    pub fn from_raw(raw: RawOrder, tz: Tz) -> Self {
        let id = raw.id.as_ref().and_then(parse_integer).unwrap_or(0);

        let created_at = first_truthy(raw.created_at_camel.as_ref(), raw.created_at.as_ref())
            .and_then(|v| parse_timestamp(v, tz));
        if created_at.is_none() {
            tracing::debug!(order_id = id, "Order has no usable timestamp");
        }

        let total = match first_truthy(raw.total.as_ref(), raw.total_amount.as_ref())
            .and_then(parse_decimal)
        {
            Some(amount) => OrderTotal::Valid(amount),
            None => {
                tracing::debug!(order_id = id, "Order total is missing or not a number");
                OrderTotal::Invalid
            }
        };

        let customer_id = first_truthy(raw.user_id_camel.as_ref(), raw.user_id.as_ref())
            .and_then(CustomerId::from_value);

        let status = match raw.status {
            Some(Value::String(s)) => OrderStatus::from(s),
            _ => OrderStatus::default(),
        };

        let items = match raw.items {
            Some(Value::Array(values)) => values
                .into_iter()
                .filter_map(|v| serde_json::from_value::<RawLineItem>(v).ok())
                .map(LineItem::from_raw)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            id,
            created_at,
            total,
            customer_id,
            status,
            items,
        }
    }
}

impl LineItem {
    pub fn from_raw(raw: RawLineItem) -> Self {
        let menu_item_id =
            first_truthy(raw.menu_item_id_camel.as_ref(), raw.menu_item_id.as_ref())
                .and_then(parse_integer);

        let name = match raw.name {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        };

        let quantity = raw
            .quantity
            .as_ref()
            .and_then(parse_integer)
            .filter(|q| *q > 0)
            .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
            .unwrap_or(1);

        let price = raw
            .price
            .as_ref()
            .and_then(parse_decimal)
            .unwrap_or(Decimal::ZERO);

        Self {
            menu_item_id,
            name,
            quantity,
            price,
        }
    }

    /// price × quantity, saturating at the `Decimal` bounds
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or_else(|| {
                tracing::warn!(
                    price = %self.price,
                    quantity = self.quantity,
                    "Line total overflows, saturating"
                );
                if self.price.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            })
    }
}

// ============================================================================
// Payload decoding
// ============================================================================

/// Decode an orders payload
///
/// Malformed JSON text is an error. A well-formed payload that is not an
/// array yields no orders, and array elements that are not objects are
/// skipped.
pub fn orders_from_json(payload: &str, tz: Tz) -> AppResult<Vec<Order>> {
    let value: Value = serde_json::from_str(payload).map_err(|e| {
        AppError::with_message(ErrorCode::OrderPayloadInvalid, e.to_string())
            .with_detail("line", e.line())
    })?;
    Ok(orders_from_value(value, tz))
}

/// Normalize an already-decoded orders payload
pub fn orders_from_value(value: Value, tz: Tz) -> Vec<Order> {
    let Value::Array(elements) = value else {
        tracing::warn!("Orders payload is not an array, treating as empty");
        return Vec::new();
    };

    let total = elements.len();
    let orders: Vec<Order> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<RawOrder>(element) {
            Ok(raw) => Some(Order::from_raw(raw, tz)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed order record");
                None
            }
        })
        .collect();

    tracing::debug!(received = total, accepted = orders.len(), "Orders normalized");
    orders
}

// ============================================================================
// Lenient value parsing
// ============================================================================

/// JavaScript truthiness for JSON values
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `a || b` over optional JSON values
///
/// Falls back to whichever side is present (non-null) when neither is
/// truthy, so an explicit `0` total is still read as zero.
fn first_truthy<'a>(a: Option<&'a Value>, b: Option<&'a Value>) -> Option<&'a Value> {
    let present = |v: &&Value| !v.is_null();
    a.filter(|v| is_truthy(v))
        .or_else(|| b.filter(|v| is_truthy(v)))
        .or_else(|| a.filter(present))
        .or_else(|| b.filter(present))
}

/// Parse a decimal from a JSON number or string, `parseFloat` style
///
/// Strings may carry trailing garbage after a numeric prefix (`"12.5 EUR"`).
/// Returns `None` for anything that would be `NaN` or infinite.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        Value::String(s) => {
            let prefix = numeric_prefix(s.trim());
            if prefix.is_empty() {
                return None;
            }
            Decimal::from_str(prefix).ok()
        }
        _ => None,
    }
}

/// Parse an integer from a JSON number or string, `parseInt` style
pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let prefix = numeric_prefix(s.trim());
            let integral = prefix.split('.').next().unwrap_or_default();
            integral.parse().ok()
        }
        _ => None,
    }
}

/// Longest leading `[+-]digits[.digits]` slice
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return "";
    }
    // "12." is a valid parseFloat input; Decimal wants the dot dropped
    let slice = &s[..end];
    if slice.ends_with('.') && end > digits_start {
        &slice[..slice.len() - 1]
    } else {
        slice
    }
}

/// Parse an order timestamp
///
/// Accepts RFC 3339, naive date-times (`T` or space separated, optional
/// fraction), bare dates and Unix millis. Naive values are local to `tz`.
pub fn parse_timestamp(value: &Value, tz: Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => parse_timestamp_str(s.trim(), tz),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // DST gap: the local time does not exist, read it as UTC instead
    Some(
        naive
            .and_local_timezone(tz)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    )
}
