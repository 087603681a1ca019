//! 时间工具函数 - 业务时区下的自然日
//!
//! 订单时间戳统一为 UTC，只在切分自然日时转换到业务时区。

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// 订单时间戳 → 业务时区自然日
pub fn day_key(timestamp: DateTime<Utc>, tz: Tz) -> NaiveDate {
    timestamp.with_timezone(&tz).date_naive()
}

/// 当前业务日 (业务时区)
pub fn business_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    day_key(now, tz)
}

/// 滚动窗口起点: `now - days`, 超出可表示范围时取最早时间
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// 最近 `days` 个自然日, 从旧到新, 包含今天
///
/// `days == 0` 返回空列表。
pub fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(i64::from(offset))))
        .collect()
}
