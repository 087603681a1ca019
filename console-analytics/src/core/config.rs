use std::path::PathBuf;

use chrono_tz::Tz;

/// 空窗口策略 - 选定时间范围内没有订单时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWindowPolicy {
    /// 回退到完整订单列表 (报告中 `window.widened = true`)
    #[default]
    FallbackToAll,
    /// 保持空窗口，全部指标为 0
    Empty,
}

impl EmptyWindowPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" | "fallback_to_all" | "all" => Some(Self::FallbackToAll),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

/// 分析配置 - 控制台统计的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (设置文件、日志) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (none) | 日志目录, 存在时写入滚动日志文件 |
/// | TIMEZONE | UTC | 业务时区 (IANA 名称) |
/// | OVERVIEW_DAYS | 7 | 概览图表天数 (1..=90) |
/// | TOP_ITEMS_LIMIT | 5 | 热销商品数量 |
/// | EMPTY_WINDOW_POLICY | fallback | fallback \| empty |
/// | TRUST_REMOTE_SUMMARY | true | 远端汇总有效时优先使用 |
/// | SETTINGS_FILE | console-settings.json | 设置文件名 (相对 WORK_DIR) |
///
/// # 示例
///
/// ```ignore
/// TIMEZONE=Europe/Madrid EMPTY_WINDOW_POLICY=empty cargo test
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// 工作目录
    pub work_dir: PathBuf,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<PathBuf>,
    /// 业务时区, 订单按此时区切分自然日
    pub timezone: Tz,
    /// 概览图表的天数 (固定 7)
    pub overview_days: u32,
    /// 热销商品数量
    pub top_items_limit: usize,
    /// 空窗口策略
    pub empty_window_policy: EmptyWindowPolicy,
    /// 远端汇总字段有效时是否优先于本地计算值
    pub trust_remote_summary: bool,
    /// 设置文件名
    pub settings_file: String,
}

impl AnalyticsConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .map(|tz| parse_timezone(&tz))
                .unwrap_or(Tz::UTC),
            overview_days: std::env::var("OVERVIEW_DAYS")
                .ok()
                .map(|v| parse_overview_days(&v))
                .unwrap_or(DEFAULT_OVERVIEW_DAYS),
            top_items_limit: std::env::var("TOP_ITEMS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            empty_window_policy: std::env::var("EMPTY_WINDOW_POLICY")
                .ok()
                .and_then(|v| EmptyWindowPolicy::parse(&v))
                .unwrap_or_default(),
            trust_remote_summary: std::env::var("TRUST_REMOTE_SUMMARY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            settings_file: std::env::var("SETTINGS_FILE")
                .unwrap_or_else(|_| "console-settings.json".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<PathBuf>, timezone: Tz) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.timezone = timezone;
        config
    }

    /// 设置文件完整路径
    pub fn settings_path(&self) -> PathBuf {
        self.work_dir.join(&self.settings_file)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 概览默认天数
const DEFAULT_OVERVIEW_DAYS: u32 = 7;
/// 概览最大天数 (与最长的分析范围一致)
const MAX_OVERVIEW_DAYS: u32 = 90;

/// 解析概览天数，超出上限时截断，无效值使用默认值
fn parse_overview_days(value: &str) -> u32 {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => DEFAULT_OVERVIEW_DAYS,
        Ok(days) if days > u64::from(MAX_OVERVIEW_DAYS) => {
            tracing::warn!(days, max = MAX_OVERVIEW_DAYS, "OVERVIEW_DAYS too large, clamping");
            MAX_OVERVIEW_DAYS
        }
        Ok(days) => days as u32,
    }
}

/// 解析时区名称，失败返回 UTC
fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse TIMEZONE '{}': {}, falling back to UTC",
            name,
            e
        );
        Tz::UTC
    })
}
