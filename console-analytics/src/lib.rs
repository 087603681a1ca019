//! Console Analytics - 餐厅控制台的订单统计
//!
//! # 架构概述
//!
//! 将订单列表 (宽松 JSON，驼峰/下划线字段混用) 转换为仪表盘数据：
//!
//! - **统计** (`analytics`): 时间窗口、按日聚合、固定长度图表序列、热销商品、客户洞察
//! - **服务** (`core`): 配置、带缓存的 [`ConsoleAnalytics`]
//! - **设置** (`settings`): 控制台偏好的持久化
//!
//! # 模块结构
//!
//! ```text
//! console-analytics/src/
//! ├── analytics/     # 聚合、序列、报告、缓存
//! ├── core/          # 配置、服务
//! ├── settings/      # 设置存储
//! └── utils/         # 日志、时区、金额
//! ```

pub mod analytics;
pub mod core;
pub mod settings;
pub mod utils;

// Re-export 公共类型
pub use analytics::{ChartView, ReportView};
pub use crate::core::{AnalyticsConfig, ConsoleAnalytics, EmptyWindowPolicy};
pub use settings::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 初始化运行环境
///
/// 加载 `.env`、读取配置、创建工作目录并初始化日志
pub fn setup_environment() -> AppResult<AnalyticsConfig> {
    dotenv::dotenv().ok();

    let config = AnalyticsConfig::from_env();
    std::fs::create_dir_all(&config.work_dir).map_err(|e| {
        AppError::config(format!("Failed to create work dir: {e}"))
            .with_detail("path", config.work_dir.display().to_string())
    })?;

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(work_dir = %config.work_dir.display(), "Environment ready");
    Ok(config)
}
