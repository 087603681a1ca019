//! 核心模块 - 配置与统计服务
//!
//! # 模块结构
//!
//! - [`AnalyticsConfig`] - 环境变量配置
//! - [`ConsoleAnalytics`] - 带缓存的统计服务

pub mod config;
pub mod service;

pub use config::{AnalyticsConfig, EmptyWindowPolicy};
pub use service::{ConsoleAnalytics, OrderFeed};
