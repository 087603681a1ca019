//! 控制台设置存储
//!
//! 设置在启动时注入，通过 [`SettingsStore`] 持久化：
//!
//! - [`JsonFileSettingsStore`] - 工作目录下的 JSON 文件
//! - [`MemorySettingsStore`] - 进程内存储 (测试、嵌入场景)

mod file_store;
mod memory_store;

pub use file_store::JsonFileSettingsStore;
pub use memory_store::MemorySettingsStore;

use shared::models::ConsoleSettings;

use crate::utils::AppResult;

/// Persistence for [`ConsoleSettings`]
pub trait SettingsStore: Send + Sync {
    /// Stored settings, defaults when nothing was saved yet
    fn load(&self) -> AppResult<ConsoleSettings>;

    fn save(&self, settings: &ConsoleSettings) -> AppResult<()>;
}
