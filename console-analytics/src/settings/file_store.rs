use std::path::{Path, PathBuf};

use shared::models::ConsoleSettings;

use super::SettingsStore;
use crate::utils::{AppError, AppResult};

/// Settings kept as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> AppError {
        AppError::system_busy(format!("Failed to {action} settings file: {err}"))
            .with_detail("path", self.path.display().to_string())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> AppResult<ConsoleSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No settings file, using defaults");
            return Ok(ConsoleSettings::default());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))?;
        serde_json::from_str(&content).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Settings file is corrupted");
            AppError::storage_corrupted(format!("Settings file is not valid JSON: {e}"))
                .with_detail("path", self.path.display().to_string())
        })
    }

    fn save(&self, settings: &ConsoleSettings) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::internal(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(&self.path, content).map_err(|e| self.io_error("write", e))?;

        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
