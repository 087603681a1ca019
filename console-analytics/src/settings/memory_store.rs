use parking_lot::Mutex;
use shared::models::ConsoleSettings;

use super::SettingsStore;
use crate::utils::AppResult;

/// In-process settings, lost on drop
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<ConsoleSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `settings`
    pub fn with_settings(settings: ConsoleSettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> AppResult<ConsoleSettings> {
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    fn save(&self, settings: &ConsoleSettings) -> AppResult<()> {
        *self.settings.lock() = Some(settings.clone());
        Ok(())
    }
}
