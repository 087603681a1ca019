//! Console settings (persisted UI preferences)

use serde::{Deserialize, Serialize};

use super::analytics::ChartMetric;

/// Selectable trailing window for the analytics view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Last day
    Today,
    /// Last 7 days
    #[default]
    Week,
    /// Last 30 days
    Month,
    /// Last 90 days
    Quarter,
}

impl TimeRange {
    pub const fn days(&self) -> u32 {
        match self {
            Self::Today => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Map a day count back to a range, `None` for unsupported counts
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            1 => Some(Self::Today),
            7 => Some(Self::Week),
            30 => Some(Self::Month),
            90 => Some(Self::Quarter),
            _ => None,
        }
    }
}

fn default_sound_enabled() -> bool {
    true
}

fn default_active_tab() -> String {
    "orders".to_string()
}

/// Process-wide console preferences
///
/// Injected at startup and persisted through a settings store instead of
/// ambient browser storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleSettings {
    /// Play a sound when a new order arrives
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Last opened console tab
    #[serde(default = "default_active_tab")]
    pub active_tab: String,
    #[serde(default)]
    pub analytics_range: TimeRange,
    #[serde(default)]
    pub analytics_metric: ChartMetric,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            sound_enabled: default_sound_enabled(),
            active_tab: default_active_tab(),
            analytics_range: TimeRange::default(),
            analytics_metric: ChartMetric::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_days() {
        for range in [
            TimeRange::Today,
            TimeRange::Week,
            TimeRange::Month,
            TimeRange::Quarter,
        ] {
            assert_eq!(TimeRange::from_days(range.days()), Some(range));
        }
        assert_eq!(TimeRange::from_days(14), None);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: ConsoleSettings =
            serde_json::from_str(r#"{"analyticsRange": "month"}"#).unwrap();
        assert!(settings.sound_enabled);
        assert_eq!(settings.active_tab, "orders");
        assert_eq!(settings.analytics_range, TimeRange::Month);
        assert_eq!(settings.analytics_metric, ChartMetric::Revenue);
    }
}
