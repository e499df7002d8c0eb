//! Plugin settings
//!
//! Backend-side knobs persisted as `settings.json` in the data directory.
//! Every field has a default so older or partial files keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AirQualityError, AirQualityResult};

fn default_start_reading_on_startup() -> bool {
    true
}

fn default_read_interval_secs() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Start the sensor read thread when the host starts
    #[serde(default = "default_start_reading_on_startup")]
    pub start_reading_on_startup: bool,
    /// Serial port used by the printer; never offered for sensors
    #[serde(default)]
    pub printer_port: Option<String>,
    /// Seconds between sensor read thread ticks
    #[serde(default = "default_read_interval_secs")]
    pub read_interval_secs: u64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            start_reading_on_startup: default_start_reading_on_startup(),
            printer_port: None,
            read_interval_secs: default_read_interval_secs(),
        }
    }
}

impl PluginSettings {
    /// Load settings from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> AirQualityResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            AirQualityError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            AirQualityError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Like `load`, but writes the defaults out when the file is missing so
    /// there is a settings file to edit after the first run.
    pub fn load_or_init(path: &Path) -> AirQualityResult<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        settings.save(path)?;
        log::info!("Wrote default settings to {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> AirQualityResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AirQualityError::Config(format!("Serialization error: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            AirQualityError::Config(format!("Failed to write {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_have_sensible_values() {
        let settings = PluginSettings::default();
        assert!(settings.start_reading_on_startup);
        assert_eq!(settings.printer_port, None);
        assert_eq!(settings.read_interval_secs, 5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: PluginSettings =
            serde_json::from_str(r#"{"printer_port":"/dev/ttyACM0"}"#).unwrap();
        assert_eq!(settings.printer_port.as_deref(), Some("/dev/ttyACM0"));
        assert!(settings.start_reading_on_startup);
        assert_eq!(settings.read_interval_secs, 5);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PluginSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, PluginSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = PluginSettings {
            start_reading_on_startup: false,
            printer_port: Some("/dev/ttyACM0".into()),
            read_interval_secs: 30,
        };
        settings.save(&path).unwrap();
        assert_eq!(PluginSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PluginSettings::load(&path),
            Err(AirQualityError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_initialised_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = PluginSettings::load_or_init(&path).unwrap();
        assert_eq!(settings, PluginSettings::default());
        assert!(path.exists());
        assert_eq!(PluginSettings::load(&path).unwrap(), settings);
    }
}
