use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// Window and frame pacing settings
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f32,
    pub height: f32,
    pub fullscreen: bool,
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 480.0,
            fullscreen: true,
            fps: 60,
        }
    }
}

// Tracker tunables. Deadzones affect visualization only; the tracker never
// applies them to reported axis values.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct InputConfig {
    pub stick_deadzone: f32,
    pub trigger_deadzone: f32,
    pub axis_event_step: f32,
    pub exit_combo_window_ms: u64,
    pub log_capacity: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: 0.15,
            trigger_deadzone: 0.05,
            axis_event_step: 0.20,
            exit_combo_window_ms: 200,
            log_capacity: 200,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub input: InputConfig,
}

impl AppConfig {
    /// Load from the platform config directory, falling back to defaults.
    /// A missing file is normal; a malformed one warns and is ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            warn!("No config directory available, using defaults");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("joycheck").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipping_tunables() {
        let config = AppConfig::default();
        assert_eq!(config.input.axis_event_step, 0.20);
        assert_eq!(config.input.exit_combo_window_ms, 200);
        assert_eq!(config.display.fps, 60);
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let config: AppConfig = toml::from_str("[input]\nstick_deadzone = 0.30\n").unwrap();
        assert_eq!(config.input.stick_deadzone, 0.30);
        assert_eq!(config.input.trigger_deadzone, 0.05);
        assert!(config.display.fullscreen);
    }
}
