//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File backing the persistent key/value store (style, output, presets).
    pub state_file: PathBuf,

    /// Font discovery settings.
    pub fonts: FontConfig,

    /// Host bridge settings.
    pub host: HostConfig,

    /// Position preset behavior.
    pub presets: PresetConfig,

    /// What to do with a generated card after it is written.
    pub import_mode: ImportMode,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Font discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,

    /// Whether installed system fonts are loaded.
    pub load_system_fonts: bool,

    /// Upper bound on waiting for the font database before measuring text.
    pub confirm_timeout_ms: u64,
}

/// Host bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Bridge command: program followed by its arguments.
    /// Empty means no host is attached.
    pub command: Vec<String>,

    /// Per-call timeout for bridge requests.
    pub timeout_ms: u64,
}

/// Position preset behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// How a preset slot click is interpreted outside save mode.
    pub interaction: InteractionPolicy,
}

/// Interpretation of a preset slot click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InteractionPolicy {
    /// Two modes (`none | save`): a click outside save mode applies the slot.
    #[default]
    Immediate,
    /// Three modes (`none | save | apply`): applying requires the apply toggle first.
    ExplicitApply,
}

/// What happens to a generated card after it is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Import into the host project's media bin.
    #[default]
    Bin,
    /// Import and insert at the playhead on the first unlocked video track.
    Insert,
    /// Write the file only.
    Skip,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "subcard=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            fonts: FontConfig::default(),
            host: HostConfig::default(),
            presets: PresetConfig::default(),
            import_mode: ImportMode::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_dirs: vec![],
            load_system_fonts: true,
            confirm_timeout_ms: 3000,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            command: vec![],
            timeout_ms: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("subcard").join("config.json")
}

/// Default location of the persistent key/value store.
fn default_state_file() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("subcard").join("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fonts.confirm_timeout_ms, 3000);
        assert!(config.host.command.is_empty());
        assert_eq!(config.presets.interaction, InteractionPolicy::Immediate);
        assert_eq!(config.import_mode, ImportMode::Bin);
        assert!(config.state_file.ends_with("subcard/state.json"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "presets": { "interaction": "explicit_apply" }, "import_mode": "insert" }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.presets.interaction, InteractionPolicy::ExplicitApply);
        assert_eq!(config.import_mode, ImportMode::Insert);
        assert_eq!(config.logging.level, "info");
        assert!(config.fonts.load_system_fonts);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.host.command = vec!["node".to_string(), "bridge.js".to_string()];
        config.import_mode = ImportMode::Skip;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.host.command, config.host.command);
        assert_eq!(loaded.import_mode, ImportMode::Skip);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.fonts.confirm_timeout_ms, 3000);
    }
}
