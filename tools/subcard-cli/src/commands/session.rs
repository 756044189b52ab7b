//! Shared setup: config resolution and panel construction.

use std::path::PathBuf;

use subcard_common::{config_file_path, AppConfig, ImportMode};
use subcard_host::{bridge_from_config, HostBridge};
use subcard_panel::{JsonFileStore, PanelOptions, SubtitlePanel};
use subcard_render::{CardRenderer, FontCatalog};

pub type CliPanel = SubtitlePanel<Box<dyn HostBridge>, JsonFileStore>;

/// Global flags that override the config file.
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    pub config: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub host_cmd: Option<String>,
}

impl SessionArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    /// Load the config file and apply flag overrides.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load_from(&self.config_path());

        if let Some(state_file) = &self.state_file {
            config.state_file = state_file.clone();
        }
        if let Some(cmd) = &self.host_cmd {
            let command: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
            if command.is_empty() {
                anyhow::bail!("--host-cmd must not be empty");
            }
            config.host.command = command;
        }

        // Without a bridge nothing can be imported; write files only.
        if config.host.command.is_empty() {
            config.import_mode = ImportMode::Skip;
        }

        Ok(config)
    }
}

pub fn open_panel(config: &AppConfig) -> CliPanel {
    tracing::debug!(
        state_file = %config.state_file.display(),
        import_mode = ?config.import_mode,
        "Opening panel session"
    );
    let renderer = CardRenderer::new(FontCatalog::new(&config.fonts));
    SubtitlePanel::load(
        bridge_from_config(&config.host),
        JsonFileStore::open(&config.state_file),
        renderer,
        PanelOptions::from(config),
    )
}
