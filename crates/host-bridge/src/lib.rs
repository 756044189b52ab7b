//! Subcard host contracts.
//!
//! The host application (its project, timeline, and selection) is reached
//! only through the narrow capabilities defined here. A panel receives one
//! [`HostBridge`] at construction and never touches host globals.

pub mod memory;
pub mod process;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use memory::MemoryHost;
pub use process::ProcessBridge;

/// Position of a clip in the host's normalized coordinate space.
///
/// Values are passed through untouched; the host decides their range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPosition {
    pub x: f64,
    pub y: f64,
}

impl ClipPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where an imported asset should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    /// The project's current insertion bin.
    Bin,
    /// The bin, then the active sequence at the playhead on the first unlocked video track.
    Playhead,
}

/// Errors raised while talking to the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("No host is attached")]
    Unavailable,

    #[error("Host call '{method}' timed out after {timeout_ms} ms")]
    Timeout { method: String, timeout_ms: u64 },

    #[error("Host call '{method}' failed: {message}")]
    Rejected { method: String, message: String },

    #[error("Malformed reply to '{method}': {message}")]
    Protocol { method: String, message: String },

    #[error("Failed to run host bridge: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;

impl From<HostError> for subcard_common::SubcardError {
    fn from(err: HostError) -> Self {
        subcard_common::SubcardError::host(err.to_string())
    }
}

/// Capabilities the panel needs from the host application.
///
/// `Ok(false)` and `Ok(None)` are ordinary negative answers (nothing
/// imported, no eligible selection). `Err` means the call itself failed.
#[async_trait::async_trait]
pub trait HostBridge: Send + Sync {
    /// Import the file at `path` into the open project.
    async fn import_asset(&self, path: &Path, target: ImportTarget) -> HostResult<bool>;

    /// Position of the currently selected timeline clip.
    async fn selected_clip_position(&self) -> HostResult<Option<ClipPosition>>;

    /// Move the currently selected timeline clip.
    async fn set_selected_clip_position(&self, position: ClipPosition) -> HostResult<bool>;

    /// Diagnostic dump of the selected clip's components and properties.
    async fn clip_motion_info(&self) -> HostResult<Option<serde_json::Value>> {
        Ok(None)
    }

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// A directory chooser. `None` means the operator cancelled.
pub trait FolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

/// A chooser that always answers with a fixed choice.
#[derive(Debug, Clone, Default)]
pub struct FixedFolder(pub Option<PathBuf>);

impl FolderPicker for FixedFolder {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        tracing::debug!(title, choice = ?self.0, "Folder chooser answered");
        self.0.clone()
    }
}

/// Pick the bridge described by the host config.
///
/// An empty command yields a detached [`MemoryHost`] with nothing selected.
pub fn bridge_from_config(config: &subcard_common::HostConfig) -> Box<dyn HostBridge> {
    match ProcessBridge::from_config(config) {
        Some(bridge) => Box::new(bridge),
        None => {
            tracing::info!("No host bridge command configured; running detached");
            Box::new(MemoryHost::detached())
        }
    }
}

#[async_trait::async_trait]
impl<T: HostBridge + ?Sized> HostBridge for Box<T> {
    async fn import_asset(&self, path: &Path, target: ImportTarget) -> HostResult<bool> {
        (**self).import_asset(path, target).await
    }

    async fn selected_clip_position(&self) -> HostResult<Option<ClipPosition>> {
        (**self).selected_clip_position().await
    }

    async fn set_selected_clip_position(&self, position: ClipPosition) -> HostResult<bool> {
        (**self).set_selected_clip_position(position).await
    }

    async fn clip_motion_info(&self) -> HostResult<Option<serde_json::Value>> {
        (**self).clip_motion_info().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
