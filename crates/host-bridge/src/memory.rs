//! In-process host.
//!
//! Stands in for the host application when none is attached, and lets tests
//! script selections and failures while counting every call.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::{ClipPosition, HostBridge, HostError, HostResult, ImportTarget};

/// Number of calls received per capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCalls {
    pub import: usize,
    pub get_position: usize,
    pub set_position: usize,
}

impl HostCalls {
    pub fn total(&self) -> usize {
        self.import + self.get_position + self.set_position
    }
}

#[derive(Debug)]
struct MemoryHostState {
    attached: bool,
    selection: Option<ClipPosition>,
    accept_imports: bool,
    failure: Option<String>,
    imported: Vec<(PathBuf, ImportTarget)>,
    calls: HostCalls,
}

/// A host whose project and selection live in memory.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<MemoryHostState>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// An attached host with no selected clip that accepts imports.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryHostState {
                attached: true,
                selection: None,
                accept_imports: true,
                failure: None,
                imported: vec![],
                calls: HostCalls::default(),
            }),
        }
    }

    /// A host that answers every call with [`HostError::Unavailable`].
    pub fn detached() -> Self {
        let host = Self::new();
        host.lock().attached = false;
        host
    }

    pub fn with_selection(self, position: ClipPosition) -> Self {
        self.select(Some(position));
        self
    }

    /// Change the selected clip (`None` deselects).
    pub fn select(&self, position: Option<ClipPosition>) {
        self.lock().selection = position;
    }

    /// Current position of the selected clip.
    pub fn selection(&self) -> Option<ClipPosition> {
        self.lock().selection
    }

    /// Whether import requests report success.
    pub fn set_accept_imports(&self, accept: bool) {
        self.lock().accept_imports = accept;
    }

    /// Make every subsequent call fail with the given message (`None` clears).
    pub fn set_failure(&self, message: Option<&str>) {
        self.lock().failure = message.map(str::to_string);
    }

    pub fn imported(&self) -> Vec<(PathBuf, ImportTarget)> {
        self.lock().imported.clone()
    }

    pub fn calls(&self) -> HostCalls {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryHostState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(state: &MemoryHostState, method: &str) -> HostResult<()> {
        if !state.attached {
            return Err(HostError::Unavailable);
        }
        if let Some(message) = &state.failure {
            return Err(HostError::Rejected {
                method: method.to_string(),
                message: message.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl HostBridge for MemoryHost {
    async fn import_asset(&self, path: &Path, target: ImportTarget) -> HostResult<bool> {
        let mut state = self.lock();
        state.calls.import += 1;
        Self::check(&state, "importFile")?;
        if !state.accept_imports {
            return Ok(false);
        }
        state.imported.push((path.to_path_buf(), target));
        Ok(true)
    }

    async fn selected_clip_position(&self) -> HostResult<Option<ClipPosition>> {
        let mut state = self.lock();
        state.calls.get_position += 1;
        Self::check(&state, "getSelectedClipPosition")?;
        Ok(state.selection)
    }

    async fn set_selected_clip_position(&self, position: ClipPosition) -> HostResult<bool> {
        let mut state = self.lock();
        state.calls.set_position += 1;
        Self::check(&state, "setSelectedClipPosition")?;
        match state.selection {
            Some(_) => {
                state.selection = Some(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clip_motion_info(&self) -> HostResult<Option<serde_json::Value>> {
        let state = self.lock();
        Self::check(&state, "getClipMotionInfo")?;
        Ok(state.selection.map(|pos| {
            serde_json::json!({
                "name": "memory clip",
                "components": [{
                    "displayName": "Motion",
                    "properties": [{ "displayName": "Position", "value": [pos.x, pos.y] }]
                }]
            })
        }))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_selection_roundtrip() {
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.5, 0.5));
        assert_eq!(
            host.selected_clip_position().await.unwrap(),
            Some(ClipPosition::new(0.5, 0.5))
        );
        assert!(host
            .set_selected_clip_position(ClipPosition::new(0.1, 0.9))
            .await
            .unwrap());
        assert_eq!(host.selection(), Some(ClipPosition::new(0.1, 0.9)));
        assert_eq!(host.calls().get_position, 1);
        assert_eq!(host.calls().set_position, 1);
    }

    #[tokio::test]
    async fn test_set_without_selection_reports_false() {
        let host = MemoryHost::new();
        assert!(!host
            .set_selected_clip_position(ClipPosition::new(0.1, 0.9))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_detached_and_failing_hosts() {
        let detached = MemoryHost::detached();
        assert!(matches!(
            detached.selected_clip_position().await,
            Err(HostError::Unavailable)
        ));

        let host = MemoryHost::new();
        host.set_failure(Some("bridge crashed"));
        let err = host
            .import_asset(Path::new("/tmp/sub_001.png"), ImportTarget::Bin)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bridge crashed"));
        assert_eq!(host.calls().import, 1);
        assert!(host.imported().is_empty());
    }

    #[tokio::test]
    async fn test_import_records_path() {
        let host = MemoryHost::new();
        assert!(host
            .import_asset(Path::new("/tmp/sub_001.png"), ImportTarget::Playhead)
            .await
            .unwrap());
        host.set_accept_imports(false);
        assert!(!host
            .import_asset(Path::new("/tmp/sub_002.png"), ImportTarget::Bin)
            .await
            .unwrap());
        assert_eq!(
            host.imported(),
            vec![(PathBuf::from("/tmp/sub_001.png"), ImportTarget::Playhead)]
        );
    }
}
