//! The subtitle panel session.
//!
//! One [`SubtitlePanel`] owns the style, output settings, presets, current
//! text and status line. Every mutation is persisted immediately. Operations
//! take `&mut self`, so a generation or preset action runs to completion
//! before the next one can start.

use std::path::{Path, PathBuf};

use serde::Serialize;

use subcard_common::{AppConfig, ImportMode, InteractionPolicy, SubcardError, SubcardResult};
use subcard_host::{FolderPicker, HostBridge, ImportTarget};
use subcard_model::{OutputSettings, PresetSlots, SlotIndex, SubtitleStyle};
use subcard_render::{CardRenderer, RenderedCard};

use crate::presets::{InteractionMode, PresetController, PresetOutcome};
use crate::status::StatusMessage;
use crate::store::{
    load_record, save_record, KeyValueStore, OUTPUT_NAMESPACE, PRESETS_NAMESPACE, STYLE_NAMESPACE,
};
use crate::writer::{next_sequence_number, SequentialWriter};

/// Title passed to the folder chooser.
pub const FOLDER_PICKER_TITLE: &str = "Choose output folder";

/// Session behavior that comes from configuration rather than persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelOptions {
    pub interaction: InteractionPolicy,
    pub import_mode: ImportMode,
}

impl From<&AppConfig> for PanelOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            interaction: config.presets.interaction,
            import_mode: config.import_mode,
        }
    }
}

/// A card that was written (and imported, unless importing is off).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCard {
    pub path: PathBuf,
    pub file_name: String,
    pub number: u32,
    pub width: u32,
    pub height: u32,
    pub imported: bool,
}

/// Result of [`SubtitlePanel::generate`].
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    Generated(GeneratedCard),
    /// Input was incomplete; nothing was touched.
    Rejected(StatusMessage),
    /// Rendering, writing or importing failed; counter and text are unchanged.
    Failed(StatusMessage),
}

pub struct SubtitlePanel<H, S> {
    host: H,
    store: S,
    renderer: CardRenderer,
    style: SubtitleStyle,
    output: OutputSettings,
    presets: PresetController,
    import_mode: ImportMode,
    text: String,
    status: Option<StatusMessage>,
}

impl<H: HostBridge, S: KeyValueStore> SubtitlePanel<H, S> {
    /// Restore a session from `store`. Missing or malformed records fall
    /// back to defaults.
    pub fn load(host: H, store: S, renderer: CardRenderer, options: PanelOptions) -> Self {
        let style = load_record::<SubtitleStyle>(&store, STYLE_NAMESPACE)
            .map(SubtitleStyle::sanitized)
            .unwrap_or_default();
        let output = load_record::<OutputSettings>(&store, OUTPUT_NAMESPACE)
            .map(OutputSettings::sanitized)
            .unwrap_or_default();
        let slots = load_record::<PresetSlots>(&store, PRESETS_NAMESPACE).unwrap_or_default();

        tracing::debug!(
            host = host.name(),
            save_path = %output.save_path.display(),
            next_number = output.current_number,
            presets = slots.filled_count(),
            "Panel state restored"
        );

        Self {
            host,
            store,
            renderer,
            style,
            output,
            presets: PresetController::new(slots, options.interaction),
            import_mode: options.import_mode,
            text: String::new(),
            status: None,
        }
    }

    pub fn style(&self) -> &SubtitleStyle {
        &self.style
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    pub fn presets(&self) -> &PresetController {
        &self.presets
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    pub fn import_mode(&self) -> ImportMode {
        self.import_mode
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Edit the style in place; the result is sanitized and persisted.
    pub fn update_style(&mut self, edit: impl FnOnce(&mut SubtitleStyle)) {
        let mut style = self.style.clone();
        edit(&mut style);
        self.style = style.sanitized();
        persist(&mut self.store, STYLE_NAMESPACE, &self.style);
    }

    /// Set one style field from its textual value.
    pub fn set_style_field(&mut self, field: &str, value: &str) -> SubcardResult<()> {
        let mut style = self.style.clone();
        style
            .set_field(field, value)
            .map_err(|e| SubcardError::invalid_input(e.to_string()))?;
        self.update_style(|current| *current = style);
        Ok(())
    }

    pub fn reset_style(&mut self) {
        self.update_style(|current| *current = SubtitleStyle::default());
    }

    /// Change the file prefix. With an output folder chosen, the counter is
    /// rescanned for the new prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.output.file_prefix = prefix.into();
        if let Some(dir) = self.output.save_dir() {
            self.output.current_number = next_sequence_number(dir, &self.output.file_prefix);
        }
        persist(&mut self.store, OUTPUT_NAMESPACE, &self.output);
    }

    /// Set the number the next card will use. Values below 1 become 1.
    pub fn set_current_number(&mut self, number: u32) {
        self.output.current_number = number.max(1);
        persist(&mut self.store, OUTPUT_NAMESPACE, &self.output);
    }

    /// Ask `picker` for an output folder. Returns `Ok(false)` if the operator
    /// cancelled, in which case nothing changes.
    pub fn select_folder(&mut self, picker: &dyn FolderPicker) -> SubcardResult<bool> {
        match picker.pick_folder(FOLDER_PICKER_TITLE) {
            Some(dir) => {
                self.set_output_dir(dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Use `dir` for output and derive the next number from its contents.
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) -> SubcardResult<()> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(SubcardError::DirectoryNotFound { path: dir });
        }
        let next_number = next_sequence_number(&dir, &self.output.file_prefix);
        tracing::info!(dir = %dir.display(), next_number, "Output folder selected");

        self.output.save_path = dir.clone();
        self.output.current_number = next_number;
        persist(&mut self.store, OUTPUT_NAMESPACE, &self.output);
        self.status = Some(StatusMessage::FolderSelected {
            path: dir,
            next_number,
        });
        Ok(())
    }

    /// Render the current text without writing anything.
    ///
    /// Produces exactly the bitmap [`generate`](Self::generate) would write.
    pub async fn preview(&self) -> SubcardResult<Option<RenderedCard>> {
        Ok(self.renderer.render(&self.text, &self.style).await?)
    }

    /// Render, write and import the current text as the next numbered card.
    ///
    /// The counter advances and the text clears only after the file is on
    /// disk and the host accepted it. If the import fails the written file is
    /// removed again.
    pub async fn generate(&mut self) -> GenerateOutcome {
        if self.text.trim().is_empty() {
            return self.reject(StatusMessage::EnterText);
        }
        let Some(dir) = self.output.save_dir().map(Path::to_path_buf) else {
            return self.reject(StatusMessage::ChooseFolder);
        };
        self.status = Some(StatusMessage::Generating);

        let card = match self.renderer.render(&self.text, &self.style).await {
            Ok(Some(card)) => card,
            Ok(None) => return self.reject(StatusMessage::EnterText),
            Err(e) => {
                return self.fail(StatusMessage::RenderFailed {
                    reason: e.to_string(),
                })
            }
        };
        let png = match card.encode_png() {
            Ok(png) => png,
            Err(e) => {
                return self.fail(StatusMessage::RenderFailed {
                    reason: e.to_string(),
                })
            }
        };

        let number = self.output.current_number;
        let file_name = self.output.file_name(number);
        let path = match SequentialWriter::write(&dir, &file_name, &png) {
            Ok(path) => path,
            Err(e) => {
                return self.fail(StatusMessage::WriteFailed {
                    reason: e.to_string(),
                })
            }
        };

        let imported = match import_target(self.import_mode) {
            Some(target) => {
                if let Err(reason) = self.import(&path, target).await {
                    if let Err(e) = SequentialWriter::remove(&path) {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Could not remove card after failed import"
                        );
                    }
                    return self.fail(StatusMessage::ImportFailed { file_name, reason });
                }
                true
            }
            None => false,
        };

        self.output.current_number = number.saturating_add(1);
        persist(&mut self.store, OUTPUT_NAMESPACE, &self.output);
        self.text.clear();

        tracing::info!(
            path = %path.display(),
            width = card.width(),
            height = card.height(),
            imported,
            "Subtitle card generated"
        );
        self.status = Some(StatusMessage::Generated {
            file_name: file_name.clone(),
        });

        GenerateOutcome::Generated(GeneratedCard {
            path,
            file_name,
            number,
            width: card.width(),
            height: card.height(),
            imported,
        })
    }

    pub fn toggle_save_mode(&mut self) -> InteractionMode {
        let mode = self.presets.toggle_save();
        self.status = Some(StatusMessage::for_mode(mode));
        mode
    }

    pub fn toggle_apply_mode(&mut self) -> InteractionMode {
        let mode = self.presets.toggle_apply();
        self.status = Some(StatusMessage::for_mode(mode));
        mode
    }

    /// Click preset slot `slot`. A saved slot array is persisted.
    pub async fn click_preset(&mut self, slot: SlotIndex) -> PresetOutcome {
        let outcome = self.presets.click(slot, &self.host).await;
        if outcome.modified_slots() {
            persist(&mut self.store, PRESETS_NAMESPACE, self.presets.slots());
        }
        self.status = Some(StatusMessage::from(&outcome));
        outcome
    }

    /// Diagnostic dump of the selected clip, if the host supports it.
    pub async fn clip_motion_info(&self) -> SubcardResult<Option<serde_json::Value>> {
        Ok(self.host.clip_motion_info().await?)
    }

    async fn import(&self, path: &Path, target: ImportTarget) -> Result<(), String> {
        match self.host.import_asset(path, target).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(format!("{} did not import the file", self.host.name())),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    host = self.host.name(),
                    error = %e,
                    "Import failed"
                );
                Err(e.to_string())
            }
        }
    }

    fn reject(&mut self, status: StatusMessage) -> GenerateOutcome {
        self.status = Some(status.clone());
        GenerateOutcome::Rejected(status)
    }

    fn fail(&mut self, status: StatusMessage) -> GenerateOutcome {
        tracing::warn!(status = %status, "Generation failed");
        self.status = Some(status.clone());
        GenerateOutcome::Failed(status)
    }
}

fn import_target(mode: ImportMode) -> Option<ImportTarget> {
    match mode {
        ImportMode::Bin => Some(ImportTarget::Bin),
        ImportMode::Insert => Some(ImportTarget::Playhead),
        ImportMode::Skip => None,
    }
}

/// Store a record, logging instead of failing: the in-memory state stays
/// authoritative for the rest of the session.
fn persist<S, T>(store: &mut S, namespace: &str, record: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    if let Err(e) = save_record(store, namespace, record) {
        tracing::warn!(namespace, error = %e, "Failed to persist panel state");
    }
}
