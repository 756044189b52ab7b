//! Operator-facing status line.

use std::fmt;
use std::path::PathBuf;

use subcard_model::SlotIndex;

use crate::presets::{InteractionMode, PresetAction, PresetOutcome};

/// The panel's most recent status message.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    EnterText,
    ChooseFolder,
    FolderSelected { path: PathBuf, next_number: u32 },
    Generating,
    Generated { file_name: String },
    RenderFailed { reason: String },
    WriteFailed { reason: String },
    ImportFailed { file_name: String, reason: String },
    SaveModeOn,
    ApplyModeOn,
    ModeOff,
    PresetSaved { slot: SlotIndex },
    SelectClipFirst,
    PresetApplied { slot: SlotIndex },
    PresetNotApplied { slot: SlotIndex },
    PresetEmpty { slot: SlotIndex },
    ChoosePresetMode,
    PositionReadFailed { reason: String },
    PositionWriteFailed { reason: String },
}

impl StatusMessage {
    /// Hint shown after a mode toggle.
    pub fn for_mode(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::None => StatusMessage::ModeOff,
            InteractionMode::Save => StatusMessage::SaveModeOn,
            InteractionMode::Apply => StatusMessage::ApplyModeOn,
        }
    }

    /// Whether the message reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusMessage::RenderFailed { .. }
                | StatusMessage::WriteFailed { .. }
                | StatusMessage::ImportFailed { .. }
                | StatusMessage::PositionReadFailed { .. }
                | StatusMessage::PositionWriteFailed { .. }
        )
    }
}

impl From<&PresetOutcome> for StatusMessage {
    fn from(outcome: &PresetOutcome) -> Self {
        match outcome {
            PresetOutcome::Saved { slot, .. } => StatusMessage::PresetSaved { slot: *slot },
            PresetOutcome::NoSelection { .. } => StatusMessage::SelectClipFirst,
            PresetOutcome::Applied { slot, .. } => StatusMessage::PresetApplied { slot: *slot },
            PresetOutcome::NotApplied { slot } => StatusMessage::PresetNotApplied { slot: *slot },
            PresetOutcome::EmptySlot { slot } => StatusMessage::PresetEmpty { slot: *slot },
            PresetOutcome::NoModeArmed { .. } => StatusMessage::ChoosePresetMode,
            PresetOutcome::HostFailed {
                action, message, ..
            } => match action {
                PresetAction::ReadPosition => StatusMessage::PositionReadFailed {
                    reason: message.clone(),
                },
                PresetAction::WritePosition => StatusMessage::PositionWriteFailed {
                    reason: message.clone(),
                },
            },
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::EnterText => write!(f, "Enter subtitle text first"),
            StatusMessage::ChooseFolder => write!(f, "Choose an output folder first"),
            StatusMessage::FolderSelected { path, next_number } => write!(
                f,
                "Saving to {} (next number {next_number})",
                path.display()
            ),
            StatusMessage::Generating => write!(f, "Generating..."),
            StatusMessage::Generated { file_name } => write!(f, "Created {file_name}"),
            StatusMessage::RenderFailed { reason } => write!(f, "Rendering failed: {reason}"),
            StatusMessage::WriteFailed { reason } => write!(f, "Saving failed: {reason}"),
            StatusMessage::ImportFailed { file_name, reason } => {
                write!(f, "Import of {file_name} failed: {reason}")
            }
            StatusMessage::SaveModeOn => {
                write!(f, "Click a slot to store the selected clip's position")
            }
            StatusMessage::ApplyModeOn => {
                write!(f, "Click a slot to move the selected clip there")
            }
            StatusMessage::ModeOff => write!(f, "Preset mode off"),
            StatusMessage::PresetSaved { slot } => write!(f, "Saved position to preset {slot}"),
            StatusMessage::SelectClipFirst => write!(f, "Select a clip on the timeline first"),
            StatusMessage::PresetApplied { slot } => write!(f, "Applied preset {slot}"),
            StatusMessage::PresetNotApplied { slot } => {
                write!(f, "Preset {slot} not applied: select a clip on the timeline")
            }
            StatusMessage::PresetEmpty { slot } => write!(f, "Preset {slot} is empty"),
            StatusMessage::ChoosePresetMode => write!(f, "Choose Save or Apply first"),
            StatusMessage::PositionReadFailed { reason } => {
                write!(f, "Could not read clip position: {reason}")
            }
            StatusMessage::PositionWriteFailed { reason } => {
                write!(f, "Could not move clip: {reason}")
            }
        }
    }
}
