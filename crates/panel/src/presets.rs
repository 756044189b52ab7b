//! Position preset slots and the click state machine around them.

use subcard_common::InteractionPolicy;
use subcard_host::{ClipPosition, HostBridge};
use subcard_model::{PositionPreset, PresetSlots, SlotIndex};

/// What the next slot click means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    None,
    /// Next click stores the selected clip's position.
    Save,
    /// Next click moves the selected clip (explicit-apply policy only).
    Apply,
}

/// Host call a preset action was making when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetAction {
    ReadPosition,
    WritePosition,
}

/// Result of one slot click.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetOutcome {
    /// The slot now holds the selected clip's position.
    Saved {
        slot: SlotIndex,
        preset: PositionPreset,
    },
    /// Save mode click with no clip selected. Slots unchanged.
    NoSelection { slot: SlotIndex },
    /// The selected clip was moved to the slot's position.
    Applied {
        slot: SlotIndex,
        position: ClipPosition,
    },
    /// The host declined to move the clip (typically nothing selected).
    NotApplied { slot: SlotIndex },
    /// Apply on an empty slot. No host call was made.
    EmptySlot { slot: SlotIndex },
    /// Click with no mode armed under the explicit-apply policy.
    NoModeArmed { slot: SlotIndex },
    /// The host call itself failed.
    HostFailed {
        slot: SlotIndex,
        action: PresetAction,
        message: String,
    },
}

impl PresetOutcome {
    /// Whether the slot array changed and should be persisted.
    pub fn modified_slots(&self) -> bool {
        matches!(self, PresetOutcome::Saved { .. })
    }
}

/// Nine preset slots plus the current interaction mode.
#[derive(Debug, Clone)]
pub struct PresetController {
    slots: PresetSlots,
    mode: InteractionMode,
    policy: InteractionPolicy,
}

impl PresetController {
    pub fn new(slots: PresetSlots, policy: InteractionPolicy) -> Self {
        Self {
            slots,
            mode: InteractionMode::None,
            policy,
        }
    }

    pub fn slots(&self) -> &PresetSlots {
        &self.slots
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn policy(&self) -> InteractionPolicy {
        self.policy
    }

    /// Flip save mode on or off. Turning it on disarms apply mode.
    pub fn toggle_save(&mut self) -> InteractionMode {
        self.mode = match self.mode {
            InteractionMode::Save => InteractionMode::None,
            _ => InteractionMode::Save,
        };
        self.mode
    }

    /// Flip apply mode on or off.
    ///
    /// Under the immediate policy there is no apply mode; the call only
    /// cancels a pending save.
    pub fn toggle_apply(&mut self) -> InteractionMode {
        self.mode = match (self.policy, self.mode) {
            (InteractionPolicy::Immediate, _) => InteractionMode::None,
            (InteractionPolicy::ExplicitApply, InteractionMode::Apply) => InteractionMode::None,
            (InteractionPolicy::ExplicitApply, _) => InteractionMode::Apply,
        };
        self.mode
    }

    /// Handle a click on `slot`.
    ///
    /// Save and apply modes are consumed by the click whatever its result, so
    /// the controller is always back in [`InteractionMode::None`] afterwards.
    pub async fn click<H>(&mut self, slot: SlotIndex, host: &H) -> PresetOutcome
    where
        H: HostBridge + ?Sized,
    {
        let mode = std::mem::take(&mut self.mode);
        match (mode, self.policy) {
            (InteractionMode::Save, _) => self.save(slot, host).await,
            (InteractionMode::Apply, _) | (InteractionMode::None, InteractionPolicy::Immediate) => {
                self.apply(slot, host).await
            }
            (InteractionMode::None, InteractionPolicy::ExplicitApply) => {
                PresetOutcome::NoModeArmed { slot }
            }
        }
    }

    async fn save<H>(&mut self, slot: SlotIndex, host: &H) -> PresetOutcome
    where
        H: HostBridge + ?Sized,
    {
        match host.selected_clip_position().await {
            Ok(Some(position)) => {
                let name = format!("Preset {slot}");
                let preset = PositionPreset::named(position.x, position.y, name);
                self.slots.set(slot, preset.clone());
                tracing::info!(slot = %slot, x = position.x, y = position.y, "Preset saved");
                PresetOutcome::Saved { slot, preset }
            }
            Ok(None) => PresetOutcome::NoSelection { slot },
            Err(e) => {
                tracing::warn!(
                    slot = %slot,
                    host = host.name(),
                    error = %e,
                    "Reading clip position failed"
                );
                PresetOutcome::HostFailed {
                    slot,
                    action: PresetAction::ReadPosition,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn apply<H>(&self, slot: SlotIndex, host: &H) -> PresetOutcome
    where
        H: HostBridge + ?Sized,
    {
        let Some(preset) = self.slots.get(slot) else {
            return PresetOutcome::EmptySlot { slot };
        };
        let position = ClipPosition::new(preset.x, preset.y);

        match host.set_selected_clip_position(position).await {
            Ok(true) => {
                tracing::info!(slot = %slot, x = position.x, y = position.y, "Preset applied");
                PresetOutcome::Applied { slot, position }
            }
            Ok(false) => PresetOutcome::NotApplied { slot },
            Err(e) => {
                tracing::warn!(
                    slot = %slot,
                    host = host.name(),
                    error = %e,
                    "Setting clip position failed"
                );
                PresetOutcome::HostFailed {
                    slot,
                    action: PresetAction::WritePosition,
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subcard_host::MemoryHost;

    fn slot(n: usize) -> SlotIndex {
        SlotIndex::from_display(n).unwrap()
    }

    #[test]
    fn test_save_toggle() {
        let mut presets = PresetController::new(PresetSlots::new(), InteractionPolicy::Immediate);
        assert_eq!(presets.mode(), InteractionMode::None);
        assert_eq!(presets.toggle_save(), InteractionMode::Save);
        assert_eq!(presets.toggle_save(), InteractionMode::None);
    }

    #[test]
    fn test_apply_toggle_depends_on_policy() {
        let mut immediate = PresetController::new(PresetSlots::new(), InteractionPolicy::Immediate);
        immediate.toggle_save();
        assert_eq!(immediate.toggle_apply(), InteractionMode::None);
        assert_eq!(immediate.toggle_apply(), InteractionMode::None);

        let mut explicit =
            PresetController::new(PresetSlots::new(), InteractionPolicy::ExplicitApply);
        assert_eq!(explicit.toggle_apply(), InteractionMode::Apply);
        assert_eq!(explicit.toggle_save(), InteractionMode::Save);
        assert_eq!(explicit.toggle_apply(), InteractionMode::Apply);
        assert_eq!(explicit.toggle_apply(), InteractionMode::None);
    }

    #[tokio::test]
    async fn test_save_stores_selected_position() {
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.25, 0.8));
        let mut presets = PresetController::new(PresetSlots::new(), InteractionPolicy::Immediate);

        presets.toggle_save();
        let outcome = presets.click(slot(3), &host).await;

        assert!(outcome.modified_slots());
        assert_eq!(presets.mode(), InteractionMode::None);
        assert_eq!(
            presets.slots().get(slot(3)),
            Some(&PositionPreset::named(0.25, 0.8, "Preset 3"))
        );
        assert_eq!(presets.slots().filled_count(), 1);
    }

    #[tokio::test]
    async fn test_save_overwrites_slot_wholesale() {
        let mut slots = PresetSlots::new();
        slots.set(slot(1), PositionPreset::named(0.1, 0.1, "Lower third"));
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.5, 0.9));
        let mut presets = PresetController::new(slots, InteractionPolicy::Immediate);

        presets.toggle_save();
        presets.click(slot(1), &host).await;
        assert_eq!(
            presets.slots().get(slot(1)),
            Some(&PositionPreset::named(0.5, 0.9, "Preset 1"))
        );
    }

    #[tokio::test]
    async fn test_save_without_selection_is_consumed() {
        let host = MemoryHost::new();
        let mut presets = PresetController::new(PresetSlots::new(), InteractionPolicy::Immediate);

        presets.toggle_save();
        let outcome = presets.click(slot(2), &host).await;

        assert_eq!(outcome, PresetOutcome::NoSelection { slot: slot(2) });
        assert_eq!(presets.mode(), InteractionMode::None);
        assert!(presets.slots().is_empty());
    }

    #[tokio::test]
    async fn test_save_host_failure_keeps_slots() {
        let mut slots = PresetSlots::new();
        slots.set(slot(5), PositionPreset::new(0.3, 0.3));
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.9, 0.9));
        host.set_failure(Some("scripting bridge crashed"));
        let mut presets = PresetController::new(slots.clone(), InteractionPolicy::Immediate);

        presets.toggle_save();
        let outcome = presets.click(slot(5), &host).await;

        assert!(matches!(
            outcome,
            PresetOutcome::HostFailed {
                action: PresetAction::ReadPosition,
                ..
            }
        ));
        assert_eq!(presets.mode(), InteractionMode::None);
        assert_eq!(presets.slots(), &slots);
    }

    #[tokio::test]
    async fn test_apply_empty_slot_makes_no_host_call() {
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.5, 0.5));
        let mut presets = PresetController::new(PresetSlots::new(), InteractionPolicy::Immediate);

        let outcome = presets.click(slot(9), &host).await;

        assert_eq!(outcome, PresetOutcome::EmptySlot { slot: slot(9) });
        assert_eq!(host.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_immediate_click_applies() {
        let mut slots = PresetSlots::new();
        slots.set(slot(4), PositionPreset::new(-0.5, 1.75));
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.0, 0.0));
        let mut presets = PresetController::new(slots, InteractionPolicy::Immediate);

        let outcome = presets.click(slot(4), &host).await;

        // Coordinates pass through unclamped.
        assert_eq!(
            outcome,
            PresetOutcome::Applied {
                slot: slot(4),
                position: ClipPosition::new(-0.5, 1.75)
            }
        );
        assert_eq!(host.selection(), Some(ClipPosition::new(-0.5, 1.75)));
        assert_eq!(presets.mode(), InteractionMode::None);
    }

    #[tokio::test]
    async fn test_apply_without_selection_is_not_applied() {
        let mut slots = PresetSlots::new();
        slots.set(slot(1), PositionPreset::new(0.2, 0.2));
        let host = MemoryHost::new();
        let mut presets = PresetController::new(slots, InteractionPolicy::Immediate);

        let outcome = presets.click(slot(1), &host).await;
        assert_eq!(outcome, PresetOutcome::NotApplied { slot: slot(1) });
    }

    #[tokio::test]
    async fn test_explicit_apply_requires_arming() {
        let mut slots = PresetSlots::new();
        slots.set(slot(6), PositionPreset::new(0.6, 0.4));
        let host = MemoryHost::new().with_selection(ClipPosition::new(0.0, 0.0));
        let mut presets = PresetController::new(slots, InteractionPolicy::ExplicitApply);

        let outcome = presets.click(slot(6), &host).await;
        assert_eq!(outcome, PresetOutcome::NoModeArmed { slot: slot(6) });
        assert_eq!(host.calls().total(), 0);

        presets.toggle_apply();
        let outcome = presets.click(slot(6), &host).await;
        assert!(matches!(outcome, PresetOutcome::Applied { .. }));
        assert_eq!(presets.mode(), InteractionMode::None);
        assert_eq!(host.selection(), Some(ClipPosition::new(0.6, 0.4)));
    }

    #[tokio::test]
    async fn test_apply_host_failure_returns_to_none() {
        let mut slots = PresetSlots::new();
        slots.set(slot(2), PositionPreset::new(0.2, 0.7));
        let host = MemoryHost::detached();
        let mut presets = PresetController::new(slots, InteractionPolicy::ExplicitApply);

        presets.toggle_apply();
        let outcome = presets.click(slot(2), &host).await;
        assert!(matches!(
            outcome,
            PresetOutcome::HostFailed {
                action: PresetAction::WritePosition,
                ..
            }
        ));
        assert_eq!(presets.mode(), InteractionMode::None);
    }
}
