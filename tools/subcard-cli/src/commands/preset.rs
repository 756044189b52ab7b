//! Clip position presets.

use subcard_common::{AppConfig, InteractionPolicy};
use subcard_model::SlotIndex;
use subcard_panel::InteractionMode;

use super::session::{open_panel, CliPanel};
use crate::PresetAction;

pub async fn run(config: &AppConfig, action: PresetAction) -> anyhow::Result<()> {
    let mut panel = open_panel(config);

    match action {
        PresetAction::List => {
            list(&panel);
            Ok(())
        }
        PresetAction::Save { slot } => {
            let slot = SlotIndex::from_display(slot as usize)?;
            panel.toggle_save_mode();
            click(&mut panel, slot).await
        }
        PresetAction::Apply { slot } => {
            let slot = SlotIndex::from_display(slot as usize)?;
            if panel.presets().policy() == InteractionPolicy::ExplicitApply
                && panel.presets().mode() != InteractionMode::Apply
            {
                panel.toggle_apply_mode();
            }
            click(&mut panel, slot).await
        }
    }
}

async fn click(panel: &mut CliPanel, slot: SlotIndex) -> anyhow::Result<()> {
    panel.click_preset(slot).await;
    match panel.status() {
        Some(status) if status.is_error() => anyhow::bail!("{status}"),
        Some(status) => {
            println!("{status}");
            Ok(())
        }
        None => Ok(()),
    }
}

fn list(panel: &CliPanel) {
    println!("Position presets ({:?} mode):", panel.presets().policy());
    for (slot, preset) in panel.presets().slots().iter() {
        match preset {
            Some(p) => {
                let name = p.name.as_deref().map(|n| format!(" {n}")).unwrap_or_default();
                println!("  [{slot}] x={:.4} y={:.4}{name}", p.x, p.y);
            }
            None => println!("  [{slot}] (empty)"),
        }
    }
}
