//! Inspect or edit the card style.

use subcard_common::AppConfig;
use subcard_model::{SubtitleStyle, STYLE_FIELDS};

use super::session::open_panel;
use crate::StyleAction;

pub fn run(config: &AppConfig, action: StyleAction) -> anyhow::Result<()> {
    let mut panel = open_panel(config);

    match action {
        StyleAction::Show => print_style(panel.style()),
        StyleAction::Set { field, value } => {
            panel.set_style_field(&field, &value).map_err(|e| {
                anyhow::anyhow!("{e}\nKnown fields: {}", STYLE_FIELDS.join(", "))
            })?;
            print_style(panel.style());
        }
        StyleAction::Reset => {
            panel.reset_style();
            println!("Style reset to defaults.");
            print_style(panel.style());
        }
    }
    Ok(())
}

fn print_style(style: &SubtitleStyle) {
    println!("Style:");
    println!(
        "  Font: {} ({})",
        style.font_shorthand(),
        style.font_weight.label()
    );
    println!("  Letter spacing: {}px", style.letter_spacing);
    println!("  Text color: {}", style.text_color);
    println!("  Background: {} @ {}%", style.bg_color, style.bg_opacity);
    println!(
        "  Padding: {}px vertical, {}px horizontal",
        style.padding_v, style.padding_h
    );
    println!("  Border radius: {}px", style.border_radius);
    println!("  Text offset Y: {}px", style.text_offset_y);
}
