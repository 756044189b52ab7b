//! Render a card to an arbitrary path.

use std::path::PathBuf;

use subcard_common::AppConfig;
use subcard_render::FontResolution;

use super::session::open_panel;

pub async fn run(config: &AppConfig, text: String, out: PathBuf) -> anyhow::Result<()> {
    let mut panel = open_panel(config);
    panel.set_text(text);

    let Some(card) = panel.preview().await? else {
        anyhow::bail!("Nothing to render: text is empty");
    };
    let png = card.encode_png()?;
    std::fs::write(&out, png)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", out.display()))?;

    println!("Preview written to {}", out.display());
    println!("  Size: {}x{}", card.width(), card.height());
    match card.font() {
        FontResolution::Exact { family } => println!("  Font: {family}"),
        FontResolution::Substituted { requested } => {
            println!("  Font: {requested} not found, substituted")
        }
        FontResolution::Unavailable => println!("  Font: none available, background only"),
    }
    Ok(())
}
