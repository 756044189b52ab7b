//! Render and save the next numbered card.

use std::path::PathBuf;

use subcard_common::AppConfig;
use subcard_panel::GenerateOutcome;

use super::session::open_panel;

pub async fn run(config: &AppConfig, text: String, folder: Option<PathBuf>) -> anyhow::Result<()> {
    let mut panel = open_panel(config);

    if let Some(dir) = folder {
        panel
            .set_output_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Cannot use output folder: {e}"))?;
    }
    panel.set_text(text);

    match panel.generate().await {
        GenerateOutcome::Generated(card) => {
            println!("Created {}", card.path.display());
            println!("  Size: {}x{}", card.width, card.height);
            if card.imported {
                println!("  Imported via {}", panel.host().name());
            }
            println!("  Next: {}", panel.output().next_file_name());
            Ok(())
        }
        GenerateOutcome::Rejected(status) | GenerateOutcome::Failed(status) => {
            anyhow::bail!("{status}")
        }
    }
}
