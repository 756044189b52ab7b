//! Show configuration and session state.

use subcard_common::AppConfig;

use super::session::{open_panel, SessionArgs};

pub async fn run(config: &AppConfig, session: &SessionArgs) -> anyhow::Result<()> {
    let panel = open_panel(config);

    println!("Subcard {}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(50));

    println!("Config: {}", session.config_path().display());
    println!("State: {}", config.state_file.display());
    println!();

    println!("Host:");
    if config.host.command.is_empty() {
        println!("  Bridge: none (cards are written but not imported)");
    } else {
        println!("  Bridge: {}", config.host.command.join(" "));
        println!("  Timeout: {} ms", config.host.timeout_ms);
    }
    println!("  Import mode: {:?}", config.import_mode);
    println!("  Preset interaction: {:?}", config.presets.interaction);
    println!();

    let output = panel.output();
    println!("Output:");
    match output.save_dir() {
        Some(dir) => println!("  Folder: {}", dir.display()),
        None => println!("  Folder: (not chosen)"),
    }
    println!("  Prefix: {:?}", output.file_prefix);
    println!("  Next card: {}", output.next_file_name());
    println!();

    let style = panel.style();
    println!("Style: {}", style.font_shorthand());
    println!(
        "Presets: {}/{} filled",
        panel.presets().slots().filled_count(),
        panel.presets().slots().len()
    );
    println!();

    let faces = panel.renderer().fonts().face_count().await;
    if faces == 0 {
        println!("[WARN] No fonts available; cards will have no text");
    } else {
        println!("[OK] Fonts available: {faces}");
    }

    Ok(())
}
