//! Output folder, prefix and sequence number.

use std::path::PathBuf;

use subcard_common::AppConfig;

use super::session::open_panel;

pub fn run(config: &AppConfig, dir: PathBuf) -> anyhow::Result<()> {
    let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
    let mut panel = open_panel(config);
    panel.set_output_dir(&dir)?;

    if let Some(status) = panel.status() {
        println!("{status}");
    }
    Ok(())
}

pub fn set_prefix(config: &AppConfig, prefix: String) -> anyhow::Result<()> {
    if prefix.contains(&['/', '\\'][..]) {
        anyhow::bail!("Prefix must not contain path separators: {prefix}");
    }
    let mut panel = open_panel(config);
    panel.set_prefix(prefix);
    println!("Next card: {}", panel.output().next_file_name());
    Ok(())
}

pub fn set_number(config: &AppConfig, number: u32) -> anyhow::Result<()> {
    let mut panel = open_panel(config);
    panel.set_current_number(number);
    println!("Next card: {}", panel.output().next_file_name());
    Ok(())
}
