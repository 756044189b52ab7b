//! Dump the selected clip's properties.

use subcard_common::AppConfig;

use super::session::open_panel;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let panel = open_panel(config);

    match panel.clip_motion_info().await? {
        Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
        None => println!("No clip selected."),
    }
    Ok(())
}
