//! Subcard CLI: render subtitle cards and manage clip position presets.
//!
//! Usage:
//!   subcard generate <TEXT>            Render and save the next numbered card
//!   subcard preview <TEXT> --out <PNG> Render a card without numbering it
//!   subcard folder <DIR>               Choose the output folder
//!   subcard prefix <PREFIX>            Change the file name prefix
//!   subcard number <N>                 Set the next sequence number
//!   subcard style show|set|reset       Inspect or edit the card style
//!   subcard preset list|save|apply     Manage the nine position presets
//!   subcard clip-info                  Dump the selected clip's properties
//!   subcard info                       Show configuration and session state

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::session::SessionArgs;

#[derive(Parser)]
#[command(
    name = "subcard",
    about = "Subtitle card generator with clip position presets",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file holding style, output settings and presets
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Host bridge command, e.g. "node bridge.js"
    #[arg(long, global = true)]
    host_cmd: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render TEXT and save it as the next numbered card
    Generate {
        /// Subtitle text
        text: String,

        /// Output folder to select before generating
        #[arg(short, long)]
        folder: Option<PathBuf>,
    },

    /// Render TEXT to a standalone PNG without touching the sequence
    Preview {
        /// Subtitle text
        text: String,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Select the output folder and rescan its numbering
    Folder {
        /// Output directory
        dir: PathBuf,
    },

    /// Change the file name prefix
    Prefix {
        /// New prefix, e.g. "sub_"
        prefix: String,
    },

    /// Set the number the next card will use
    Number {
        /// Next sequence number; values below 1 become 1
        number: u32,
    },

    /// Inspect or edit the card style
    Style {
        #[command(subcommand)]
        action: StyleAction,
    },

    /// Manage clip position presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Dump the selected clip's components and properties
    ClipInfo,

    /// Show configuration and session state
    Info,
}

#[derive(Subcommand)]
pub enum StyleAction {
    /// Print the current style
    Show,

    /// Set one style field
    Set {
        /// Field name, e.g. fontSize or bg_opacity
        field: String,

        /// New value
        value: String,
    },

    /// Restore the default style
    Reset,
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// List all preset slots
    List,

    /// Store the selected clip's position in a slot
    Save {
        /// Slot number (1-9)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=9))]
        slot: u8,
    },

    /// Move the selected clip to a slot's position
    Apply {
        /// Slot number (1-9)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=9))]
        slot: u8,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let session = SessionArgs {
        config: cli.config,
        state_file: cli.state_file,
        host_cmd: cli.host_cmd,
    };
    let config = session.load_config()?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    subcard_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Generate { text, folder } => commands::generate::run(&config, text, folder).await,
        Commands::Preview { text, out } => commands::preview::run(&config, text, out).await,
        Commands::Folder { dir } => commands::folder::run(&config, dir),
        Commands::Prefix { prefix } => commands::folder::set_prefix(&config, prefix),
        Commands::Number { number } => commands::folder::set_number(&config, number),
        Commands::Style { action } => commands::style::run(&config, action),
        Commands::Preset { action } => commands::preset::run(&config, action).await,
        Commands::ClipInfo => commands::clip_info::run(&config).await,
        Commands::Info => commands::info::run(&config, &session).await,
    }
}
