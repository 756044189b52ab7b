pub mod clip_info;
pub mod folder;
pub mod generate;
pub mod info;
pub mod preset;
pub mod preview;
pub mod session;
pub mod style;
