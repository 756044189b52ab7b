//! Subcard Model
//!
//! Defines the data contracts owned by a subtitle panel:
//! - **Style:** How a subtitle card looks (font, colors, padding, corners)
//! - **Output:** Where generated cards go and how they are numbered
//! - **Presets:** Nine fixed slots of saved clip positions
//!
//! Every record here is persisted as JSON with camelCase keys. Persisted
//! data is treated as untrusted: decoding is lenient and values are
//! sanitized rather than rejected.

pub mod color;
pub mod output;
pub mod preset;
pub mod style;

pub use color::*;
pub use output::*;
pub use preset::*;
pub use style::*;

/// Errors raised when constructing model values from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid color '{value}': expected #RRGGBB or #RGB")]
    InvalidColor { value: String },

    #[error("Invalid font weight '{value}': expected one of 400, 500, 600, 700, 800")]
    InvalidFontWeight { value: String },

    #[error("Preset slot {index} out of range (valid: {min}..={max})")]
    SlotOutOfRange { index: usize, min: usize, max: usize },

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },
}
