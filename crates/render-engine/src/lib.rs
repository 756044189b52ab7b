//! Subcard Render Engine
//!
//! Turns a line of text plus a [`SubtitleStyle`](subcard_model::SubtitleStyle)
//! into a card bitmap sized to fit the text.
//!
//! # Pipeline
//!
//! ```text
//! text ──┐
//!        ├── confirm font (bounded wait)
//! style ─┘         │
//!                  ├── shape + measure (rustybuzz)
//!                  │
//!                  ├── size: (textWidth + 2·padH) × (fontSize + 2·padV)
//!                  │
//!                  ├── background (rounded rect, bg color @ opacity)
//!                  │
//!                  ├── glyph outlines (ttf-parser → tiny-skia)
//!                  ▼
//!            RGBA pixmap ──► PNG
//! ```

pub mod fonts;
pub mod layout;
pub mod raster;
pub mod shaping;

pub use fonts::{FontCatalog, FontResolution};
pub use layout::{card_dimensions, CardLayout, MAX_CANVAS_PIXELS, MAX_CANVAS_SIDE};
pub use raster::{CardRenderer, RenderedCard};

/// Errors raised while rendering a card.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Failed to build background path")]
    Path,

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for subcard_common::SubcardError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Font(message) => subcard_common::SubcardError::font(message),
            other => subcard_common::SubcardError::render(other.to_string()),
        }
    }
}
