//! Card geometry.

use subcard_model::SubtitleStyle;

/// Longest canvas side that will be allocated.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Largest canvas area, in pixels, that will be allocated (256 MiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Final geometry of a card bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    /// Measured advance width of the text, letter spacing included.
    pub text_width: f32,
    /// Horizontal text origin.
    pub text_x: f32,
    /// Vertical center the text is aligned on (`height / 2 + textOffsetY`).
    pub text_center_y: f32,
    /// Corner radius actually drawn, limited to half the shorter side.
    pub corner_radius: f32,
}

/// Bitmap size for a measured text width:
/// `(ceil(width) + 2 * paddingH, fontSize + 2 * paddingV)`, each at least 1.
pub fn card_dimensions(measured_width: f32, style: &SubtitleStyle) -> (u32, u32) {
    let text_width = if measured_width.is_finite() {
        measured_width.max(0.0).ceil() as u32
    } else {
        0
    };
    let width = text_width.saturating_add(style.padding_h.saturating_mul(2));
    let height = style
        .font_size
        .saturating_add(style.padding_v.saturating_mul(2));
    (width.max(1), height.max(1))
}

impl CardLayout {
    pub fn compute(measured_width: f32, style: &SubtitleStyle) -> Self {
        let (width, height) = card_dimensions(measured_width, style);
        let max_radius = width.min(height) as f32 / 2.0;
        Self {
            width,
            height,
            text_width: measured_width.max(0.0),
            text_x: style.padding_h as f32,
            text_center_y: height as f32 / 2.0 + style.text_offset_y as f32,
            corner_radius: (style.border_radius as f32).min(max_radius),
        }
    }

    /// Whether the bitmap is small enough to allocate.
    pub fn within_canvas_limits(&self) -> bool {
        self.width <= MAX_CANVAS_SIDE
            && self.height <= MAX_CANVAS_SIDE
            && u64::from(self.width) * u64::from(self.height) <= MAX_CANVAS_PIXELS
    }

    /// Baseline that puts the middle of the ascender/descender span on the text center.
    pub fn baseline_y(&self, ascent: f32, descent: f32) -> f32 {
        self.text_center_y + (ascent + descent) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_card_size() {
        let style = SubtitleStyle {
            font_size: 48,
            padding_h: 24,
            padding_v: 16,
            border_radius: 8,
            bg_opacity: 70,
            ..SubtitleStyle::default()
        };
        assert_eq!(card_dimensions(120.0, &style), (168, 80));
    }

    #[test]
    fn test_fractional_width_rounds_up() {
        let style = SubtitleStyle::default();
        assert_eq!(card_dimensions(120.2, &style), (169, 80));
    }

    #[test]
    fn test_degenerate_inputs() {
        let style = SubtitleStyle {
            padding_h: 0,
            padding_v: 0,
            font_size: 1,
            ..SubtitleStyle::default()
        };
        assert_eq!(card_dimensions(-12.0, &style), (1, 1));
        assert_eq!(card_dimensions(f32::NAN, &style), (1, 1));
    }

    #[test]
    fn test_layout_positions() {
        let style = SubtitleStyle {
            text_offset_y: -6,
            border_radius: 500,
            ..SubtitleStyle::default()
        };
        let layout = CardLayout::compute(100.0, &style);
        assert_eq!((layout.width, layout.height), (148, 80));
        assert_eq!(layout.text_x, 24.0);
        assert_eq!(layout.text_center_y, 34.0);
        assert_eq!(layout.corner_radius, 40.0);
        assert_eq!(layout.baseline_y(40.0, -10.0), 49.0);
    }

    #[test]
    fn test_canvas_limits() {
        let style = SubtitleStyle::default();
        assert!(CardLayout::compute(1000.0, &style).within_canvas_limits());

        let wide = CardLayout::compute(MAX_CANVAS_SIDE as f32, &style);
        assert!(!wide.within_canvas_limits());

        let tall = SubtitleStyle {
            padding_v: 6_000,
            ..SubtitleStyle::default()
        };
        let layout = CardLayout::compute(12_000.0, &tall);
        assert!(layout.width <= MAX_CANVAS_SIDE && layout.height <= MAX_CANVAS_SIDE);
        assert!(!layout.within_canvas_limits());
    }
}
