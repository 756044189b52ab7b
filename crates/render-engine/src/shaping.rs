//! Single-line text shaping and glyph outlines.

use tiny_skia::{Path, PathBuilder};

use crate::fonts::LoadedFace;
use crate::RenderError;

/// One positioned glyph, in pixels relative to the text origin.
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph {
    pub glyph_id: u16,
    /// Pen position plus shaping offset, letter spacing included.
    pub x: f32,
    /// Vertical shaping offset (positive is up).
    pub y_offset: f32,
}

/// A shaped line of text.
#[derive(Debug, Clone)]
pub struct ShapedLine {
    pub glyphs: Vec<PlacedGlyph>,
    /// Advance width including letter spacing between glyphs.
    pub width: f32,
    /// Ascender in pixels (positive).
    pub ascent: f32,
    /// Descender in pixels (negative).
    pub descent: f32,
    pub font_size: f32,
}

/// Shape `text` at `font_size` px with `letter_spacing` px added between glyphs.
pub fn shape_line(
    face: &LoadedFace,
    text: &str,
    font_size: f32,
    letter_spacing: f32,
) -> Result<ShapedLine, RenderError> {
    let rb_face = rustybuzz::Face::from_slice(&face.data, face.index)
        .ok_or_else(|| RenderError::Font("failed to create shaping face".to_string()))?;
    let ttf_face = ttf_parser::Face::parse(&face.data, face.index)
        .map_err(|e| RenderError::Font(format!("failed to parse font: {e}")))?;

    let units_per_em = ttf_face.units_per_em().max(1) as f32;
    let scale = font_size / units_per_em;

    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    let output = rustybuzz::shape(&rb_face, &[], buffer);

    let mut glyphs = Vec::with_capacity(output.len());
    let mut pen_x = 0.0f32;
    let count = output.len();

    for (i, (info, pos)) in output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .enumerate()
    {
        glyphs.push(PlacedGlyph {
            glyph_id: info.glyph_id as u16,
            x: pen_x + pos.x_offset as f32 * scale,
            y_offset: pos.y_offset as f32 * scale,
        });
        pen_x += pos.x_advance as f32 * scale;
        if i + 1 < count {
            pen_x += letter_spacing;
        }
    }

    Ok(ShapedLine {
        glyphs,
        width: pen_x,
        ascent: ttf_face.ascender() as f32 * scale,
        descent: ttf_face.descender() as f32 * scale,
        font_size,
    })
}

/// Build one fill path for every glyph of `line`, with the text origin at
/// `(origin_x, baseline_y)` in canvas coordinates.
pub fn outline_line(
    face: &LoadedFace,
    line: &ShapedLine,
    origin_x: f32,
    baseline_y: f32,
) -> Result<Option<Path>, RenderError> {
    let ttf_face = ttf_parser::Face::parse(&face.data, face.index)
        .map_err(|e| RenderError::Font(format!("failed to parse font: {e}")))?;
    let scale = line.font_size / ttf_face.units_per_em().max(1) as f32;

    let mut sink = OutlineSink {
        builder: PathBuilder::new(),
        scale,
        dx: 0.0,
        dy: 0.0,
    };

    for glyph in &line.glyphs {
        sink.dx = origin_x + glyph.x;
        sink.dy = baseline_y - glyph.y_offset;
        ttf_face.outline_glyph(ttf_parser::GlyphId(glyph.glyph_id), &mut sink);
    }

    Ok(sink.builder.finish())
}

/// Converts font units (y up) to canvas pixels (y down) at a glyph origin.
struct OutlineSink {
    builder: PathBuilder,
    scale: f32,
    dx: f32,
    dy: f32,
}

impl OutlineSink {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.dx + x * self.scale, self.dy - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
