//! Subtitle card rasterization.
//!
//! Drawing is two-phase: the text is shaped and measured first, the bitmap is
//! then allocated at the final size, and only after that are the background
//! and text drawn. Preview and generation both go through
//! [`CardRenderer::render`], so an exported card always matches its preview.

use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};

use subcard_model::{HexColor, SubtitleStyle};

use crate::fonts::{FontCatalog, FontResolution};
use crate::layout::CardLayout;
use crate::shaping::{outline_line, shape_line};
use crate::{RenderError, RenderResult};

/// A rendered card bitmap.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pixmap: Pixmap,
    layout: CardLayout,
    font: FontResolution,
}

impl RenderedCard {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// How the requested font was resolved for this card.
    pub fn font(&self) -> &FontResolution {
        &self.font
    }

    /// Premultiplied RGBA8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode as a 32-bit RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

/// Renders subtitle cards with fonts from a shared catalog.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    fonts: FontCatalog,
}

impl CardRenderer {
    pub fn new(fonts: FontCatalog) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontCatalog {
        &self.fonts
    }

    /// Render `text` with `style`. Empty text renders nothing.
    ///
    /// A font that cannot be confirmed is not an error: the card is sized
    /// and drawn with whatever face was substituted, or without text.
    pub async fn render(
        &self,
        text: &str,
        style: &SubtitleStyle,
    ) -> RenderResult<Option<RenderedCard>> {
        if text.is_empty() {
            return Ok(None);
        }
        let style = style.clone().sanitized();

        // Measure.
        let (font, face) = self.fonts.confirm(&style.font_family, style.font_weight).await;
        let shaped = match &face {
            Some(face) => Some(shape_line(
                face,
                text,
                style.font_size as f32,
                style.letter_spacing as f32,
            )?),
            None => None,
        };
        let measured_width = shaped.as_ref().map(|line| line.width).unwrap_or(0.0);

        // Resize.
        let layout = CardLayout::compute(measured_width, &style);
        let canvas_error = RenderError::Canvas {
            width: layout.width,
            height: layout.height,
        };
        if !layout.within_canvas_limits() {
            return Err(canvas_error);
        }
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or(canvas_error)?;

        // Draw.
        fill_background(&mut pixmap, &layout, style.bg_color, style.bg_opacity)?;

        if let (Some(face), Some(line)) = (&face, &shaped) {
            let baseline = layout.baseline_y(line.ascent, line.descent);
            if let Some(path) = outline_line(face, line, layout.text_x, baseline)? {
                fill_solid(&mut pixmap, &path, style.text_color, 255);
            }
        }

        tracing::debug!(
            width = layout.width,
            height = layout.height,
            font = ?font,
            "Rendered subtitle card"
        );

        Ok(Some(RenderedCard {
            pixmap,
            layout,
            font,
        }))
    }
}

fn fill_background(
    pixmap: &mut Pixmap,
    layout: &CardLayout,
    color: HexColor,
    opacity: u8,
) -> RenderResult<()> {
    let [r, g, b, a] = color.to_rgba8(opacity);
    if a == 0 {
        return Ok(());
    }

    let (w, h) = (layout.width as f32, layout.height as f32);
    if layout.corner_radius > 0.0 {
        let path = rounded_rect(w, h, layout.corner_radius).ok_or(RenderError::Path)?;
        fill_solid(pixmap, &path, HexColor::rgb(r, g, b), a);
    } else {
        let rect = Rect::from_xywh(0.0, 0.0, w, h).ok_or(RenderError::Path)?;
        let paint = solid_paint(HexColor::rgb(r, g, b), a);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
    Ok(())
}

fn solid_paint(color: HexColor, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn fill_solid(pixmap: &mut Pixmap, path: &Path, color: HexColor, alpha: u8) {
    let paint = solid_paint(color, alpha);
    pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
}

/// Rectangle at the origin with circular corners of radius `r`.
fn rounded_rect(w: f32, h: f32, r: f32) -> Option<Path> {
    // Cubic approximation of a quarter circle.
    let k = 0.552_284_75 * r;
    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    pb.cubic_to(w - r + k, 0.0, w, r - k, w, r);
    pb.line_to(w, h - r);
    pb.cubic_to(w, h - r + k, w - r + k, h, w - r, h);
    pb.line_to(r, h);
    pb.cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_style() -> SubtitleStyle {
        SubtitleStyle {
            font_size: 48,
            padding_h: 24,
            padding_v: 16,
            border_radius: 8,
            bg_opacity: 70,
            ..SubtitleStyle::default()
        }
    }

    fn alpha_at(card: &RenderedCard, x: u32, y: u32) -> u8 {
        card.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_empty_text_renders_nothing() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        assert!(renderer.render("", &reference_style()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_without_fonts_card_is_background_only() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let card = renderer
            .render("Hello", &reference_style())
            .await
            .unwrap()
            .unwrap();
        assert_eq!((card.width(), card.height()), (48, 80));
        assert_eq!(card.font(), &FontResolution::Unavailable);
    }

    #[tokio::test]
    async fn test_rounded_background_alpha() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let card = renderer
            .render("Hi", &reference_style())
            .await
            .unwrap()
            .unwrap();

        // Outside the rounded corner.
        assert_eq!(alpha_at(&card, 0, 0), 0);
        assert_eq!(alpha_at(&card, card.width() - 1, card.height() - 1), 0);

        // Inside: 70% opacity.
        let inside = alpha_at(&card, 4, card.height() / 2);
        assert!((inside as i32 - 179).abs() <= 1, "alpha was {inside}");
    }

    #[tokio::test]
    async fn test_square_background_covers_corners() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let style = SubtitleStyle {
            border_radius: 0,
            bg_opacity: 100,
            ..reference_style()
        };
        let card = renderer.render("Hi", &style).await.unwrap().unwrap();
        assert_eq!(alpha_at(&card, 0, 0), 255);
        assert_eq!(alpha_at(&card, card.width() - 1, card.height() - 1), 255);
    }

    #[tokio::test]
    async fn test_zero_opacity_leaves_transparent_canvas() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let style = SubtitleStyle {
            bg_opacity: 0,
            ..reference_style()
        };
        let card = renderer.render("Hi", &style).await.unwrap().unwrap();
        assert!(card.data().iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_png_encoding_has_signature() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let card = renderer
            .render("Hi", &reference_style())
            .await
            .unwrap()
            .unwrap();
        let png = card.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    fn system_fonts() -> FontCatalog {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        assert!(!db.is_empty(), "text rendering tests need an installed font");
        FontCatalog::from_database(db)
    }

    #[tokio::test]
    async fn test_text_widens_card() {
        let renderer = CardRenderer::new(system_fonts());
        let style = SubtitleStyle {
            text_color: HexColor::rgb(255, 0, 0),
            bg_opacity: 0,
            ..reference_style()
        };
        let short = renderer.render("Hi", &style).await.unwrap().unwrap();
        let long = renderer.render("Hello there", &style).await.unwrap().unwrap();
        assert!(long.width() > short.width());
        assert_eq!(long.height(), 80);
        assert!(long.layout().text_width > 0.0);
        assert!(long.data().chunks(4).any(|px| px[3] > 0));
    }

    #[tokio::test]
    async fn test_letter_spacing_adds_between_glyphs() {
        let renderer = CardRenderer::new(system_fonts());
        let tight = SubtitleStyle {
            letter_spacing: 0,
            ..reference_style()
        };
        let loose = SubtitleStyle {
            letter_spacing: 10,
            ..reference_style()
        };
        let w0 = renderer.render("Hello", &tight).await.unwrap().unwrap();
        let w10 = renderer.render("Hello", &loose).await.unwrap().unwrap();

        // Five glyphs, four gaps.
        let added = w10.layout().text_width - w0.layout().text_width;
        assert!((added - 40.0).abs() < 0.01, "spacing added {added}");
        assert!((w10.width() as i64 - w0.width() as i64 - 40).abs() <= 1);
    }

    #[tokio::test]
    async fn test_repeat_renders_are_identical() {
        let renderer = CardRenderer::new(system_fonts());
        let style = reference_style();
        let first = renderer.render("Hello", &style).await.unwrap().unwrap();
        let second = renderer.render("Hello", &style).await.unwrap().unwrap();
        assert_eq!(first.data(), second.data());
        assert_eq!(first.encode_png().unwrap(), second.encode_png().unwrap());
    }

    #[tokio::test]
    async fn test_oversized_font_is_capped() {
        let renderer = CardRenderer::new(system_fonts());
        let style = SubtitleStyle {
            font_size: 20_000,
            ..reference_style()
        };
        let card = renderer.render("Hello", &style).await.unwrap().unwrap();
        assert_eq!(card.height(), subcard_model::MAX_FONT_SIZE + 32);
    }

    #[tokio::test]
    async fn test_oversized_canvas_is_an_error() {
        let renderer = CardRenderer::new(FontCatalog::empty());
        let style = SubtitleStyle {
            padding_h: 10_000,
            ..reference_style()
        };
        let err = renderer.render("Hello", &style).await.unwrap_err();
        assert!(matches!(
            err,
            RenderError::Canvas {
                width: 20_000,
                height: 80
            }
        ));
    }
}
