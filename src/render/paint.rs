use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use super::glyphs::{GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH, LINE_ADVANCE, glyph_rows};
use super::wrap::wrap_label;
use crate::error::GenerateResult;

pub const CARD_WIDTH: u32 = 300;
pub const CARD_HEIGHT: u32 = 180;
/// Maximum characters per wrapped line.
pub const WRAP_WIDTH: usize = 10;
pub const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
pub const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

const MARGIN: u32 = 8;
const PREFERRED_FONT_PX: f32 = 80.0;
const MIN_FONT_PX: f32 = 12.0;
const MAX_BITMAP_SCALE: u32 = 6;
const PREFERRED_FONT_FILE: &str = "DejaVuSans-Bold.ttf";
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "C:\\Windows\\Fonts",
];

pub type CardImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Which font the renderer should use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontChoice {
    /// Probe well-known system locations for DejaVu Sans Bold.
    #[default]
    Auto,
    /// Load a specific TrueType/OpenType file.
    Path(PathBuf),
    /// Always use the built-in bitmap font.
    Bitmap,
}

/// Renders card labels onto fixed-size canvases.
///
/// Both variants share the same wrap-measure-center layout; they differ only
/// in how a line is measured and drawn.
#[derive(Clone)]
pub enum CardRenderer {
    Scalable(FontArc),
    Bitmap,
}

impl fmt::Debug for CardRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardRenderer::Scalable(_) => f.write_str("CardRenderer::Scalable"),
            CardRenderer::Bitmap => f.write_str("CardRenderer::Bitmap"),
        }
    }
}

impl CardRenderer {
    /// Select a renderer. Never fails: a font that cannot be found or parsed
    /// degrades to the bitmap font with a warning.
    pub fn select(choice: &FontChoice) -> Self {
        match choice {
            FontChoice::Bitmap => CardRenderer::Bitmap,
            FontChoice::Path(path) => match load_font(path) {
                Ok(font) => CardRenderer::Scalable(font),
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "falling back to bitmap font");
                    CardRenderer::Bitmap
                }
            },
            FontChoice::Auto => {
                let found = FONT_DIRS
                    .iter()
                    .map(|dir| Path::new(dir).join(PREFERRED_FONT_FILE))
                    .find_map(|path| load_font(&path).ok().map(|font| (path, font)));
                match found {
                    Some((path, font)) => {
                        debug!(path = %path.display(), "using scalable font");
                        CardRenderer::Scalable(font)
                    }
                    None => {
                        warn!(font = PREFERRED_FONT_FILE, "font not found; falling back to bitmap font");
                        CardRenderer::Bitmap
                    }
                }
            }
        }
    }

    pub fn is_scalable(&self) -> bool {
        matches!(self, CardRenderer::Scalable(_))
    }

    /// Draw `label` word-wrapped and centered on a fresh card.
    pub fn render(&self, label: &str) -> CardImage {
        let lines = wrap_label(label, WRAP_WIDTH);
        let mut card = ImageBuffer::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);
        match self {
            CardRenderer::Scalable(font) => draw_scalable(&mut card, font, &lines),
            CardRenderer::Bitmap => draw_bitmap(&mut card, &lines),
        }
        card
    }

    /// Render `label` and encode the card as PNG bytes.
    pub fn render_png(&self, label: &str) -> GenerateResult<Vec<u8>> {
        let card = self.render(label);
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(card).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn load_font(path: &Path) -> Result<FontArc, String> {
    let data = fs::read(path).map_err(|err| err.to_string())?;
    FontArc::try_from_vec(data).map_err(|err| err.to_string())
}

/// Offset that centers `inner` within `outer`, clamped at zero.
fn centered(outer: u32, inner: u32) -> i32 {
    (outer.saturating_sub(inner) / 2) as i32
}

/// Whole-pixel ink box of one laid-out line, relative to its draw origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InkBox {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl InkBox {
    fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    fn union(self, other: InkBox) -> InkBox {
        InkBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Outline bounds of `line` laid out the way `draw_text_mut` places glyphs:
/// pen starting at (0, ascent), advancing by h_advance plus kerning.
/// `None` when the line has no visible glyphs.
fn line_ink(font: &FontArc, scale: PxScale, line: &str) -> Option<InkBox> {
    let scaled = font.as_scaled(scale);
    let mut pen = 0.0f32;
    let mut last = None;
    let mut ink: Option<InkBox> = None;
    for ch in line.chars() {
        let id = scaled.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(pen, scaled.ascent()));
        pen += scaled.h_advance(id);
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        if let Some(prev) = last {
            pen += scaled.kern(id, prev);
        }
        last = Some(id);
        let bounds = outlined.px_bounds();
        let glyph_ink = InkBox {
            min_x: bounds.min.x.round() as i32,
            min_y: bounds.min.y.round() as i32,
            max_x: bounds.max.x.round() as i32,
            max_y: bounds.max.y.round() as i32,
        };
        ink = Some(ink.map_or(glyph_ink, |acc| acc.union(glyph_ink)));
    }
    ink
}

struct ScalableLayout {
    scale: PxScale,
    line_height: u32,
    inks: Vec<Option<InkBox>>,
}

impl ScalableLayout {
    fn measure(font: &FontArc, lines: &[String], px: f32) -> Self {
        let scale = PxScale::from(px);
        let scaled = font.as_scaled(scale);
        let line_height = (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32;
        let inks = lines.iter().map(|line| line_ink(font, scale, line)).collect();
        Self {
            scale,
            line_height,
            inks,
        }
    }

    fn block_width(&self) -> u32 {
        self.inks.iter().flatten().map(InkBox::width).max().unwrap_or(0)
    }

    fn block_height(&self) -> u32 {
        self.line_height * self.inks.len() as u32
    }

    /// Vertical ink extent of the whole block, with line `i` drawn at `i * line_height`.
    fn block_rows(&self) -> Option<(i32, i32)> {
        self.inks
            .iter()
            .enumerate()
            .filter_map(|(idx, ink)| {
                let offset = (idx as u32 * self.line_height) as i32;
                ink.map(|ink| (offset + ink.min_y, offset + ink.max_y))
            })
            .reduce(|(top, bottom), (t, b)| (top.min(t), bottom.max(b)))
    }
}

fn draw_scalable(card: &mut CardImage, font: &FontArc, lines: &[String]) {
    let avail_w = (CARD_WIDTH - 2 * MARGIN) as f32;
    let avail_h = (CARD_HEIGHT - 2 * MARGIN) as f32;

    let mut layout = ScalableLayout::measure(font, lines, PREFERRED_FONT_PX);
    let fit = (avail_w / layout.block_width().max(1) as f32)
        .min(avail_h / layout.block_height().max(1) as f32);
    if fit < 1.0 {
        let px = (PREFERRED_FONT_PX * fit).floor().max(MIN_FONT_PX);
        layout = ScalableLayout::measure(font, lines, px);
    }

    let Some((ink_top, ink_bottom)) = layout.block_rows() else {
        return;
    };
    let top = centered(CARD_HEIGHT, (ink_bottom - ink_top) as u32) - ink_top;
    for (idx, (line, ink)) in lines.iter().zip(&layout.inks).enumerate() {
        let Some(ink) = ink else {
            continue;
        };
        let x = centered(CARD_WIDTH, ink.width()) - ink.min_x;
        let y = top + (idx as u32 * layout.line_height) as i32;
        draw_text_mut(card, INK, x, y, layout.scale, font, line);
    }
}

fn draw_bitmap(card: &mut CardImage, lines: &[String]) {
    let widths: Vec<u32> = lines
        .iter()
        .map(|line| (line.chars().count() as u32 * GLYPH_ADVANCE).saturating_sub(1))
        .collect();
    let block_units_w = widths.iter().copied().max().unwrap_or(0).max(1);
    let block_units_h = (lines.len() as u32 * LINE_ADVANCE).saturating_sub(LINE_ADVANCE - GLYPH_HEIGHT);

    let scale = ((CARD_WIDTH - 2 * MARGIN) / block_units_w)
        .min((CARD_HEIGHT - 2 * MARGIN) / block_units_h.max(1))
        .clamp(1, MAX_BITMAP_SCALE);

    let block_w = block_units_w * scale;
    let left = centered(CARD_WIDTH, block_w);
    let top = centered(CARD_HEIGHT, block_units_h * scale);
    for (row, (line, width)) in lines.iter().zip(&widths).enumerate() {
        let mut x = left + centered(block_w, width * scale);
        let y = top + (row as u32 * LINE_ADVANCE * scale) as i32;
        for ch in line.chars() {
            draw_glyph(card, x, y, ch, scale);
            x += (GLYPH_ADVANCE * scale) as i32;
        }
    }
}

fn draw_glyph(card: &mut CardImage, x: i32, y: i32, ch: char, scale: u32) {
    for (row, bits) in glyph_rows(ch).iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                draw_filled_rect_mut(card, Rect::at(px, py).of_size(scale, scale), INK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bounding box (min_x, min_y, max_x, max_y) of all non-background pixels.
    fn ink_bounds(card: &CardImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, px) in card.enumerate_pixels() {
            if *px != BACKGROUND {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    #[test]
    fn card_has_fixed_size_and_background() {
        let card = CardRenderer::Bitmap.render("hond");
        assert_eq!(card.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
        assert_eq!(*card.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*card.get_pixel(CARD_WIDTH - 1, CARD_HEIGHT - 1), BACKGROUND);
    }

    #[test]
    fn bitmap_text_is_centered() {
        let card = CardRenderer::Bitmap.render("kat");
        let (x0, y0, x1, y1) = ink_bounds(&card).expect("label drew nothing");
        let left = x0 as i32;
        let right = (CARD_WIDTH - 1 - x1) as i32;
        let above = y0 as i32;
        let below = (CARD_HEIGHT - 1 - y1) as i32;
        assert!((left - right).abs() <= 1, "left {left} right {right}");
        assert!((above - below).abs() <= 1, "above {above} below {below}");
    }

    #[test]
    fn long_labels_stay_inside_the_margin() {
        let card = CardRenderer::Bitmap.render("een heel lange omschrijving van een woord");
        let (x0, y0, x1, y1) = ink_bounds(&card).expect("label drew nothing");
        assert!(x0 >= MARGIN && y0 >= MARGIN);
        assert!(x1 < CARD_WIDTH - MARGIN && y1 < CARD_HEIGHT - MARGIN);
    }

    #[test]
    fn empty_label_renders_blank_card() {
        let card = CardRenderer::Bitmap.render("");
        assert!(ink_bounds(&card).is_none());
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = CardRenderer::Bitmap;
        assert_eq!(renderer.render("huis"), renderer.render("huis"));
    }

    #[test]
    fn png_bytes_decode_back_to_card_size() {
        let bytes = CardRenderer::Bitmap.render_png("dog").unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (CARD_WIDTH, CARD_HEIGHT));
    }

    #[test]
    fn unusable_font_path_falls_back_to_bitmap() {
        let renderer = CardRenderer::select(&FontChoice::Path("/nonexistent/font.ttf".into()));
        assert!(!renderer.is_scalable());
        assert!(!CardRenderer::select(&FontChoice::Bitmap).is_scalable());
    }

    fn system_renderer() -> Option<CardRenderer> {
        let renderer = CardRenderer::select(&FontChoice::Auto);
        renderer.is_scalable().then_some(renderer)
    }

    fn assert_centered(card: &CardImage, label: &str) {
        let (x0, y0, x1, y1) = ink_bounds(card).expect("label drew nothing");
        let (left, right) = (x0 as i32, (CARD_WIDTH - 1 - x1) as i32);
        let (above, below) = (y0 as i32, (CARD_HEIGHT - 1 - y1) as i32);
        assert!((left - right).abs() <= 2, "{label}: left {left} right {right}");
        assert!((above - below).abs() <= 2, "{label}: above {above} below {below}");
    }

    #[test]
    fn scalable_text_is_centered_on_glyph_extents() {
        let Some(renderer) = system_renderer() else {
            return;
        };
        for label in ["Wg", "a", "ÉÉN", "hond", "onderwijsinstelling"] {
            let card = renderer.render(label);
            assert_eq!(card.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
            assert_centered(&card, label);
        }
    }

    #[test]
    fn scalable_long_labels_shrink_inside_the_margin() {
        let Some(renderer) = system_renderer() else {
            return;
        };
        let card = renderer.render("een heel lange omschrijving van een woord");
        let (x0, y0, x1, y1) = ink_bounds(&card).expect("label drew nothing");
        assert!(x0 >= MARGIN && y0 >= MARGIN, "ink starts at ({x0}, {y0})");
        assert!(
            x1 < CARD_WIDTH - MARGIN && y1 < CARD_HEIGHT - MARGIN,
            "ink ends at ({x1}, {y1})"
        );
    }

    #[test]
    fn scalable_whitespace_label_renders_blank_card() {
        let Some(renderer) = system_renderer() else {
            return;
        };
        assert!(ink_bounds(&renderer.render("   ")).is_none());
    }
}
