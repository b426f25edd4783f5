//! Font metrics and glyph rasterization backed by fontdue.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! When no system font can be found, the metrics fall back to fixed
//! ratios so layout still produces sensible geometry; only glyph drawing
//! is skipped.

use std::cell::RefCell;
use std::collections::HashMap;

use fontdue::{Font, FontSettings};
use wombat_common::raster::Raster;
use wombat_common::warning::{Component, warn_once};
use wombat_css::layout::FontMetrics;
use wombat_css::values::Rgba;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Fallback advance width ratio when no font is available.
const FALLBACK_CHAR_WIDTH_RATIO: f32 = 0.6;

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "The initial value of 'line-height' is 'normal'. We recommend a used
/// value for 'normal' between 1.0 and 1.2."
const FALLBACK_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Fallback baseline position as a fraction of the font size.
const FALLBACK_ASCENT_RATIO: f32 = 0.8;

/// Vertical metrics memoized per font size.
#[derive(Clone, Copy)]
struct VerticalMetrics {
    line_height: f32,
    ascent: f32,
}

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Measurement uses `Font::metrics()` (not `Font::rasterize()`) to avoid
/// the cost of bitmap generation when only advance widths are needed;
/// bitmaps are generated only in `draw_text`.
///
/// Vertical metrics are memoized per font size. Layout is single-threaded,
/// so a `RefCell` suffices. Call [`Self::invalidate`] when the
/// pixels-per-point scale changes, before the next layout.
pub struct FontdueMetrics {
    font: Option<Font>,
    vertical: RefCell<HashMap<u32, VerticalMetrics>>,
}

impl FontdueMetrics {
    /// Load the first usable font from the system search paths.
    ///
    /// A metrics instance is returned even when no font is found; it
    /// measures with fallback ratios and draws nothing.
    #[must_use]
    pub fn from_system_fonts() -> Self {
        let font = load_font_from_paths(FONT_SEARCH_PATHS);
        if font.is_none() {
            warn_once(
                Component::Fonts,
                &format!(
                    "no system font found, text will not be drawn (searched {} paths)",
                    FONT_SEARCH_PATHS.len()
                ),
            );
        }
        Self::from_optional_font(font)
    }

    /// Wrap an already loaded font.
    #[must_use]
    pub fn from_font(font: Font) -> Self {
        Self::from_optional_font(Some(font))
    }

    fn from_optional_font(font: Option<Font>) -> Self {
        Self {
            font,
            vertical: RefCell::new(HashMap::new()),
        }
    }

    /// Whether a font was loaded; without one, text is measured with
    /// fallback ratios and never drawn.
    #[must_use]
    pub const fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Drop memoized vertical metrics. Must be called when the
    /// pixels-per-point scale changes, before the next layout.
    pub fn invalidate(&self) {
        self.vertical.borrow_mut().clear();
    }

    /// Vertical metrics for a size, from the memo or the font.
    fn vertical_metrics(&self, font_size: f32) -> VerticalMetrics {
        let key = font_size.to_bits();
        if let Some(cached) = self.vertical.borrow().get(&key) {
            return *cached;
        }
        let computed = self
            .font
            .as_ref()
            .and_then(|font| font.horizontal_line_metrics(font_size))
            .map_or(
                VerticalMetrics {
                    line_height: font_size * FALLBACK_LINE_HEIGHT_RATIO,
                    ascent: font_size * FALLBACK_ASCENT_RATIO,
                },
                |m| VerticalMetrics {
                    line_height: m.new_line_size,
                    ascent: m.ascent,
                },
            );
        let _ = self.vertical.borrow_mut().insert(key, computed);
        computed
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            return Some(font);
        }
    }
    None
}

impl FontMetrics for FontdueMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.font.as_ref().map_or_else(
            || text.chars().count() as f32 * font_size * FALLBACK_CHAR_WIDTH_RATIO,
            |font| {
                text.chars()
                    .filter(|ch| !ch.is_control())
                    .map(|ch| font.metrics(ch, font_size).advance_width)
                    .sum()
            },
        )
    }

    fn line_height(&self, font_size: f32) -> f32 {
        self.vertical_metrics(font_size).line_height
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.vertical_metrics(font_size).ascent
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_text(
        &self,
        target: &mut Raster,
        text: &str,
        x: i32,
        baseline: i32,
        font_size: f32,
        color: Rgba,
    ) {
        let Some(font) = self.font.as_ref() else {
            return;
        };

        let px = color.to_pixel();
        let mut cursor_x = x as f32;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }

            let (metrics, bitmap) = font.rasterize(ch, font_size);

            // fontdue's ymin is the bitmap bottom relative to the baseline.
            let glyph_x = cursor_x.round() as i32 + metrics.xmin;
            let glyph_y = baseline - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = bitmap[gy * metrics.width + gx];
                    target.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, px, alpha);
                }
            }

            cursor_x += metrics.advance_width;
        }
    }
}
