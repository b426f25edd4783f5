//! Greedy text line breaking and line raster generation.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! Text is consumed word by word into line rasters. The advance after each
//! word depends on its trailing punctuation: an em-quad after a period,
//! half an em after other punctuation, and a third of an em between plain
//! words.

use crate::style::{TextDecoration, TextTransform};
use crate::values::Rgba;
use wombat_common::raster::Raster;

/// Font metrics interface for text measurement and glyph drawing.
///
/// Implementors provide per-glyph advance widths and vertical metrics for
/// line breaking, and optionally draw glyphs into line rasters. The
/// default `draw_text` draws nothing, which is what the measuring
/// implementations used in tests want.
pub trait FontMetrics {
    /// Total advance width of `text` at the given font size.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Line height for the given font size.
    fn line_height(&self, font_size: f32) -> f32;

    /// Baseline distance from the top of a line for the given font size.
    fn ascent(&self, font_size: f32) -> f32;

    /// Draw `text` into `target` with its baseline at `(x, baseline)`.
    fn draw_text(
        &self,
        target: &mut Raster,
        text: &str,
        x: i32,
        baseline: i32,
        font_size: f32,
        color: Rgba,
    ) {
        let _ = (target, text, x, baseline, font_size, color);
    }
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance width of Latin glyphs in a proportional font is
/// roughly 0.6x the font size; line height uses 1.2x, the upper end of
/// the recommended range for `line-height: normal`. Used as a fallback
/// when no font is available, and in tests, where the fixed ratios make
/// layout deterministic.
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font_size: f32) -> f32 {
        const LINE_HEIGHT_RATIO: f32 = 1.2;
        font_size * LINE_HEIGHT_RATIO
    }

    fn ascent(&self, font_size: f32) -> f32 {
        const ASCENT_RATIO: f32 = 0.8;
        font_size * ASCENT_RATIO
    }
}

/// Text styling inputs for one line raster.
pub struct TextStyle {
    /// Font size in pixels; also the em width for word spacing.
    pub font_size: i32,
    /// Line height in pixels (the raster height).
    pub line_height: i32,
    /// Glyph and decoration color.
    pub color: Rgba,
    /// Decoration lines to draw across the line.
    pub decoration: TextDecoration,
    /// Transformation applied before measuring.
    pub transform: TextTransform,
}

/// Advance added after a word, from its trailing character.
///
/// "Add a three per em space between words, an em-quad after a period,
/// and an en-quad after other punctuation."
const fn word_spacing(word: &str, em: i32) -> i32 {
    match word.as_bytes().last() {
        Some(b',' | b';' | b':' | b'!' | b'?') => em / 2,
        Some(b'.') => em,
        _ => em / 3,
    }
}

/// Total advance of a whitespace-separated text run, spacing included.
#[allow(clippy::cast_possible_truncation)]
fn text_advance(metrics: &dyn FontMetrics, text: &str, style: &TextStyle) -> i32 {
    let mut advance = 0;
    for word in text.split_whitespace() {
        #[allow(clippy::cast_precision_loss)]
        let word_px = metrics.text_width(word, style.font_size as f32).ceil() as i32;
        advance += word_px + word_spacing(word, style.font_size);
    }
    advance
}

/// Apply a text transform before measuring and drawing.
fn apply_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        TextTransform::Capitalize => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for ch in text.chars() {
                if ch.is_whitespace() {
                    at_word_start = true;
                    out.push(ch);
                } else if at_word_start {
                    out.extend(ch.to_uppercase());
                    at_word_start = false;
                } else {
                    out.push(ch);
                }
            }
            out
        }
    }
}

/// Break as many words as fit into a line raster.
///
/// Returns the rendered line and the text that did not fit (`None` when
/// everything was consumed). The first word of a line is always consumed
/// even when it overflows, so every call makes progress.
///
/// The raster is as wide as the consumed text or `remaining_width`,
/// whichever is smaller, and as tall as the line height. Decoration
/// rules span the full raster width.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn break_line(
    metrics: &dyn FontMetrics,
    style: &TextStyle,
    remaining_width: i32,
    text: &str,
) -> (Raster, Option<String>) {
    let text = apply_transform(text, style.transform);
    let words: Vec<&str> = text.split_whitespace().collect();
    let font_size = style.font_size as f32;
    let em = style.font_size;

    let width = text_advance(metrics, &text, style)
        .min(remaining_width)
        .max(0);
    let height = style.line_height.max(0);
    let mut raster = Raster::new(
        u32::try_from(width).unwrap_or(0),
        u32::try_from(height).unwrap_or(0),
    );

    let baseline = metrics.ascent(font_size).floor() as i32;
    draw_decorations(&mut raster, style, width, baseline);

    let mut dot = 0;
    for (i, word) in words.iter().enumerate() {
        let word_px = metrics.text_width(word, font_size).ceil() as i32;
        if dot + word_px > remaining_width {
            // Always consume at least one word to guarantee progress;
            // an oversized first word is dropped rather than looped on.
            let rest = if i == 0 { &words[1..] } else { &words[i..] };
            let unconsumed = rest.join(" ");
            return (raster, (!unconsumed.is_empty()).then_some(unconsumed));
        }
        metrics.draw_text(&mut raster, word, dot, baseline, font_size, style.color);
        dot += word_px + word_spacing(word, em);
    }

    (raster, None)
}

/// Draw underline, overline, and line-through rules across a line.
fn draw_decorations(raster: &mut Raster, style: &TextStyle, width: i32, baseline: i32) {
    if !style.decoration.any() {
        return;
    }
    let px = style.color.to_pixel();
    if style.decoration.underline {
        raster.fill_rect(0, baseline, width, 1, px);
    }
    if style.decoration.overline {
        raster.fill_rect(0, 0, width, 1, px);
    }
    if style.decoration.line_through {
        raster.fill_rect(0, baseline - baseline / 2, width, 1, px);
    }
}
