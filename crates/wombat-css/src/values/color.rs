//! Color values and parsing.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

use super::ValueError;

/// sRGB color represented as RGBA components.
///
/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Rgba {
    /// Black (#000000)
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Fully transparent. The non-zero red channel distinguishes it from
    /// zero-initialized pixel memory when debugging buffers.
    pub const TRANSPARENT: Self = Self {
        r: 0x80,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Default color for unstyled links.
    pub const LINK_BLUE: Self = Self::opaque(0, 0, 0xFF);

    /// Construct a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// The color as raw RGBA bytes for compositing.
    #[must_use]
    pub const fn to_pixel(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Parse a declared color value.
///
/// Supported forms: `#rgb` and `#rrggbb` hex notation, `rgb(r, g, b)`
/// with decimal components, the keywords `transparent` and `inherit`,
/// and the basic named color table.
///
/// # Errors
///
/// - [`ValueError::Inherit`] for the literal `inherit` (the caller walks
///   to the parent).
/// - [`ValueError::Invalid`] for malformed hex or `rgb()` forms.
/// - [`ValueError::NoStyles`] for anything unrecognized; the caller uses
///   the element default.
pub fn parse_color(value: &str) -> Result<Rgba, ValueError> {
    let value = value.trim();

    if let Some(args) = value
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let pieces: Vec<&str> = args.split(',').collect();
        if pieces.len() != 3 {
            return Err(ValueError::Invalid);
        }
        let channel = |s: &str| s.trim().parse::<u8>().map_err(|_| ValueError::Invalid);
        return Ok(Rgba::opaque(
            channel(pieces[0])?,
            channel(pieces[1])?,
            channel(pieces[2])?,
        ));
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    match value {
        "inherit" => Err(ValueError::Inherit),
        "transparent" => Ok(Rgba::TRANSPARENT),
        "maroon" => Ok(Rgba::opaque(0x80, 0, 0)),
        "red" => Ok(Rgba::opaque(0xff, 0, 0)),
        "orange" => Ok(Rgba::opaque(0xff, 0xa5, 0)),
        "yellow" => Ok(Rgba::opaque(0xff, 0xff, 0)),
        "olive" => Ok(Rgba::opaque(0x80, 0x80, 0)),
        "purple" => Ok(Rgba::opaque(0x80, 0, 0x80)),
        "fuchsia" => Ok(Rgba::opaque(0xff, 0, 0xff)),
        "white" => Ok(Rgba::WHITE),
        "lime" => Ok(Rgba::opaque(0, 0xff, 0)),
        "green" => Ok(Rgba::opaque(0, 0x80, 0)),
        "navy" => Ok(Rgba::opaque(0, 0, 0x80)),
        "blue" => Ok(Rgba::opaque(0, 0, 0xff)),
        "aqua" => Ok(Rgba::opaque(0, 0xff, 0xff)),
        "teal" => Ok(Rgba::opaque(0, 0x80, 0x80)),
        "black" => Ok(Rgba::BLACK),
        "silver" => Ok(Rgba::opaque(0xc0, 0xc0, 0xc0)),
        "gray" | "grey" => Ok(Rgba::opaque(0x80, 0x80, 0x80)),
        _ => Err(ValueError::NoStyles),
    }
}

/// Parse a hex color body (without the leading `#`).
///
/// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
/// "The three-digit RGB notation (#RGB) is converted into six-digit form
/// (#RRGGBB) by replicating digits, not by adding zeros."
fn parse_hex(hex: &str) -> Result<Rgba, ValueError> {
    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ValueError::Invalid);
    match hex.len() {
        3 => Ok(Rgba::opaque(
            byte(&hex[0..1].repeat(2))?,
            byte(&hex[1..2].repeat(2))?,
            byte(&hex[2..3].repeat(2))?,
        )),
        6 => Ok(Rgba::opaque(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        _ => Err(ValueError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_hex() {
        assert_eq!(parse_color("#2563eb"), Ok(Rgba::opaque(0x25, 0x63, 0xeb)));
    }

    #[test]
    fn test_three_digit_hex_replicates() {
        assert_eq!(parse_color("#f0a"), Ok(Rgba::opaque(0xff, 0x00, 0xaa)));
    }

    #[test]
    fn test_bad_hex_length_is_invalid() {
        assert_eq!(parse_color("#ffff"), Err(ValueError::Invalid));
        assert_eq!(parse_color("#fffffff"), Err(ValueError::Invalid));
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Ok(Rgba::opaque(1, 2, 3)));
        assert_eq!(parse_color("rgb(1,2)"), Err(ValueError::Invalid));
        assert_eq!(parse_color("rgb(1,2,300)"), Err(ValueError::Invalid));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_color("inherit"), Err(ValueError::Inherit));
        assert_eq!(parse_color("transparent").unwrap().a, 0);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("teal"), Ok(Rgba::opaque(0, 0x80, 0x80)));
        assert_eq!(parse_color("grey"), parse_color("gray"));
    }

    #[test]
    fn test_unknown_name_has_no_styles() {
        assert_eq!(parse_color("rebeccapurple"), Err(ValueError::NoStyles));
    }
}
