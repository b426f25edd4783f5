//! Length values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use super::ValueError;
use wombat_common::warning::{Component, warn_once};

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: i32 = 16;

/// Convert a declared length to whole pixels.
///
/// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
/// "1px = 1/96th of 1in"
///
/// Only the `px` unit is supported. Other units report
/// [`ValueError::NotImplemented`] and callers fall back exactly as if no
/// value had been declared.
///
/// # Errors
///
/// - [`ValueError::Invalid`] if the string is too short to carry a unit or
///   the number before `px` does not parse.
/// - [`ValueError::NotImplemented`] for any unit other than `px`.
#[allow(clippy::cast_possible_truncation)]
pub fn convert_unit_to_px(value: &str) -> Result<i32, ValueError> {
    let value = value.trim();
    if value.len() < 2 {
        return Err(ValueError::Invalid);
    }
    if let Some(number) = value.strip_suffix("px") {
        return number
            .trim()
            .parse::<f32>()
            .map(|v| v.round() as i32)
            .map_err(|_| ValueError::Invalid);
    }
    warn_once(Component::Css, &format!("unsupported unit in '{value}'"));
    Err(ValueError::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_values_parse() {
        assert_eq!(convert_unit_to_px("12px"), Ok(12));
        assert_eq!(convert_unit_to_px(" 0px "), Ok(0));
        assert_eq!(convert_unit_to_px("12.6px"), Ok(13));
    }

    #[test]
    fn test_short_values_are_invalid() {
        assert_eq!(convert_unit_to_px(""), Err(ValueError::Invalid));
        assert_eq!(convert_unit_to_px("1"), Err(ValueError::Invalid));
    }

    #[test]
    fn test_garbage_number_is_invalid() {
        assert_eq!(convert_unit_to_px("abcpx"), Err(ValueError::Invalid));
    }

    #[test]
    fn test_other_units_not_implemented() {
        assert_eq!(convert_unit_to_px("1.5em"), Err(ValueError::NotImplemented));
        assert_eq!(convert_unit_to_px("50%"), Err(ValueError::NotImplemented));
        assert_eq!(convert_unit_to_px("10vh"), Err(ValueError::NotImplemented));
    }
}
