//! CSS value parsing: lengths and colors.
//!
//! Declared values are kept as strings until a getter needs them; these
//! functions turn one string into a pixel count or a color, reporting
//! anything they cannot handle through [`ValueError`] so the caller can
//! fall back to an inherited or default value.

pub mod color;
pub mod length;

pub use color::Rgba;
pub use length::convert_unit_to_px;

/// Why a declared value could not be resolved.
///
/// `NoStyles` and `NotImplemented` both mean "behave as if nothing was
/// declared"; `Inherit` asks the caller to recurse to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// No declaration applies to this property.
    #[error("no styles to apply")]
    NoStyles,
    /// The value is malformed.
    #[error("invalid CSS unit or value")]
    Invalid,
    /// The value uses a feature this engine does not support yet.
    #[error("support not yet implemented")]
    NotImplemented,
    /// The value is the literal keyword `inherit`.
    #[error("value should be inherited")]
    Inherit,
}
