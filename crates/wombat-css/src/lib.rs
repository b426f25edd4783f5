//! CSS cascade, style resolution, and flow layout over a document tree.
//!
//! The pipeline runs in three stages:
//!
//! 1. [`cascade`] picks the winning declaration per property and element
//!    from origin precedence, specificity, and source order.
//! 2. [`style`] turns winning declarations into concrete pixel counts and
//!    colors, applying inheritance and fallback rules.
//! 3. [`layout`] flows the styled tree into an RGBA raster in two passes
//!    and records a hit-test index alongside it.
//!
//! Font rasterization, image codecs, and networking live behind traits
//! ([`layout::FontMetrics`], and the loader and decoder seams in
//! `wombat-common`), so this crate stays free of heavyweight backends.

pub mod cascade;
pub mod layout;
pub mod style;
pub mod values;

pub use cascade::{
    Condition, DeclaredStyles, InteractionState, Origin, ResolvedStyle, SelectorCounts,
    Specificity, StyleDeclaration, resolve_styles,
};
pub use layout::{
    CancelToken, FontMetrics, HitTestIndex, LayoutEngine, LayoutOutcome, LayoutParams,
    LayoutResult, Viewport,
};
pub use style::{DisplayKind, Property, Side, StyleResolver, TextDecoration, TextTransform};
pub use values::{Rgba, ValueError, convert_unit_to_px};
