//! Style value resolution: from winning declarations to pixels and colors.
//!
//! The cascade leaves each element with at most one declared value per
//! property; [`StyleResolver`] turns those strings into usable values with
//! the CSS fallback rules applied: inherited properties walk the parent
//! chain, the literal `inherit` always walks it, and values the engine
//! cannot parse behave exactly as if nothing had been declared.

use std::collections::HashMap;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::cascade::ResolvedStyle;
use crate::layout::box_model::{BorderEdge, BorderEdges, BoxEdges, EdgeWidths};
use crate::values::length::DEFAULT_FONT_SIZE_PX;
use crate::values::{Rgba, ValueError, color::parse_color, convert_unit_to_px};
use wombat_dom::{DomTree, NodeId, NodeType};

/// CSS properties the engine understands.
///
/// The kebab-case property name maps to the variant via `strum`, so the
/// matcher can parse `"background-color"` straight into
/// [`Property::BackgroundColor`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Property {
    FontSize,
    LineHeight,
    Color,
    BackgroundColor,
    Display,
    TextDecoration,
    TextTransform,
    TextIndent,
    Width,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderTopWidth,
    BorderTopColor,
    BorderTopStyle,
    BorderRightWidth,
    BorderRightColor,
    BorderRightStyle,
    BorderBottomWidth,
    BorderBottomColor,
    BorderBottomStyle,
    BorderLeftWidth,
    BorderLeftColor,
    BorderLeftStyle,
}

/// One side of a box, for the per-side edge properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Side {
    const fn margin_property(self) -> Property {
        match self {
            Self::Top => Property::MarginTop,
            Self::Right => Property::MarginRight,
            Self::Bottom => Property::MarginBottom,
            Self::Left => Property::MarginLeft,
        }
    }

    const fn padding_property(self) -> Property {
        match self {
            Self::Top => Property::PaddingTop,
            Self::Right => Property::PaddingRight,
            Self::Bottom => Property::PaddingBottom,
            Self::Left => Property::PaddingLeft,
        }
    }

    const fn border_width_property(self) -> Property {
        match self {
            Self::Top => Property::BorderTopWidth,
            Self::Right => Property::BorderRightWidth,
            Self::Bottom => Property::BorderBottomWidth,
            Self::Left => Property::BorderLeftWidth,
        }
    }

    const fn border_color_property(self) -> Property {
        match self {
            Self::Top => Property::BorderTopColor,
            Self::Right => Property::BorderRightColor,
            Self::Bottom => Property::BorderBottomColor,
            Self::Left => Property::BorderLeftColor,
        }
    }

    const fn border_style_property(self) -> Property {
        match self {
            Self::Top => Property::BorderTopStyle,
            Self::Right => Property::BorderRightStyle,
            Self::Bottom => Property::BorderBottomStyle,
            Self::Left => Property::BorderLeftStyle,
        }
    }
}

/// How an element participates in flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayKind {
    /// The element and its subtree produce no boxes.
    None,
    /// The element flows at the dot cursor with no box of its own.
    Inline,
    /// The element gets its own box and closes the current line.
    #[default]
    Block,
}

/// Declared text transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransform {
    /// Leave the text as-is.
    #[default]
    None,
    /// Uppercase the first letter of every word.
    Capitalize,
    /// Uppercase everything.
    Uppercase,
    /// Lowercase everything.
    Lowercase,
}

/// Declared text decoration lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextDecoration {
    /// Rule at the baseline.
    pub underline: bool,
    /// Rule at the ascent top.
    pub overline: bool,
    /// Rule through the middle of the ascent.
    pub line_through: bool,
}

impl TextDecoration {
    /// No decoration lines.
    pub const NONE: Self = Self {
        underline: false,
        overline: false,
        line_through: false,
    };

    /// Parse a declared `text-decoration` value. Unknown components are
    /// ignored; `blink` is deliberately not honored.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self {
            underline: value.contains("underline"),
            overline: value.contains("overline"),
            line_through: value.contains("line-through"),
        }
    }

    /// Whether any decoration line is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.underline || self.overline || self.line_through
    }
}

/// Default border color when a border width is set without a color.
/// Alpha is zero, so an unstyled border paints nothing visible.
pub const DEFAULT_BORDER_COLOR: Rgba = Rgba {
    r: 255,
    g: 128,
    b: 128,
    a: 0,
};

/// Resolved box metrics of one element, for diagnostic dumps.
#[derive(Debug, Clone, Serialize)]
pub struct BoxMetrics {
    /// Margin widths in pixels.
    pub margin: EdgeWidths,
    /// Border widths in pixels.
    pub border: EdgeWidths,
    /// Padding widths in pixels.
    pub padding: EdgeWidths,
    /// Resolved content width in pixels.
    pub content_width: i32,
}

/// Per-property getters over a tree's resolved styles.
///
/// Getters never fail: every fallback rule (inherit, defaults, unsupported
/// values) ends in a concrete pixel count or color.
pub struct StyleResolver<'a> {
    tree: &'a DomTree,
    styles: &'a HashMap<NodeId, ResolvedStyle>,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver over a tree and its cascade output.
    #[must_use]
    pub const fn new(tree: &'a DomTree, styles: &'a HashMap<NodeId, ResolvedStyle>) -> Self {
        Self { tree, styles }
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The winning declared value for a property on a node.
    ///
    /// Text nodes have no declarations of their own; they read their
    /// parent element's resolved style.
    #[must_use]
    pub fn value(&self, id: NodeId, property: Property) -> Option<&str> {
        let styled = self.styled_node(id)?;
        self.styles.get(&styled)?.value(property)
    }

    /// The node whose resolved style governs `id`.
    fn styled_node(&self, id: NodeId) -> Option<NodeId> {
        match self.tree.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(_)) => Some(id),
            Some(NodeType::Text(_)) => self.tree.parent(id),
            _ => None,
        }
    }

    /// Parent node for inheritance walks.
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// Font size in pixels.
    ///
    /// Inherited; the root default is 16px. Values the engine cannot
    /// convert fall back to the inherited value.
    #[must_use]
    pub fn font_size(&self, id: NodeId) -> i32 {
        let inherited = |resolver: &Self| {
            resolver
                .parent(id)
                .map_or(DEFAULT_FONT_SIZE_PX, |p| resolver.font_size(p))
        };
        match self.value(id, Property::FontSize) {
            None | Some("inherit") => inherited(self),
            Some(v) => convert_unit_to_px(v).unwrap_or_else(|_| inherited(self)),
        }
    }

    /// The pixel size line height is derived from: the declared
    /// `line-height` if it converts, otherwise the font size. The actual
    /// line height comes from the font metrics for this size.
    #[must_use]
    pub fn line_height_basis(&self, id: NodeId) -> i32 {
        match self.value(id, Property::LineHeight) {
            Some(v) => convert_unit_to_px(v).unwrap_or_else(|_| self.font_size(id)),
            None => self.font_size(id),
        }
    }

    /// Text color.
    ///
    /// Inherited; when nothing up the chain declares a color, links
    /// default to blue and everything else to black.
    #[must_use]
    pub fn color(&self, id: NodeId) -> Rgba {
        let mut current = self.styled_node(id);
        while let Some(node) = current {
            if let Some(v) = self.value(node, Property::Color)
                && let Ok(color) = parse_color(v)
            {
                return color;
            }
            // inherit, no declaration, and parse failures all walk up
            current = self.parent(node);
        }
        if self.tree.in_element(id, "a") {
            Rgba::LINK_BLUE
        } else {
            Rgba::BLACK
        }
    }

    /// Background color. Not inherited; defaults to transparent, but the
    /// literal `inherit` walks to the parent.
    #[must_use]
    pub fn background_color(&self, id: NodeId) -> Rgba {
        match self.value(id, Property::BackgroundColor) {
            None => Rgba::TRANSPARENT,
            Some(v) => match parse_color(v) {
                Ok(color) => color,
                Err(ValueError::Inherit) => self
                    .parent(id)
                    .map_or(Rgba::TRANSPARENT, |p| self.background_color(p)),
                Err(_) => Rgba::TRANSPARENT,
            },
        }
    }

    /// How the node participates in flow. Text nodes are always inline;
    /// elements default to block.
    #[must_use]
    pub fn display(&self, id: NodeId) -> DisplayKind {
        if matches!(
            self.tree.get(id).map(|n| &n.node_type),
            Some(NodeType::Text(_))
        ) {
            return DisplayKind::Inline;
        }
        match self.value(id, Property::Display) {
            Some("none") => DisplayKind::None,
            Some("inline") => DisplayKind::Inline,
            _ => DisplayKind::Block,
        }
    }

    /// Declared decoration lines. `inherit` walks up; the default is none.
    #[must_use]
    pub fn text_decoration(&self, id: NodeId) -> TextDecoration {
        match self.value(id, Property::TextDecoration) {
            None => TextDecoration::NONE,
            Some("inherit") => self
                .parent(id)
                .map_or(TextDecoration::NONE, |p| self.text_decoration(p)),
            Some(v) => TextDecoration::parse(v),
        }
    }

    /// Declared text transform. Inherited; unknown values behave as
    /// undeclared.
    #[must_use]
    pub fn text_transform(&self, id: NodeId) -> TextTransform {
        let inherited = |resolver: &Self| {
            resolver
                .parent(id)
                .map_or(TextTransform::None, |p| resolver.text_transform(p))
        };
        match self.value(id, Property::TextTransform) {
            Some("none") => TextTransform::None,
            Some("capitalize") => TextTransform::Capitalize,
            Some("uppercase") => TextTransform::Uppercase,
            Some("lowercase") => TextTransform::Lowercase,
            _ => inherited(self),
        }
    }

    /// First-line indent in pixels. Inherited, initial value 0.
    #[must_use]
    pub fn text_indent(&self, id: NodeId) -> i32 {
        match self.value(id, Property::TextIndent) {
            None => self.parent(id).map_or(0, |p| self.text_indent(p)),
            Some(v) => convert_unit_to_px(v).unwrap_or(0),
        }
    }

    /// Content width inside a container of the given width.
    ///
    /// The default is the container width minus all horizontal edges; an
    /// explicit `width` that converts overrides it.
    #[must_use]
    pub fn content_width(&self, id: NodeId, container_width: i32) -> i32 {
        let flowed = container_width
            - self.margin(id, Side::Left, container_width)
            - self.margin(id, Side::Right, container_width)
            - self.border_width(id, Side::Left)
            - self.border_width(id, Side::Right)
            - self.padding(id, Side::Left)
            - self.padding(id, Side::Right);
        match self.value(id, Property::Width) {
            Some("inherit") => self
                .parent(id)
                .map_or(flowed, |p| self.content_width(p, container_width)),
            Some("auto") | None => flowed,
            Some(v) => convert_unit_to_px(v).unwrap_or(flowed),
        }
    }

    /// Margin width for one side.
    ///
    /// `auto` resolves to 0 except when both horizontal margins are auto,
    /// which centers the box in its container.
    #[must_use]
    pub fn margin(&self, id: NodeId, side: Side, container_width: i32) -> i32 {
        match self.value(id, side.margin_property()) {
            None => 0,
            Some("inherit") => self
                .parent(id)
                .map_or(0, |p| self.margin(p, side, container_width)),
            Some("auto") => self.auto_margin(id, side, container_width),
            Some(v) => convert_unit_to_px(v).unwrap_or(0),
        }
    }

    /// Centering width for an `auto` horizontal margin.
    fn auto_margin(&self, id: NodeId, side: Side, container_width: i32) -> i32 {
        let opposite = match side {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top | Side::Bottom => return 0,
        };
        if self.value(id, opposite.margin_property()) != Some("auto") {
            return 0;
        }
        let explicit = match self.value(id, Property::Width) {
            Some(v) => convert_unit_to_px(v).ok(),
            None => None,
        };
        let Some(content) = explicit else {
            // auto width fills the container, nothing to center
            return 0;
        };
        let free = container_width
            - content
            - self.border_width(id, Side::Left)
            - self.border_width(id, Side::Right)
            - self.padding(id, Side::Left)
            - self.padding(id, Side::Right);
        (free / 2).max(0)
    }

    /// Padding width for one side. Not inherited, default 0.
    #[must_use]
    pub fn padding(&self, id: NodeId, side: Side) -> i32 {
        match self.value(id, side.padding_property()) {
            None => 0,
            Some("inherit") => self.parent(id).map_or(0, |p| self.padding(p, side)),
            Some(v) => convert_unit_to_px(v).unwrap_or(0),
        }
    }

    /// Border width for one side. Not inherited, default 0.
    #[must_use]
    pub fn border_width(&self, id: NodeId, side: Side) -> i32 {
        match self.value(id, side.border_width_property()) {
            None => 0,
            Some("inherit") => self.parent(id).map_or(0, |p| self.border_width(p, side)),
            Some(v) => convert_unit_to_px(v).unwrap_or(0),
        }
    }

    /// Border color for one side.
    #[must_use]
    pub fn border_color(&self, id: NodeId, side: Side) -> Rgba {
        match self.value(id, side.border_color_property()) {
            None => DEFAULT_BORDER_COLOR,
            Some("inherit") => self
                .parent(id)
                .map_or(DEFAULT_BORDER_COLOR, |p| self.border_color(p, side)),
            Some(v) => parse_color(v).unwrap_or(DEFAULT_BORDER_COLOR),
        }
    }

    /// Border line style for one side, default `none`.
    #[must_use]
    pub fn border_style(&self, id: NodeId, side: Side) -> String {
        match self.value(id, side.border_style_property()) {
            None => "none".to_string(),
            Some("inherit") => self
                .parent(id)
                .map_or_else(|| "none".to_string(), |p| self.border_style(p, side)),
            Some(v) => v.to_string(),
        }
    }

    /// All resolved box edges of an element, for box compositing.
    #[must_use]
    pub fn box_edges(&self, id: NodeId, container_width: i32) -> BoxEdges {
        let border = |side| BorderEdge {
            width: self.border_width(id, side),
            color: self.border_color(id, side),
            style: self.border_style(id, side),
        };
        BoxEdges {
            margin: EdgeWidths {
                top: self.margin(id, Side::Top, container_width),
                right: self.margin(id, Side::Right, container_width),
                bottom: self.margin(id, Side::Bottom, container_width),
                left: self.margin(id, Side::Left, container_width),
            },
            border: BorderEdges {
                top: border(Side::Top),
                right: border(Side::Right),
                bottom: border(Side::Bottom),
                left: border(Side::Left),
            },
            padding: EdgeWidths {
                top: self.padding(id, Side::Top),
                right: self.padding(id, Side::Right),
                bottom: self.padding(id, Side::Bottom),
                left: self.padding(id, Side::Left),
            },
        }
    }

    /// Resolved box metrics for diagnostics.
    #[must_use]
    pub fn box_metrics(&self, id: NodeId, container_width: i32) -> BoxMetrics {
        let edges = self.box_edges(id, container_width);
        BoxMetrics {
            margin: edges.margin,
            border: EdgeWidths {
                top: edges.border.top.width,
                right: edges.border.right.width,
                bottom: edges.border.bottom.width,
                left: edges.border.left.width,
            },
            padding: edges.padding,
            content_width: self.content_width(id, container_width),
        }
    }
}
