//! Box model geometry and box compositing.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//!
//! "Each box has a content area and optional surrounding padding, border,
//! and margin areas."
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │            margin               │
//! │   ┌─────────────────────────┐   │
//! │   │         border          │   │
//! │   │   ┌─────────────────┐   │   │
//! │   │   │     padding     │   │   │
//! │   │   │   ┌─────────┐   │   │   │
//! │   │   │   │ CONTENT │   │   │   │
//! │   │   │   └─────────┘   │   │   │
//! │   │   └─────────────────┘   │   │
//! │   └─────────────────────────┘   │
//! └─────────────────────────────────┘
//! ```
//!
//! [`compose_box`] renders the margin, border, and background areas around
//! an already-rendered content raster. The background fills the margin box
//! interior; each border edge is a solid rectangle derived from the four
//! edge widths, so opposing edges meet exactly at the corners.

use serde::Serialize;

use crate::values::Rgba;
use wombat_common::raster::Raster;

/// A point in the integer pixel grid, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Component-wise translation.
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// A rectangle in the integer pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: i32,
    /// Vertical position of the top-left corner.
    pub y: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

impl Rect {
    /// Rectangle at `origin` with the given size.
    #[must_use]
    pub const fn at(origin: Point, width: i32, height: i32) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    /// X coordinate one past the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The rectangle shifted by `delta`.
    #[must_use]
    pub const fn translated(&self, delta: Point) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Per-side widths for one box layer (margin or padding).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EdgeWidths {
    /// Top edge size.
    pub top: i32,
    /// Right edge size.
    pub right: i32,
    /// Bottom edge size.
    pub bottom: i32,
    /// Left edge size.
    pub left: i32,
}

impl EdgeWidths {
    /// Sum of the left and right edges.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// Width, color, and line style of one border edge.
#[derive(Debug, Clone, Serialize)]
pub struct BorderEdge {
    /// Border width in pixels.
    pub width: i32,
    /// Border color.
    pub color: Rgba,
    /// Declared line style (`none`, `solid`, ...). All non-`none` styles
    /// currently render as solid.
    pub style: String,
}

impl Default for BorderEdge {
    fn default() -> Self {
        Self {
            width: 0,
            color: Rgba::TRANSPARENT,
            style: "none".to_string(),
        }
    }
}

/// The four border edges of a box.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BorderEdges {
    /// Top border.
    pub top: BorderEdge,
    /// Right border.
    pub right: BorderEdge,
    /// Bottom border.
    pub bottom: BorderEdge,
    /// Left border.
    pub left: BorderEdge,
}

/// Resolved margin, border, and padding of one element, in pixels.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoxEdges {
    /// Margin widths.
    pub margin: EdgeWidths,
    /// Border edges.
    pub border: BorderEdges,
    /// Padding widths.
    pub padding: EdgeWidths,
}

impl BoxEdges {
    /// Sum of all left and right edge widths.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.margin.horizontal()
            + self.border.left.width
            + self.border.right.width
            + self.padding.horizontal()
    }

    /// Sum of all top and bottom edge widths.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.margin.vertical()
            + self.border.top.width
            + self.border.bottom.width
            + self.padding.vertical()
    }

    /// Outer box size for a content area of the given size.
    #[must_use]
    pub const fn outer_size(&self, content_width: i32, content_height: i32) -> (i32, i32) {
        (
            content_width + self.horizontal(),
            content_height + self.vertical(),
        )
    }

    /// Offset of the content area inside the outer box.
    #[must_use]
    pub const fn content_origin(&self) -> Point {
        Point {
            x: self.margin.left + self.border.left.width + self.padding.left,
            y: self.margin.top + self.border.top.width + self.padding.top,
        }
    }
}

/// Render the decorated box around a content area of the given size.
///
/// Returns the box raster and the content origin. The content itself is
/// NOT drawn; the caller composites it over the box at the returned
/// origin, which keeps measure and render passes on the same code path.
///
/// Painting order inside the raster:
/// 1. background, filling the area bounded by the margin box,
/// 2. the four border edges as solid rectangles.
///
/// Each border rectangle is derived from its own side's width, so
/// `right` uses `border.right.width` and the edges meet at the corners.
#[must_use]
pub fn compose_box(
    content_width: i32,
    content_height: i32,
    edges: &BoxEdges,
    background: Rgba,
) -> (Raster, Point) {
    let (outer_w, outer_h) = edges.outer_size(content_width, content_height);
    let mut raster = Raster::new(
        u32::try_from(outer_w.max(0)).unwrap_or(0),
        u32::try_from(outer_h.max(0)).unwrap_or(0),
    );

    let m = &edges.margin;
    let b = &edges.border;

    // Background, bounded by the margin box.
    if background.a != 0 {
        raster.fill_rect(
            m.left,
            m.top,
            outer_w - m.horizontal(),
            outer_h - m.vertical(),
            background.to_pixel(),
        );
    }

    // Top border: full width between the side margins.
    raster.fill_rect(
        m.left,
        m.top,
        outer_w - m.horizontal(),
        b.top.width,
        b.top.color.to_pixel(),
    );
    // Left border: full height between the vertical margins.
    raster.fill_rect(
        m.left,
        m.top,
        b.left.width,
        outer_h - m.vertical(),
        b.left.color.to_pixel(),
    );
    // Right border: mirror of the left.
    raster.fill_rect(
        outer_w - m.right - b.right.width,
        m.top,
        b.right.width,
        outer_h - m.vertical(),
        b.right.color.to_pixel(),
    );
    // Bottom border: mirror of the top.
    raster.fill_rect(
        m.left,
        outer_h - m.bottom - b.bottom.width,
        outer_w - m.horizontal(),
        b.bottom.width,
        b.bottom.color.to_pixel(),
    );

    (raster, edges.content_origin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(margin: i32, border: i32, padding: i32) -> BoxEdges {
        let side = |width| BorderEdge {
            width,
            color: Rgba::opaque(10, 20, 30),
            style: "solid".to_string(),
        };
        BoxEdges {
            margin: EdgeWidths {
                top: margin,
                right: margin,
                bottom: margin,
                left: margin,
            },
            border: BorderEdges {
                top: side(border),
                right: side(border),
                bottom: side(border),
                left: side(border),
            },
            padding: EdgeWidths {
                top: padding,
                right: padding,
                bottom: padding,
                left: padding,
            },
        }
    }

    #[test]
    fn test_outer_size_sums_all_edges() {
        let e = edges(1, 2, 3);
        assert_eq!(e.outer_size(10, 20), (10 + 2 * 6, 20 + 2 * 6));
    }

    #[test]
    fn test_content_origin() {
        let e = edges(1, 2, 3);
        assert_eq!(e.content_origin(), Point { x: 6, y: 6 });
    }

    #[test]
    fn test_background_bounded_by_margin() {
        let e = edges(2, 0, 0);
        let (raster, _) = compose_box(4, 4, &e, Rgba::opaque(0, 255, 0));
        // Margin area stays transparent
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(raster.pixel(1, 1), [0, 0, 0, 0]);
        // Interior is filled
        assert_eq!(raster.pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(5, 5), [0, 255, 0, 255]);
        // Far margin stays transparent
        assert_eq!(raster.pixel(7, 7), [0, 0, 0, 0]);
    }

    #[test]
    fn test_borders_meet_at_corners() {
        let mut e = edges(0, 2, 0);
        e.border.right.color = Rgba::opaque(200, 0, 0);
        e.border.bottom.color = Rgba::opaque(0, 0, 200);
        let (raster, _) = compose_box(6, 6, &e, Rgba::TRANSPARENT);
        let w = i32::try_from(raster.width()).unwrap();
        let h = i32::try_from(raster.height()).unwrap();
        assert_eq!((w, h), (10, 10));
        // Right border occupies its own width at the far edge
        assert_eq!(raster.pixel(w - 1, h / 2), [200, 0, 0, 255]);
        assert_eq!(raster.pixel(w - 2, h / 2), [200, 0, 0, 255]);
        // Bottom border likewise (painted last, wins the corner row)
        assert_eq!(raster.pixel(w / 2, h - 1), [0, 0, 200, 255]);
        // Content area stays untouched
        assert_eq!(raster.pixel(w / 2, h / 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_asymmetric_borders_stay_on_their_side() {
        // right border deliberately absent
        let e = BoxEdges {
            border: BorderEdges {
                left: BorderEdge {
                    width: 3,
                    color: Rgba::opaque(1, 1, 1),
                    style: "solid".to_string(),
                },
                ..BorderEdges::default()
            },
            ..BoxEdges::default()
        };
        let (raster, origin) = compose_box(5, 5, &e, Rgba::TRANSPARENT);
        assert_eq!(origin, Point { x: 3, y: 0 });
        assert_eq!(i32::try_from(raster.width()).unwrap(), 8);
        assert_eq!(raster.pixel(0, 2), [1, 1, 1, 255]);
        // No stray right border drawn with the left width
        assert_eq!(raster.pixel(7, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_rect_contains_and_translate() {
        let r = Rect {
            x: 2,
            y: 3,
            width: 4,
            height: 5,
        };
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        let t = r.translated(Point { x: 1, y: -1 });
        assert_eq!((t.x, t.y), (3, 2));
    }
}
