//! Flow layout: geometry, line breaking, and the two-pass engine.

pub mod box_model;
pub mod cancel;
pub mod engine;
pub mod line;

pub use box_model::{BorderEdge, BorderEdges, BoxEdges, EdgeWidths, Point, Rect, compose_box};
pub use cancel::CancelToken;
pub use engine::{LayoutEngine, LayoutOutcome, LayoutParams, LayoutResult, Viewport};
pub use hit_test::{HitTestEntry, HitTestIndex};
pub use line::{ApproximateFontMetrics, FontMetrics, TextStyle, break_line};
