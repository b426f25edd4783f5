//! Two-pass flow layout.
//!
//! Every element is laid out twice with the same traversal: a measure pass
//! that grows a bounds tracker to find the content size, then a render
//! pass that composites into a fixed-size raster. Children flow at a dot
//! cursor: inline content advances it, block content closes the line,
//! receives its own composed box, and moves the cursor below it.
//!
//! The engine owns no policy about where the tree or styles come from; it
//! borrows the resolver and the font/resource collaborators and produces
//! a raster plus a hit-test index.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::box_model::{Point, Rect, compose_box};
use super::cancel::CancelToken;
use super::hit_test::HitTestIndex;
use super::line::{FontMetrics, TextStyle, break_line};
use crate::style::{DisplayKind, StyleResolver};
use wombat_common::image::{DecodedImage, ImageDecoder};
use wombat_common::net::ResourceLoader;
use wombat_common::raster::Raster;
use wombat_common::url::resolve_url;
use wombat_common::warning::{Component, warn_once};
use wombat_dom::{NodeId, NodeType};

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// Inputs that configure one layout run.
pub struct LayoutParams {
    /// The viewport the layout targets.
    pub viewport: Viewport,
    /// Stop flowing top-level content once the cursor passes the bottom
    /// of the viewport.
    pub first_page_only: bool,
    /// Page location image sources are resolved against.
    pub base_url: Option<String>,
}

/// The product of a completed layout.
pub struct LayoutResult {
    /// The rendered content.
    pub raster: Raster,
    /// Placed rectangles for pointer lookups, in raster coordinates.
    pub hit_test: HitTestIndex,
}

/// How a layout run ended.
pub enum LayoutOutcome {
    /// Both passes ran to completion.
    Complete(LayoutResult),
    /// The cancel token tripped; no output was produced.
    Cancelled,
}

/// Unwind marker for a tripped cancel token.
struct Cancelled;

/// Which pass is running and, for render, the surface size.
#[derive(Clone, Copy)]
enum Pass {
    Measure,
    Render { width: i32, height: i32 },
}

/// Grow-to-fit bounds for the measure pass.
#[derive(Default)]
struct BoundsTracker {
    max_x: i32,
    max_y: i32,
}

impl BoundsTracker {
    fn grow(&mut self, rect: Rect) {
        self.max_x = self.max_x.max(rect.right());
        self.max_y = self.max_y.max(rect.bottom());
    }
}

/// The surface one element draws into during one pass.
enum Surface {
    Measure(BoundsTracker),
    Render(Raster),
}

impl Surface {
    fn for_pass(pass: Pass) -> Self {
        match pass {
            Pass::Measure => Self::Measure(BoundsTracker::default()),
            Pass::Render { width, height } => Self::Render(Raster::new(
                u32::try_from(width.max(0)).unwrap_or(0),
                u32::try_from(height.max(0)).unwrap_or(0),
            )),
        }
    }

    /// Place a line raster (source semantics; lines own their area).
    fn place_line(&mut self, line: &Raster, rect: Rect) {
        match self {
            Self::Measure(bounds) => bounds.grow(rect),
            Self::Render(raster) => raster.copy_from(line, rect.x, rect.y),
        }
    }

    /// Place an element raster (over semantics).
    fn place_over(&mut self, content: Option<&Raster>, rect: Rect) {
        match self {
            Self::Measure(bounds) => bounds.grow(rect),
            Self::Render(raster) => {
                if let Some(content) = content {
                    raster.composite_over(content, rect.x, rect.y);
                }
            }
        }
    }
}

/// Output of flowing one element in one pass.
struct FlowOutput {
    /// Content size: measured bounds or the render surface size.
    width: i32,
    /// See `width`.
    height: i32,
    /// The rendered content (render pass only).
    raster: Option<Raster>,
    /// Cursor position after the element's children.
    dot: Point,
    /// Rectangles recorded by this element, in its own coordinates.
    hits: HitTestIndex,
}

impl FlowOutput {
    fn from_surface(surface: Surface, dot: Point, hits: HitTestIndex) -> Self {
        match surface {
            Surface::Measure(bounds) => Self {
                width: bounds.max_x,
                height: bounds.max_y,
                raster: None,
                dot,
                hits,
            },
            Surface::Render(raster) => Self {
                width: i32::try_from(raster.width()).unwrap_or(i32::MAX),
                height: i32::try_from(raster.height()).unwrap_or(i32::MAX),
                raster: Some(raster),
                dot,
                hits,
            },
        }
    }
}

/// The two-pass flow layout engine.
pub struct LayoutEngine<'a> {
    resolver: StyleResolver<'a>,
    metrics: &'a dyn FontMetrics,
    loader: &'a dyn ResourceLoader,
    decoder: &'a dyn ImageDecoder,
    params: LayoutParams,
    cancel: CancelToken,
    /// Fetched and decoded images, cached per node for the second pass.
    /// `None` records a failed load so it is not retried.
    images: HashMap<NodeId, Option<DecodedImage>>,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine over a resolved tree and its collaborators.
    #[must_use]
    pub fn new(
        resolver: StyleResolver<'a>,
        metrics: &'a dyn FontMetrics,
        loader: &'a dyn ResourceLoader,
        decoder: &'a dyn ImageDecoder,
        params: LayoutParams,
        cancel: CancelToken,
    ) -> Self {
        Self {
            resolver,
            metrics,
            loader,
            decoder,
            params,
            cancel,
            images: HashMap::new(),
        }
    }

    /// Lay out `root` into the viewport width: measure, then render.
    pub fn layout(&mut self, root: NodeId) -> LayoutOutcome {
        let container = self.params.viewport.width;
        let measured = match self.flow(root, container, Pass::Measure, Point::ZERO, true) {
            Ok(output) => output,
            Err(Cancelled) => return LayoutOutcome::Cancelled,
        };
        let pass = Pass::Render {
            width: measured.width,
            height: measured.height,
        };
        match self.flow(root, container, pass, Point::ZERO, true) {
            Ok(output) => LayoutOutcome::Complete(LayoutResult {
                raster: output.raster.unwrap_or_else(|| Raster::new(0, 0)),
                hit_test: output.hits,
            }),
            Err(Cancelled) => LayoutOutcome::Cancelled,
        }
    }

    /// Line height of a node in pixels, from the font metrics.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn line_height(&self, id: NodeId) -> i32 {
        let basis = self.resolver.line_height_basis(id);
        self.metrics.line_height(basis as f32).ceil() as i32
    }

    /// Flow one element's children in one pass.
    ///
    /// `dot` is the starting cursor, non-zero when the element is inline
    /// and continues its parent's line. `paginate` is set only for the
    /// layout root, where first-page clipping applies.
    fn flow(
        &mut self,
        id: NodeId,
        container_width: i32,
        pass: Pass,
        dot: Point,
        paginate: bool,
    ) -> Result<FlowOutput, Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }

        if self.resolver.tree().tag_name(id) == Some("img") {
            return Ok(self.flow_image(id, pass, dot));
        }

        let width = self.resolver.content_width(id, container_width);
        let mut surface = Surface::for_pass(pass);
        let mut hits = HitTestIndex::new();
        let mut dot = dot;
        let mut first_line = true;

        // The tree reference outlives the engine borrow, so children can be
        // walked while flowing mutates the image cache.
        let tree = self.resolver.tree();
        for &child in tree.children(id) {
            match tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => {
                    self.flow_text(
                        id,
                        child,
                        text,
                        width,
                        &mut surface,
                        &mut hits,
                        &mut dot,
                        &mut first_line,
                    );
                }
                Some(NodeType::Element(data)) => {
                    if data.tag_name == "br" {
                        dot.x = 0;
                        dot.y += self.line_height(child);
                        continue;
                    }
                    match self.resolver.display(child) {
                        DisplayKind::None => continue,
                        DisplayKind::Inline => {
                            self.flow_inline(
                                child,
                                width,
                                pass,
                                &mut surface,
                                &mut hits,
                                &mut dot,
                                &mut first_line,
                            )?;
                        }
                        DisplayKind::Block => {
                            self.flow_block(child, width, pass, &mut surface, &mut hits, &mut dot)?;
                        }
                    }
                }
                _ => {}
            }

            if paginate && self.params.first_page_only && dot.y > self.params.viewport.height {
                break;
            }
        }

        Ok(FlowOutput::from_surface(surface, dot, hits))
    }

    /// Flow a text child: indent the first line, then break words into
    /// line rasters advancing the dot.
    #[allow(clippy::too_many_arguments)]
    fn flow_text(
        &self,
        parent: NodeId,
        child: NodeId,
        text: &str,
        width: i32,
        surface: &mut Surface,
        hits: &mut HitTestIndex,
        dot: &mut Point,
        first_line: &mut bool,
    ) {
        if *first_line {
            dot.x += self.resolver.text_indent(child);
            *first_line = false;
        }

        let style = TextStyle {
            font_size: self.resolver.font_size(child),
            line_height: self.line_height(child),
            color: self.resolver.color(child),
            decoration: self.resolver.text_decoration(child),
            transform: self.resolver.text_transform(child),
        };

        let mut remaining = Some(text.trim().to_string());
        while let Some(text) = remaining.take() {
            if text.is_empty() {
                break;
            }
            let (line, rest) = break_line(self.metrics, &style, width - dot.x, &text);
            let rect = Rect::at(
                *dot,
                i32::try_from(line.width()).unwrap_or(0),
                i32::try_from(line.height()).unwrap_or(0),
            );
            surface.place_line(&line, rect);
            hits.add(child, rect);

            if rect.right() >= width {
                dot.x = 0;
                dot.y += self.line_height(parent);
            } else {
                dot.x = rect.right();
            }
            remaining = rest;
        }
    }

    /// Flow an inline element: it continues the current line in the
    /// parent's coordinate space and hands the cursor back.
    #[allow(clippy::too_many_arguments)]
    fn flow_inline(
        &mut self,
        child: NodeId,
        width: i32,
        pass: Pass,
        surface: &mut Surface,
        hits: &mut HitTestIndex,
        dot: &mut Point,
        first_line: &mut bool,
    ) -> Result<(), Cancelled> {
        if *first_line {
            dot.x += self.resolver.text_indent(child);
            *first_line = false;
        }

        let measured = self.flow(child, width, Pass::Measure, *dot, false)?;
        let output = match pass {
            Pass::Measure => measured,
            Pass::Render { .. } => {
                let size = Pass::Render {
                    width: measured.width,
                    height: measured.height,
                };
                self.flow(child, width, size, *dot, false)?
            }
        };

        let rect = Rect {
            x: 0,
            y: 0,
            width: output.width,
            height: output.height,
        };
        surface.place_over(output.raster.as_ref(), rect);

        // The child drew in this coordinate space, so its entries need no
        // translation. Line boxes from its direct text children count as
        // hovering the inline element itself; nested elements stay precise.
        for entry in output.hits.entries() {
            if self.resolver.tree().as_text(entry.node).is_some()
                && self.resolver.tree().parent(entry.node) == Some(child)
            {
                hits.add(child, entry.area);
            } else {
                hits.add(entry.node, entry.area);
            }
        }

        *dot = output.dot;
        Ok(())
    }

    /// Flow a block element: close the current line, lay the child out in
    /// its own coordinate space, wrap it in its composed box, and place
    /// the box at the cursor.
    fn flow_block(
        &mut self,
        child: NodeId,
        width: i32,
        pass: Pass,
        surface: &mut Surface,
        hits: &mut HitTestIndex,
        dot: &mut Point,
    ) -> Result<(), Cancelled> {
        if dot.x != 0 {
            // The previous child was inline; close its implicit line box.
            dot.x = 0;
            if let Some(prev) = self.resolver.tree().prev_sibling(child) {
                dot.y += self.line_height(prev);
            }
        }

        let measured = self.flow(child, width, Pass::Measure, Point::ZERO, false)?;
        let content = match pass {
            Pass::Measure => measured,
            Pass::Render { .. } => {
                let size = Pass::Render {
                    width: measured.width,
                    height: measured.height,
                };
                self.flow(child, width, size, Point::ZERO, false)?
            }
        };

        let edges = self.resolver.box_edges(child, width);
        let background = self.resolver.background_color(child);
        let (outer_w, outer_h) = edges.outer_size(content.width, content.height);
        let origin = edges.content_origin();
        let rect = Rect::at(*dot, outer_w, outer_h);

        match surface {
            Surface::Measure(bounds) => bounds.grow(rect),
            Surface::Render(raster) => {
                let (box_raster, _) =
                    compose_box(content.width, content.height, &edges, background);
                raster.composite_over(&box_raster, dot.x, dot.y);
                if let Some(content_raster) = content.raster.as_ref() {
                    raster.composite_over(content_raster, dot.x + origin.x, dot.y + origin.y);
                }
            }
        }

        // Container entry first, then descendants translated into this
        // coordinate space, so deeper nodes resolve as innermost.
        hits.add(child, rect);
        hits.merge_translated(&content.hits, dot.add(origin));

        dot.x = 0;
        dot.y = rect.bottom();
        Ok(())
    }

    /// An `img` element's content is its decoded image; the fetch and
    /// decode happen once and are reused by the render pass.
    fn flow_image(&mut self, id: NodeId, pass: Pass, dot: Point) -> FlowOutput {
        if let Entry::Vacant(entry) = self.images.entry(id) {
            let _ = entry.insert(load_image(
                self.resolver.tree().as_element(id).and_then(|e| e.attr("src")),
                self.params.base_url.as_deref(),
                self.loader,
                self.decoder,
            ));
        }

        let image = self.images.get(&id).and_then(Option::as_ref);
        let (width, height) = image.map_or((0, 0), |img| {
            (
                i32::try_from(img.width()).unwrap_or(0),
                i32::try_from(img.height()).unwrap_or(0),
            )
        });
        let raster = match pass {
            Pass::Measure => None,
            Pass::Render { .. } => {
                Some(image.map_or_else(|| Raster::new(0, 0), DecodedImage::to_raster))
            }
        };
        FlowOutput {
            width,
            height,
            raster,
            dot,
            hits: HitTestIndex::new(),
        }
    }
}

/// Fetch and decode an image source, logging failures.
fn load_image(
    src: Option<&str>,
    base_url: Option<&str>,
    loader: &dyn ResourceLoader,
    decoder: &dyn ImageDecoder,
) -> Option<DecodedImage> {
    let src = src?;
    let url = resolve_url(src, base_url);
    let bytes = match loader.fetch(&url) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn_once(Component::Layout, &format!("failed to fetch image '{url}': {e}"));
            return None;
        }
    };
    match decoder.decode(&bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            warn_once(Component::Layout, &format!("failed to decode image '{url}': {e}"));
            None
        }
    }
}
