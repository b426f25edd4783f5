//! A loaded page: document tree, styles, interaction state, and the
//! machinery to render it to a canvas.
//!
//! The page owns the cascade output and rebuilds it whenever the
//! interaction state changes (hover, activation, visited links). Each
//! restyle supersedes any in-flight layout by tripping the current cancel
//! token and minting a fresh one.

use std::collections::HashMap;

use anyhow::{Context, Result};
use wombat_common::image::ImageDecoder;
use wombat_common::net::ResourceLoader;
use wombat_common::raster::Raster;
use wombat_css::cascade::{DeclaredStyles, InteractionState, ResolvedStyle, resolve_styles};
use wombat_css::layout::{
    CancelToken, FontMetrics, HitTestIndex, LayoutEngine, LayoutOutcome, LayoutParams, Viewport,
};
use wombat_css::style::StyleResolver;
use wombat_css::values::Rgba;
use wombat_dom::{DomTree, NodeId};

/// A document with resolved styles, ready to lay out and render.
pub struct Page {
    tree: DomTree,
    declared: DeclaredStyles,
    state: InteractionState,
    styles: HashMap<NodeId, ResolvedStyle>,
    base_url: Option<String>,
    cancel: CancelToken,
    hits: HitTestIndex,
}

impl Page {
    /// Build a page from a parsed tree and its matched declarations.
    ///
    /// `base_url` is the page location, used to resolve relative resource
    /// URLs during layout.
    #[must_use]
    pub fn new(tree: DomTree, declared: DeclaredStyles, base_url: Option<String>) -> Self {
        // A fresh page gets a fresh warning slate.
        wombat_common::warning::clear_warnings();
        let state = InteractionState::default();
        let styles = resolve_styles(&tree, &declared, &state);
        Self {
            tree,
            declared,
            state,
            styles,
            base_url,
            cancel: CancelToken::new(),
            hits: HitTestIndex::new(),
        }
    }

    /// The document tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The token guarding the next render; cancelling it makes an
    /// in-flight [`Self::render`] return `None`.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Move pointer hover to `node` (or clear it) and restyle.
    pub fn set_hover(&mut self, node: Option<NodeId>) {
        if self.state.hover != node {
            self.state.hover = node;
            self.reapply_styles();
        }
    }

    /// Mark `node` as the element being activated (or clear) and restyle.
    pub fn set_active(&mut self, node: Option<NodeId>) {
        if self.state.active != node {
            self.state.active = node;
            self.reapply_styles();
        }
    }

    /// Record that the link at `node` has been visited and restyle.
    pub fn mark_visited(&mut self, node: NodeId) {
        if self.state.visited.insert(node) {
            self.reapply_styles();
        }
    }

    /// Re-run the cascade under the current interaction state and
    /// supersede any layout still running against the old styles.
    fn reapply_styles(&mut self) {
        self.cancel.cancel();
        self.cancel = CancelToken::new();
        self.styles = resolve_styles(&self.tree, &self.declared, &self.state);
    }

    /// Lay the document out and composite it onto a canvas.
    ///
    /// The canvas is at least the viewport size, white, then filled with
    /// the root element's background color, with the laid-out content
    /// composited on top. When `first_page_only` is set, content below
    /// the viewport is omitted and the canvas stays viewport-sized.
    ///
    /// Returns `None` when the layout was cancelled mid-run.
    ///
    /// # Errors
    ///
    /// Fails when the document has no root element.
    pub fn render(
        &mut self,
        viewport: Viewport,
        first_page_only: bool,
        metrics: &dyn FontMetrics,
        loader: &dyn ResourceLoader,
        decoder: &dyn ImageDecoder,
    ) -> Result<Option<Raster>> {
        let root = self
            .tree
            .document_element()
            .context("document has no root element")?;

        let (result, background) = {
            let resolver = StyleResolver::new(&self.tree, &self.styles);
            let background = resolver.background_color(root);
            let params = LayoutParams {
                viewport,
                first_page_only,
                base_url: self.base_url.clone(),
            };
            let mut engine = LayoutEngine::new(
                resolver,
                metrics,
                loader,
                decoder,
                params,
                self.cancel.clone(),
            );
            match engine.layout(root) {
                LayoutOutcome::Complete(result) => (result, background),
                LayoutOutcome::Cancelled => return Ok(None),
            }
        };

        let viewport_w = u32::try_from(viewport.width.max(0)).unwrap_or(0);
        let viewport_h = u32::try_from(viewport.height.max(0)).unwrap_or(0);
        let width = viewport_w.max(result.raster.width());
        let height = if first_page_only {
            viewport_h
        } else {
            viewport_h.max(result.raster.height())
        };

        let mut canvas = Raster::new(width, height);
        let (w, h) = (
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        canvas.fill_rect(0, 0, w, h, Rgba::WHITE.to_pixel());
        if background.a != 0 {
            canvas.fill_rect(0, 0, w, h, background.to_pixel());
        }
        canvas.composite_over(&result.raster, 0, 0);

        self.hits = result.hit_test;
        Ok(Some(canvas))
    }

    /// The innermost node under `(x, y)` in the last rendered canvas.
    #[must_use]
    pub fn hit_test(&self, x: i32, y: i32) -> Option<NodeId> {
        self.hits.at(x, y)
    }
}
