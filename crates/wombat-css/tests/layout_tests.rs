//! End-to-end layout runs over small documents with fixed font metrics,
//! checking raster geometry, paint, and hit-test wiring.

use wombat_common::image::{DecodeError, DecodedImage, ImageDecoder};
use wombat_common::net::{FetchError, ResourceLoader};
use wombat_common::raster::Raster;
use wombat_css::cascade::{
    DeclaredStyles, InteractionState, Origin, Specificity, StyleDeclaration, resolve_styles,
};
use wombat_css::layout::{
    CancelToken, FontMetrics, HitTestIndex, LayoutEngine, LayoutOutcome, LayoutParams, Viewport,
};
use wombat_css::style::{Property, StyleResolver};
use wombat_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Deterministic metrics: 10px per character, line height 1.25em.
struct FixedMetrics;

impl FontMetrics for FixedMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * 1.25
    }

    fn ascent(&self, font_size: f32) -> f32 {
        font_size * 0.75
    }
}

/// Loader for documents that reference no resources.
struct NoResources;

impl ResourceLoader for NoResources {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::UnsupportedScheme(url.to_string()))
    }
}

impl ImageDecoder for NoResources {
    fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        Err(DecodeError::UnknownFormat)
    }
}

fn element(tag: &str) -> NodeType {
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: AttributesMap::new(),
    })
}

fn text(content: &str) -> NodeType {
    NodeType::Text(content.to_string())
}

fn decl(property: Property, value: &str, source_order: u32) -> StyleDeclaration {
    StyleDeclaration {
        property,
        value: value.to_string(),
        origin: Origin::Author,
        important: false,
        specificity: Specificity(0, 0, 1),
        source_order,
        condition: None,
    }
}

fn tree_with_body() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let body = tree.alloc(element("body"));
    tree.append_child(NodeId::ROOT, body);
    (tree, body)
}

fn run_layout_with(
    tree: &DomTree,
    declared: &DeclaredStyles,
    root: NodeId,
    viewport: Viewport,
    first_page_only: bool,
    loader: &dyn ResourceLoader,
    decoder: &dyn ImageDecoder,
) -> (Raster, HitTestIndex) {
    let styles = resolve_styles(tree, declared, &InteractionState::default());
    let resolver = StyleResolver::new(tree, &styles);
    let params = LayoutParams {
        viewport,
        first_page_only,
        base_url: None,
    };
    let mut engine = LayoutEngine::new(
        resolver,
        &FixedMetrics,
        loader,
        decoder,
        params,
        CancelToken::new(),
    );
    match engine.layout(root) {
        LayoutOutcome::Complete(result) => (result.raster, result.hit_test),
        LayoutOutcome::Cancelled => panic!("layout was not cancelled"),
    }
}

fn run_layout(
    tree: &DomTree,
    declared: &DeclaredStyles,
    root: NodeId,
    viewport: Viewport,
) -> (Raster, HitTestIndex) {
    run_layout_with(
        tree,
        declared,
        root,
        viewport,
        false,
        &NoResources,
        &NoResources,
    )
}

#[test]
fn test_blocks_stack_vertically() {
    let (mut tree, body) = tree_with_body();
    let div1 = tree.alloc(element("div"));
    let text1 = tree.alloc(text("a"));
    let div2 = tree.alloc(element("div"));
    let text2 = tree.alloc(text("a"));
    tree.append_child(body, div1);
    tree.append_child(div1, text1);
    tree.append_child(body, div2);
    tree.append_child(div2, text2);

    let mut declared = DeclaredStyles::new();
    declared.add(div1, decl(Property::BackgroundColor, "red", 0));
    declared.add(div1, decl(Property::PaddingBottom, "5px", 1));
    declared.add(div2, decl(Property::BackgroundColor, "blue", 2));

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &declared, body, viewport);

    // "a" is 10px wide plus a 5px word space; lines are 20px tall.
    // div1 adds 5px of bottom padding, so div2 starts at y=25.
    assert_eq!((raster.width(), raster.height()), (15, 45));
    assert_eq!(raster.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(raster.pixel(5, 22), [255, 0, 0, 255]);
    assert_eq!(raster.pixel(5, 30), [0, 0, 255, 255]);

    assert_eq!(hits.at(5, 5), Some(text1));
    // Inside div1's padding, below its line box
    assert_eq!(hits.at(5, 22), Some(div1));
    assert_eq!(hits.at(5, 30), Some(text2));
    assert_eq!(hits.at(100, 100), None);
}

#[test]
fn test_layout_is_idempotent() {
    let (mut tree, body) = tree_with_body();
    let div = tree.alloc(element("div"));
    let content = tree.alloc(text("hello"));
    tree.append_child(body, div);
    tree.append_child(div, content);

    let mut declared = DeclaredStyles::new();
    declared.add(div, decl(Property::BackgroundColor, "teal", 0));

    let viewport = Viewport { width: 200, height: 400 };
    let (first, _) = run_layout(&tree, &declared, body, viewport);
    let (second, _) = run_layout(&tree, &declared, body, viewport);

    assert_eq!(first.width(), second.width());
    assert_eq!(first.height(), second.height());
    assert_eq!(first.data(), second.data());
}

#[test]
fn test_inline_element_continues_the_line() {
    let (mut tree, body) = tree_with_body();
    let text1 = tree.alloc(text("aa"));
    let span = tree.alloc(element("span"));
    let text2 = tree.alloc(text("bb"));
    tree.append_child(body, text1);
    tree.append_child(body, span);
    tree.append_child(span, text2);

    let mut declared = DeclaredStyles::new();
    declared.add(span, decl(Property::Display, "inline", 0));

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &declared, body, viewport);

    // "aa" advances to x=25 (20px glyphs + 5px space); "bb" flows after
    // it on the same line instead of below.
    assert_eq!((raster.width(), raster.height()), (50, 20));
    assert_eq!(hits.at(5, 5), Some(text1));
    // Line boxes inside the span count as the span itself
    assert_eq!(hits.at(30, 5), Some(span));
}

#[test]
fn test_br_starts_a_new_line() {
    let (mut tree, body) = tree_with_body();
    let text1 = tree.alloc(text("a"));
    let br = tree.alloc(element("br"));
    let text2 = tree.alloc(text("b"));
    tree.append_child(body, text1);
    tree.append_child(body, br);
    tree.append_child(body, text2);

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &DeclaredStyles::new(), body, viewport);

    assert_eq!(raster.height(), 40);
    assert_eq!(hits.at(5, 5), Some(text1));
    assert_eq!(hits.at(5, 25), Some(text2));
}

#[test]
fn test_text_wraps_at_container_width() {
    let (mut tree, body) = tree_with_body();
    let content = tree.alloc(text("aa bb"));
    tree.append_child(body, content);

    // 28px fits "aa" (20px + 5px space) but not "bb" after it.
    let viewport = Viewport { width: 28, height: 400 };
    let (raster, hits) = run_layout(&tree, &DeclaredStyles::new(), body, viewport);

    assert_eq!(raster.height(), 40);
    assert_eq!(hits.at(5, 5), Some(content));
    assert_eq!(hits.at(5, 25), Some(content));
}

#[test]
fn test_display_none_subtree_is_skipped() {
    let (mut tree, body) = tree_with_body();
    let div1 = tree.alloc(element("div"));
    let t1 = tree.alloc(text("a"));
    let hidden = tree.alloc(element("div"));
    let hidden_text = tree.alloc(text("invisible"));
    let div2 = tree.alloc(element("div"));
    let t2 = tree.alloc(text("a"));
    tree.append_child(body, div1);
    tree.append_child(div1, t1);
    tree.append_child(body, hidden);
    tree.append_child(hidden, hidden_text);
    tree.append_child(body, div2);
    tree.append_child(div2, t2);

    let mut declared = DeclaredStyles::new();
    declared.add(hidden, decl(Property::Display, "none", 0));

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &declared, body, viewport);

    // Two visible 20px lines; the hidden subtree contributes nothing.
    assert_eq!(raster.height(), 40);
    assert_eq!(hits.at(5, 25), Some(t2));
}

#[test]
fn test_first_page_only_stops_below_viewport() {
    let (mut tree, body) = tree_with_body();
    for _ in 0..5 {
        let div = tree.alloc(element("div"));
        let t = tree.alloc(text("a"));
        tree.append_child(body, div);
        tree.append_child(div, t);
    }

    // Each block is 20px tall; the cursor passes 30px after the second.
    let viewport = Viewport { width: 200, height: 30 };
    let (raster, _) = run_layout_with(
        &tree,
        &DeclaredStyles::new(),
        body,
        viewport,
        true,
        &NoResources,
        &NoResources,
    );

    assert_eq!(raster.height(), 40);
}

#[test]
fn test_cancelled_layout_produces_no_output() {
    let (mut tree, body) = tree_with_body();
    let content = tree.alloc(text("hello"));
    tree.append_child(body, content);

    let declared = DeclaredStyles::new();
    let styles = resolve_styles(&tree, &declared, &InteractionState::default());
    let resolver = StyleResolver::new(&tree, &styles);
    let params = LayoutParams {
        viewport: Viewport { width: 200, height: 400 },
        first_page_only: false,
        base_url: None,
    };
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut engine = LayoutEngine::new(
        resolver,
        &FixedMetrics,
        &NoResources,
        &NoResources,
        params,
        cancel,
    );

    assert!(matches!(engine.layout(body), LayoutOutcome::Cancelled));
}

#[test]
fn test_text_indent_shifts_first_line() {
    let (mut tree, body) = tree_with_body();
    let content = tree.alloc(text("a"));
    tree.append_child(body, content);

    let mut declared = DeclaredStyles::new();
    declared.add(body, decl(Property::TextIndent, "10px", 0));

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &declared, body, viewport);

    assert_eq!(raster.width(), 25);
    assert_eq!(hits.at(5, 5), None);
    assert_eq!(hits.at(12, 5), Some(content));
}

/// Loader and decoder pair serving one fixed 2x2 magenta image.
struct OneImage;

impl ResourceLoader for OneImage {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(vec![0xCA, 0xFE])
    }
}

impl ImageDecoder for OneImage {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        assert_eq!(bytes, [0xCA, 0xFE]);
        Ok(DecodedImage::new(2, 2, [255, 0, 255, 255].repeat(4)))
    }
}

#[test]
fn test_image_sized_and_painted_from_decoded_pixels() {
    let (mut tree, body) = tree_with_body();
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("src".to_string(), "http://example.com/i.png".to_string());
    let img = tree.alloc(NodeType::Element(ElementData {
        tag_name: "img".to_string(),
        attrs,
    }));
    tree.append_child(body, img);

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout_with(
        &tree,
        &DeclaredStyles::new(),
        body,
        viewport,
        false,
        &OneImage,
        &OneImage,
    );

    assert_eq!((raster.width(), raster.height()), (2, 2));
    assert_eq!(raster.pixel(0, 0), [255, 0, 255, 255]);
    assert_eq!(raster.pixel(1, 1), [255, 0, 255, 255]);
    assert_eq!(hits.at(1, 1), Some(img));
}

#[test]
fn test_failed_image_load_renders_nothing() {
    let (mut tree, body) = tree_with_body();
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("src".to_string(), "gopher://nope".to_string());
    let img = tree.alloc(NodeType::Element(ElementData {
        tag_name: "img".to_string(),
        attrs,
    }));
    tree.append_child(body, img);

    let viewport = Viewport { width: 200, height: 400 };
    let (raster, hits) = run_layout(&tree, &DeclaredStyles::new(), body, viewport);

    assert_eq!((raster.width(), raster.height()), (0, 0));
    assert_eq!(hits.at(0, 0), None);
}

#[test]
fn test_block_inside_inline_hits_innermost() {
    let (mut tree, body) = tree_with_body();
    let outer = tree.alloc(element("div"));
    let span = tree.alloc(element("span"));
    let inner = tree.alloc(element("div"));
    let content = tree.alloc(text("a"));
    tree.append_child(body, outer);
    tree.append_child(outer, span);
    tree.append_child(span, inner);
    tree.append_child(inner, content);

    let mut declared = DeclaredStyles::new();
    declared.add(span, decl(Property::Display, "inline", 0));
    declared.add(inner, decl(Property::PaddingLeft, "4px", 1));

    let viewport = Viewport { width: 200, height: 400 };
    let (_, hits) = run_layout(&tree, &declared, body, viewport);

    // The text line is shifted right by inner's left padding.
    assert_eq!(hits.at(7, 5), Some(content));
    // The padding strip resolves to the block nested through the span,
    // not the span or the outer block wrapping it.
    assert_eq!(hits.at(1, 5), Some(inner));
    // Past the 19px box there is nothing.
    assert_eq!(hits.at(30, 5), None);
}

#[test]
fn test_nested_blocks_hit_innermost() {
    let (mut tree, body) = tree_with_body();
    let outer = tree.alloc(element("div"));
    let inner = tree.alloc(element("div"));
    let content = tree.alloc(text("a"));
    tree.append_child(body, outer);
    tree.append_child(outer, inner);
    tree.append_child(inner, content);

    let mut declared = DeclaredStyles::new();
    declared.add(outer, decl(Property::PaddingLeft, "10px", 0));
    declared.add(outer, decl(Property::PaddingBottom, "10px", 1));

    let viewport = Viewport { width: 200, height: 400 };
    let (_, hits) = run_layout(&tree, &declared, body, viewport);

    // The text line sits inside inner, shifted by outer's left padding.
    assert_eq!(hits.at(12, 5), Some(content));
    // Below the line but still inside outer's padding box
    assert_eq!(hits.at(12, 25), Some(outer));
    // Left padding strip belongs to outer only
    assert_eq!(hits.at(5, 5), Some(outer));
}
