//! Rendering backends for the Wombat layout engine.
//!
//! `wombat-css` does all measurement and compositing against traits; this
//! crate supplies the concrete backends: system fonts rasterized with
//! fontdue, image decoding through the `image` crate, and the [`Page`]
//! type that ties a parsed document, its styles, and the layout engine
//! together into a rendered canvas.

pub mod font_metrics;
pub mod image_loader;
pub mod output;
pub mod page;

pub use font_metrics::FontdueMetrics;
pub use image_loader::RasterDecoder;
pub use output::save_png;
pub use page::Page;
