//! Common utilities for the Wombat layout engine.
//!
//! This crate provides shared infrastructure used by the style, layout,
//! and rendering components:
//! - **Warning System** - deduplicated colored terminal output for unsupported features
//! - **Resource Loading** - blocking HTTP, `file:` and `data:` URL fetching
//! - **URL Resolution** - resolving relative references against a page location
//! - **Pixel Buffers** - the RGBA raster type layout composites into

pub mod image;
pub mod net;
pub mod raster;
pub mod url;
pub mod warning;
