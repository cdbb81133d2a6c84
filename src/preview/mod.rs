/// Schematic preview images
///
/// This module handles:
/// - Rendering a schematic into a bitmap in two passes (draw.rs)
/// - Caching previews per schematic with oldest-first eviction (cache.rs)
/// - The placeholder shown for schematics that fail to render (placeholder.rs)

pub mod cache;
pub mod draw;
pub mod placeholder;

pub use cache::{PreviewCache, PreviewSettings, DEFAULT_EVICTION_INTERVAL};
pub use draw::{render_preview, PreviewLayout};
