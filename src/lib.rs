//! Schematic storage, extraction and preview caching.
//!
//! A [`SchematicStore`] loads saved blueprints from disk, a
//! [`RegionExtractor`] cuts new ones out of a tile grid, and a
//! [`PreviewCache`] renders and keeps their preview images.
//! [`Schematics`] ties a store and a cache together.

pub mod error;
pub mod files;
pub mod logging;
pub mod platform;
pub mod preview;
pub mod render;
pub mod schematics;
pub mod state;
pub mod world;

pub use error::{Error, Result};
pub use platform::{Platform, PlatformSettings};
pub use preview::{PreviewCache, PreviewSettings};
pub use render::{Canvas, Renderer, SoftwareRenderer};
pub use schematics::Schematics;
pub use state::data::{Schematic, Stile};
pub use state::library::SchematicStore;
pub use state::settings::Settings;
pub use world::{Block, BlockRegistry, Grid, GridPos, RegionExtractor};
