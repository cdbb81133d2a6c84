/// World-side collaborators used to build schematics
///
/// This module handles:
/// - Block types and name resolution (block.rs)
/// - The grid of placed structures (grid.rs)
/// - Selection normalisation (placement.rs)
/// - Extracting a schematic from a selection (extract.rs)

pub mod block;
pub mod extract;
pub mod grid;
pub mod placement;

pub use block::{Block, BlockRegistry, ContentRegistry, MAX_BLOCK_SIZE};
pub use extract::{max_extent, RegionExtractor, MAX_SCHEMATIC_SIZE};
pub use grid::{Grid, GridPos, Structure, StructureKind, TileGrid};
pub use placement::{Area, AreaNormalizer, Normalizer};
