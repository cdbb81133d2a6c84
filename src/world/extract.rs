//! Builds a schematic from a rectangular selection of the grid.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::block::{Block, MAX_BLOCK_SIZE};
use super::grid::{Grid, GridPos, Structure};
use super::placement::{Area, AreaNormalizer, Normalizer};
use crate::state::data::{Schematic, Stile};

/// Largest selection span, in tiles
pub const MAX_SCHEMATIC_SIZE: i32 = 512;

/// Largest edge of a schematic extracted with selection limit `max_size`.
///
/// A clamped selection covers `max_size + 1` cells, and blocks anchored on
/// its border can hang out by up to `MAX_BLOCK_SIZE - 1` cells in total.
pub fn max_extent(max_size: i32) -> i32 {
    max_size.max(1).saturating_add(MAX_BLOCK_SIZE as i32)
}

/// Extracts the tightest schematic around every visible structure touching
/// a selection.
pub struct RegionExtractor {
    max_size: i32,
    normalizer: Box<dyn Normalizer>,
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new(MAX_SCHEMATIC_SIZE)
    }
}

impl std::fmt::Debug for RegionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionExtractor")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl RegionExtractor {
    pub fn new(max_size: i32) -> Self {
        Self::with_normalizer(max_size, Box::new(AreaNormalizer))
    }

    pub fn with_normalizer(max_size: i32, normalizer: Box<dyn Normalizer>) -> Self {
        Self {
            max_size: max_size.max(1),
            normalizer,
        }
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    /// Extract the schematic for the selection spanned by two corners.
    ///
    /// Oversized selections are clipped by the normaliser. A selection
    /// without any qualifying structure yields a 1x1 schematic with no tiles.
    pub fn extract(&self, grid: &dyn Grid, from: GridPos, to: GridPos) -> Schematic {
        let selection = self
            .normalizer
            .normalize(from.x, from.y, to.x, to.y, self.max_size);

        let Some(bounds) = envelope(grid, selection) else {
            return Schematic::empty();
        };

        let mut tiles = Vec::new();
        let mut counted = HashSet::new();
        // Walk the untrimmed selection again; the envelope only fixes the origin.
        for (cx, cy) in selection.cells() {
            let Some(structure) = grid.structure_at(cx, cy) else {
                continue;
            };
            if counted.contains(&structure.position) {
                continue;
            }
            let Some(block) = capture_block(structure) else {
                continue;
            };

            tiles.push(Stile::new(
                Arc::clone(block),
                structure.position.x - bounds.x,
                structure.position.y - bounds.y,
                structure.config.clone(),
                structure.rotation,
            ));
            counted.insert(structure.position);
        }

        Schematic::new(tiles, BTreeMap::new(), bounds.width(), bounds.height())
    }
}

/// The block a structure contributes to a schematic, or `None` if it is
/// not captured.
///
/// Structures under construction resolve to their target block for both
/// the visibility check and the footprint.
fn capture_block(structure: &Structure) -> Option<&Arc<Block>> {
    let block = structure.kind.target_block();
    block.is_schematic_visible().then_some(block)
}

/// Bounding box of every captured footprint touching `selection`.
fn envelope(grid: &dyn Grid, selection: Area) -> Option<Area> {
    let mut bounds: Option<Area> = None;

    for (cx, cy) in selection.cells() {
        let Some(structure) = grid.structure_at(cx, cy) else {
            continue;
        };
        let Some(block) = capture_block(structure) else {
            continue;
        };

        let (bot, top) = block.footprint();
        let GridPos { x, y } = structure.position;
        let covered = Area {
            x: x + bot,
            y: y + bot,
            x2: x + top,
            y2: y + top,
        };

        bounds = Some(match bounds {
            None => covered,
            Some(b) => Area {
                x: b.x.min(covered.x),
                y: b.y.min(covered.y),
                x2: b.x2.max(covered.x2),
                y2: b.y2.max(covered.y2),
            },
        });
    }

    bounds
}
