//! Read-only view of the world's tile grid, plus an in-memory grid.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::block::Block;
use crate::error::GridError;

/// Anchor position of a structure on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What occupies a set of cells.
#[derive(Debug, Clone)]
pub enum StructureKind {
    /// A completed block.
    Finished(Arc<Block>),
    /// A block still being built towards `target`.
    UnderConstruction {
        target: Arc<Block>,
        /// The block being replaced, if this is an upgrade in progress
        current: Option<Arc<Block>>,
        /// Build progress in `0.0..=1.0`
        progress: f32,
    },
}

impl StructureKind {
    /// The block this structure is, or is going to become.
    pub fn target_block(&self) -> &Arc<Block> {
        match self {
            StructureKind::Finished(block) => block,
            StructureKind::UnderConstruction { target, .. } => target,
        }
    }

    /// The block physically present right now, if any.
    pub fn current_block(&self) -> Option<&Arc<Block>> {
        match self {
            StructureKind::Finished(block) => Some(block),
            StructureKind::UnderConstruction { current, .. } => current.as_ref(),
        }
    }

    pub fn is_under_construction(&self) -> bool {
        matches!(self, StructureKind::UnderConstruction { .. })
    }
}

/// A structure placed on the grid.
#[derive(Debug, Clone)]
pub struct Structure {
    pub kind: StructureKind,
    /// Anchor tile; for even sizes the footprint extends towards +x/+y
    pub position: GridPos,
    /// Cardinal rotation in `0..4`
    pub rotation: u8,
    /// Block-specific configuration (`Null` when unconfigured)
    pub config: Value,
}

impl Structure {
    pub fn finished(block: Arc<Block>, x: i32, y: i32) -> Self {
        Self {
            kind: StructureKind::Finished(block),
            position: GridPos::new(x, y),
            rotation: 0,
            config: Value::Null,
        }
    }

    pub fn under_construction(target: Arc<Block>, x: i32, y: i32, progress: f32) -> Self {
        Self {
            kind: StructureKind::UnderConstruction {
                target,
                current: None,
                progress: progress.clamp(0.0, 1.0),
            },
            position: GridPos::new(x, y),
            rotation: 0,
            config: Value::Null,
        }
    }

    /// Record the block being replaced. Only applies while under construction.
    pub fn with_current(mut self, block: Arc<Block>) -> Self {
        if let StructureKind::UnderConstruction { current, .. } = &mut self.kind {
            *current = Some(block);
        }
        self
    }

    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation % 4;
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Footprint edge length, taken from the target block.
    pub fn footprint_size(&self) -> u8 {
        self.kind.target_block().size
    }

    /// Every cell this structure covers.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        let (bot, top) = self.kind.target_block().footprint();
        let GridPos { x, y } = self.position;
        (bot..=top).flat_map(move |dx| (bot..=top).map(move |dy| GridPos::new(x + dx, y + dy)))
    }
}

/// Grid collaborator used by the region extractor.
///
/// Every cell covered by a multi-tile structure must return that same
/// structure.
pub trait Grid {
    fn structure_at(&self, x: i32, y: i32) -> Option<&Structure>;
}

/// Sparse in-memory grid.
#[derive(Debug, Default, Clone)]
pub struct TileGrid {
    structures: Vec<Structure>,
    cells: HashMap<GridPos, usize>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a structure, rejecting it if any of its cells is taken.
    pub fn place(&mut self, structure: Structure) -> Result<(), GridError> {
        if let Some(taken) = structure.cells().find(|cell| self.cells.contains_key(cell)) {
            return Err(GridError::Occupied {
                x: taken.x,
                y: taken.y,
            });
        }

        let index = self.structures.len();
        let cells: Vec<GridPos> = structure.cells().collect();
        self.structures.push(structure);
        for cell in cells {
            self.cells.insert(cell, index);
        }
        Ok(())
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl Grid for TileGrid {
    fn structure_at(&self, x: i32, y: i32) -> Option<&Structure> {
        self.cells
            .get(&GridPos::new(x, y))
            .map(|&index| &self.structures[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_tile_structure_covers_all_cells() {
        let mut grid = TileGrid::new();
        let block = Arc::new(Block::new("vault", 3));
        grid.place(Structure::finished(block, 10, 10)).unwrap();

        for x in 9..=11 {
            for y in 9..=11 {
                let found = grid.structure_at(x, y).expect("cell covered");
                assert_eq!(found.position, GridPos::new(10, 10));
            }
        }
        assert!(grid.structure_at(12, 10).is_none());
    }

    #[test]
    fn test_overlapping_placement_rejected() {
        let mut grid = TileGrid::new();
        let big = Arc::new(Block::new("big", 2));
        let small = Arc::new(Block::new("small", 1));
        grid.place(Structure::finished(big, 0, 0)).unwrap();

        let err = grid.place(Structure::finished(small, 1, 1)).unwrap_err();
        assert!(matches!(err, GridError::Occupied { x: 1, y: 1 }));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_under_construction_reports_target() {
        let target = Arc::new(Block::new("drill", 2));
        let structure = Structure::under_construction(Arc::clone(&target), 0, 0, 0.3);
        assert!(structure.kind.is_under_construction());
        assert_eq!(structure.kind.target_block().name, "drill");
        assert!(structure.kind.current_block().is_none());
        assert_eq!(structure.footprint_size(), 2);

        let upgrade = structure.with_current(Arc::new(Block::new("scrap", 1)));
        assert_eq!(upgrade.kind.current_block().map(|b| b.name.as_str()), Some("scrap"));
        assert_eq!(upgrade.kind.target_block().name, "drill");

        let finished = Structure::finished(target, 0, 0).with_current(Arc::new(Block::new("x", 1)));
        assert_eq!(finished.kind.current_block().map(|b| b.name.as_str()), Some("drill"));
    }
}
