//! Block types and the content registry that resolves them by name.

use std::collections::HashMap;
use std::sync::Arc;

/// Largest footprint edge a block may have, in tiles
pub const MAX_BLOCK_SIZE: u8 = 16;

/// A placeable block type.
///
/// Blocks are shared (`Arc<Block>`) between the registry, the grid and every
/// schematic tile that references them.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Unique content name (e.g. "conveyor")
    pub name: String,
    /// Footprint edge length in tiles (a size 3 block covers 3x3 cells),
    /// `1..=MAX_BLOCK_SIZE`
    pub size: u8,
    /// Whether the block is shown in the build menu
    pub visible: bool,
    /// Core blocks are always captured by schematics even when hidden
    pub core: bool,
    /// RGBA colour the software renderer fills the block with
    pub color: [u8; 4],
}

impl Block {
    /// Create a visible, non-core block with a neutral grey colour.
    pub fn new(name: impl Into<String>, size: u8) -> Self {
        Self {
            name: name.into(),
            size: size.clamp(1, MAX_BLOCK_SIZE),
            visible: true,
            core: false,
            color: [160, 160, 160, 255],
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn core(mut self) -> Self {
        self.core = true;
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    /// Whether extraction should capture this block.
    pub fn is_schematic_visible(&self) -> bool {
        self.visible || self.core
    }

    /// Inclusive footprint extent relative to the anchor tile, as `(bot, top)`.
    ///
    /// Odd sizes are centred on the anchor; even sizes extend one tile
    /// further in the positive direction (size 2 covers `anchor..=anchor+1`).
    pub fn footprint(&self) -> (i32, i32) {
        let size = self.size.clamp(1, MAX_BLOCK_SIZE) as i32;
        let top = size / 2;
        let bot = if size % 2 == 1 { -size / 2 } else { -(size - 1) / 2 };
        (bot, top)
    }

    /// Distance in tiles from the anchor tile centre to the footprint centre.
    pub fn offset(&self) -> f32 {
        if self.size % 2 == 0 {
            0.5
        } else {
            0.0
        }
    }
}

/// Resolves block names found in schematic documents.
pub trait BlockRegistry {
    fn block(&self, name: &str) -> Option<Arc<Block>>;
}

/// In-memory [`BlockRegistry`].
#[derive(Debug, Default, Clone)]
pub struct ContentRegistry {
    blocks: HashMap<String, Arc<Block>>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block, replacing any previous block with the same name.
    pub fn register(&mut self, block: Block) -> Arc<Block> {
        let block = Arc::new(block);
        self.blocks.insert(block.name.clone(), Arc::clone(&block));
        block
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockRegistry for ContentRegistry {
    fn block(&self, name: &str) -> Option<Arc<Block>> {
        self.blocks.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_parity() {
        assert_eq!(Block::new("a", 1).footprint(), (0, 0));
        assert_eq!(Block::new("b", 2).footprint(), (0, 1));
        assert_eq!(Block::new("c", 3).footprint(), (-1, 1));
        assert_eq!(Block::new("d", 4).footprint(), (-1, 2));
    }

    #[test]
    fn test_size_is_capped() {
        assert_eq!(Block::new("huge", 200).size, MAX_BLOCK_SIZE);
        assert_eq!(Block::new("none", 0).size, 1);

        let mut raw = Block::new("raw", 1);
        raw.size = 255;
        assert_eq!(raw.footprint(), (-7, 8));
    }

    #[test]
    fn test_core_blocks_are_always_visible() {
        assert!(Block::new("core", 3).hidden().core().is_schematic_visible());
        assert!(!Block::new("rock", 1).hidden().is_schematic_visible());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ContentRegistry::new();
        registry.register(Block::new("conveyor", 1));
        assert_eq!(registry.block("conveyor").map(|b| b.size), Some(1));
        assert!(registry.block("router").is_none());
    }
}
