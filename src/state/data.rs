/// Shared data structures for the schematic subsystem
///
/// These structs represent the data model that flows between
/// the file loaders, the region extractor and the preview cache.
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ParseError;
use crate::world::Block;

/// Tag holding the display name of a schematic
pub const NAME_TAG: &str = "name";

/// Tag identifying the external (workshop) folder a schematic came from
pub const SOURCE_TAG: &str = "steamid";

/// One placed block inside a schematic
#[derive(Debug, Clone, PartialEq)]
pub struct Stile {
    pub block: Arc<Block>,
    /// Offset from the schematic origin, `0..width`
    pub x: i32,
    /// Offset from the schematic origin, `0..height`
    pub y: i32,
    /// Opaque per-block configuration (`Null` when unconfigured)
    pub config: Value,
    /// Cardinal rotation, `0..4`
    pub rotation: u8,
}

impl Stile {
    pub fn new(block: Arc<Block>, x: i32, y: i32, config: Value, rotation: u8) -> Self {
        Self {
            block,
            x,
            y,
            config,
            rotation,
        }
    }
}

/// A saved rectangular blueprint
///
/// Immutable once built. The store shares schematics as `Arc<Schematic>`,
/// and the preview cache keys them by that `Arc`'s identity, so two
/// schematics with identical contents still get separate previews.
#[derive(Debug, Clone)]
pub struct Schematic {
    tiles: Vec<Stile>,
    tags: BTreeMap<String, String>,
    width: i32,
    height: i32,
    file: Option<PathBuf>,
    mod_name: Option<String>,
}

impl Schematic {
    pub fn new(tiles: Vec<Stile>, tags: BTreeMap<String, String>, width: i32, height: i32) -> Self {
        Self {
            tiles,
            tags,
            width,
            height,
            file: None,
            mod_name: None,
        }
    }

    /// The degenerate schematic produced by an empty selection
    pub fn empty() -> Self {
        Self::new(Vec::new(), BTreeMap::new(), 1, 1)
    }

    /// Record the file this schematic was read from
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Record the mod that shipped this schematic
    pub fn with_mod(mut self, mod_name: impl Into<String>) -> Self {
        self.mod_name = Some(mod_name.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tiles(&self) -> &[Stile] {
        &self.tiles
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn mod_name(&self) -> Option<&str> {
        self.mod_name.as_deref()
    }

    /// Display name, "unknown" when the schematic carries no name tag
    pub fn name(&self) -> &str {
        self.tag(NAME_TAG).unwrap_or("unknown")
    }

    /// Deterministic ordering: by name, then by file path
    pub fn compare(&self, other: &Schematic) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.file.cmp(&other.file))
    }

    /// Check the structural invariants of a schematic built from untrusted
    /// input: positive size no larger than `max_size`, every footprint
    /// inside the bounds, rotations in `0..4`, no shared root positions.
    pub fn validate(&self, max_size: i32) -> Result<(), ParseError> {
        if self.width < 1 || self.height < 1 || self.width > max_size || self.height > max_size {
            return Err(ParseError::InvalidDimensions {
                width: self.width,
                height: self.height,
                max: max_size,
            });
        }

        let mut seen = HashSet::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            if tile.rotation >= 4 {
                return Err(ParseError::InvalidRotation {
                    block: tile.block.name.clone(),
                    x: tile.x,
                    y: tile.y,
                    rotation: tile.rotation,
                });
            }

            let (bot, top) = tile.block.footprint();
            let inside = tile.x + bot >= 0
                && tile.y + bot >= 0
                && tile.x + top < self.width
                && tile.y + top < self.height;
            if !inside {
                return Err(ParseError::TileOutOfBounds {
                    block: tile.block.name.clone(),
                    x: tile.x,
                    y: tile.y,
                    width: self.width,
                    height: self.height,
                });
            }

            if !seen.insert((tile.x, tile.y)) {
                return Err(ParseError::DuplicatePosition {
                    x: tile.x,
                    y: tile.y,
                });
            }
        }

        Ok(())
    }
}
