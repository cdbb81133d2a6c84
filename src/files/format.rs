/// JSON schematic documents
///
/// A document stores the schematic size, its tags and one entry per tile,
/// with blocks referenced by name:
///
/// ```json
/// { "width": 3, "height": 1, "tags": { "name": "Line" },
///   "tiles": [ { "block": "conveyor", "x": 0, "y": 0, "rotation": 0 } ] }
/// ```
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::ParseError;
use crate::state::data::{Schematic, Stile};
use crate::world::{max_extent, BlockRegistry};

/// One tile entry of a schematic document
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TileEntry {
    pub block: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub config: Value,
    #[serde(default)]
    pub rotation: u8,
}

/// On-disk form of a schematic
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SchematicFile {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
}

impl SchematicFile {
    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve block names and check every schematic invariant.
    ///
    /// `max_size` is the selection limit used when creating schematics, so
    /// anything up to [`max_extent`] of it is accepted. Tiles naming a block the registry does not know are dropped, the
    /// same way removed content turns into empty space in the game.
    pub fn into_schematic(
        self,
        registry: &dyn BlockRegistry,
        max_size: i32,
    ) -> Result<Schematic, ParseError> {
        let mut tiles = Vec::with_capacity(self.tiles.len());
        for entry in self.tiles {
            match registry.block(&entry.block) {
                Some(block) => tiles.push(Stile::new(
                    block,
                    entry.x,
                    entry.y,
                    entry.config,
                    entry.rotation,
                )),
                None => debug!("Dropping tile with unknown block '{}'", entry.block),
            }
        }

        let schematic = Schematic::new(tiles, self.tags, self.width, self.height);
        schematic.validate(max_extent(max_size))?;
        Ok(schematic)
    }
}

impl From<&Schematic> for SchematicFile {
    fn from(schematic: &Schematic) -> Self {
        Self {
            width: schematic.width(),
            height: schematic.height(),
            tags: schematic.tags().clone(),
            tiles: schematic
                .tiles()
                .iter()
                .map(|tile| TileEntry {
                    block: tile.block.name.clone(),
                    x: tile.x,
                    y: tile.y,
                    config: tile.config.clone(),
                    rotation: tile.rotation,
                })
                .collect(),
        }
    }
}

/// Parses one schematic file
pub trait SchematicReader {
    fn read(&self, path: &Path) -> Result<Schematic, ParseError>;
}

/// Reads [`SchematicFile`] JSON documents
pub struct JsonSchematicReader {
    registry: Box<dyn BlockRegistry>,
    max_size: i32,
}

impl JsonSchematicReader {
    pub fn new(registry: Box<dyn BlockRegistry>, max_size: i32) -> Self {
        Self { registry, max_size }
    }
}

impl std::fmt::Debug for JsonSchematicReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchematicReader")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl SchematicReader for JsonSchematicReader {
    fn read(&self, path: &Path) -> Result<Schematic, ParseError> {
        let content = std::fs::read_to_string(path)?;
        let file = SchematicFile::from_json(&content)?;
        Ok(file
            .into_schematic(self.registry.as_ref(), self.max_size)?
            .with_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, ContentRegistry};
    use serde_json::json;

    fn registry() -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        registry.register(Block::new("conveyor", 1));
        registry.register(Block::new("vault", 3));
        registry
    }

    #[test]
    fn test_parse_document() {
        let doc = r#"{
            "width": 4, "height": 3,
            "tags": { "name": "Storage" },
            "tiles": [
                { "block": "vault", "x": 1, "y": 1 },
                { "block": "conveyor", "x": 3, "y": 0, "rotation": 1, "config": [1, 2] }
            ]
        }"#;

        let schematic = SchematicFile::from_json(doc)
            .unwrap()
            .into_schematic(&registry(), 512)
            .unwrap();

        assert_eq!(schematic.name(), "Storage");
        assert_eq!(schematic.tiles().len(), 2);
        assert_eq!(schematic.tiles()[1].config, json!([1, 2]));
        assert_eq!(schematic.tiles()[1].rotation, 1);
        assert!(schematic.tiles()[0].config.is_null());
    }

    #[test]
    fn test_unknown_blocks_are_dropped() {
        let doc = r#"{ "width": 2, "height": 1, "tiles": [
            { "block": "conveyor", "x": 0, "y": 0 },
            { "block": "legacy-thing", "x": 1, "y": 0 }
        ] }"#;

        let schematic = SchematicFile::from_json(doc)
            .unwrap()
            .into_schematic(&registry(), 512)
            .unwrap();

        assert_eq!(schematic.tiles().len(), 1);
    }

    #[test]
    fn test_invalid_documents_rejected() {
        let zero = r#"{ "width": 0, "height": 1 }"#;
        assert!(matches!(
            SchematicFile::from_json(zero).unwrap().into_schematic(&registry(), 512),
            Err(ParseError::InvalidDimensions { .. })
        ));

        let rotated = r#"{ "width": 1, "height": 1, "tiles": [
            { "block": "conveyor", "x": 0, "y": 0, "rotation": 7 } ] }"#;
        assert!(matches!(
            SchematicFile::from_json(rotated).unwrap().into_schematic(&registry(), 512),
            Err(ParseError::InvalidRotation { rotation: 7, .. })
        ));

        let oversized = r#"{ "width": 529, "height": 1 }"#;
        assert!(matches!(
            SchematicFile::from_json(oversized).unwrap().into_schematic(&registry(), 512),
            Err(ParseError::InvalidDimensions { width: 529, max: 528, .. })
        ));

        assert!(SchematicFile::from_json("not json").is_err());
    }

    #[test]
    fn test_reader_records_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.msch");
        let file = SchematicFile {
            width: 1,
            height: 1,
            tags: BTreeMap::new(),
            tiles: vec![TileEntry {
                block: "conveyor".to_string(),
                x: 0,
                y: 0,
                config: Value::Null,
                rotation: 0,
            }],
        };
        std::fs::write(&path, file.to_json().unwrap()).unwrap();

        let reader = JsonSchematicReader::new(Box::new(registry()), 512);
        let schematic = reader.read(&path).unwrap();

        assert_eq!(schematic.file(), Some(path.as_path()));
        assert_eq!(SchematicFile::from(&schematic), file);
    }

    #[test]
    fn test_reader_reports_missing_file() {
        let reader = JsonSchematicReader::new(Box::new(registry()), 512);
        assert!(matches!(
            reader.read(Path::new("/nonexistent/x.msch")),
            Err(ParseError::Io(_))
        ));
    }
}
