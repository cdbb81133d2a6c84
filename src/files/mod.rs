/// Schematic files on disk
///
/// This module handles:
/// - The JSON schematic document and its reader (format.rs)
/// - Finding candidate files in local, workshop and mod folders (sources.rs)

pub mod format;
pub mod sources;

pub use format::{JsonSchematicReader, SchematicFile, SchematicReader, TileEntry};
pub use sources::{has_extension, list_local, ModDirectory, ModFile, ModSource, NoMods};
