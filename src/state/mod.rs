/// State management module
///
/// This module handles all schematic state, including:
/// - The loaded schematic collection and reloads (library.rs)
/// - Schematic and placed-tile data structures (data.rs)
/// - User settings and their JSON file (settings.rs)

pub mod data;
pub mod library;
pub mod settings;
