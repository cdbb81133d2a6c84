//! Error types for every layer of the crate.
//!
//! Parse and render failures are caught where they happen (the store skips
//! the file, the preview cache returns its placeholder), so most callers
//! never see them. They are still public so collaborators can produce them.

use std::path::PathBuf;
use thiserror::Error;

/// A schematic document could not be turned into a [`crate::Schematic`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dimensions {width}x{height} (maximum {max})")]
    InvalidDimensions { width: i32, height: i32, max: i32 },

    #[error("tile '{block}' at ({x}, {y}) does not fit inside {width}x{height}")]
    TileOutOfBounds {
        block: String,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("tile '{block}' at ({x}, {y}) has rotation {rotation}, expected 0..4")]
    InvalidRotation {
        block: String,
        x: i32,
        y: i32,
        rotation: u8,
    },

    #[error("two tiles share position ({x}, {y})")]
    DuplicatePosition { x: i32, y: i32 },
}

/// Drawing a preview failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas {width}x{height} exceeds the maximum texture size {max}")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },

    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("schematic {width}x{height} does not fit the {capacity}px shadow canvas")]
    ShadowOverflow {
        width: i32,
        height: i32,
        capacity: u32,
    },

    #[error("no region for block '{0}'")]
    MissingRegion(String),
}

/// Placing a structure into a [`crate::world::TileGrid`] failed.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },
}

/// Settings could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The tracing subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialised,
}

/// Crate-wide error, for callers that want a single type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse schematic {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),
}

pub type Result<T> = std::result::Result<T, Error>;
