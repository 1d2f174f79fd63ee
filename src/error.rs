use std::path::PathBuf;

use thiserror::Error;

use crate::grid::OccupantId;

/// Cell access outside the grid or onto an already occupied cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) out of bounds for grid {width}x{height}")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("cell ({x}, {y}) is already occupied by {occupant}")]
    AlreadyOccupied { x: u32, y: u32, occupant: OccupantId },
}

/// Returned when normalizing the zero vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot normalize a zero-length vector")]
pub struct DegenerateVector;

/// Malformed `.wad` map file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot read map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("map {} must have the .wad extension", .0.display())]
    Extension(PathBuf),
    #[error("map is missing its size header")]
    MissingHeader,
    #[error("invalid map size {0:?}")]
    InvalidSize(String),
    #[error("map declares {expected} rows but contains {found}")]
    RowCount { expected: usize, found: usize },
    #[error("map row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid cell {found:?} at column {column}, row {row}")]
    InvalidCell {
        column: usize,
        row: usize,
        found: char,
    },
}

/// Engine configuration that cannot be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Scene and scene-registry failures.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("an occupant named {0:?} already exists")]
    DuplicateOccupant(String),
    #[error("a scene named {0:?} already exists")]
    DuplicateScene(String),
    #[error("no scene named {0:?}")]
    UnknownScene(String),
    #[error("no active scene")]
    NoActiveScene,
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
