use std::fmt;

use thiserror::Error;

/// Which nesting level a coordinate addresses. Every level is 4 wide per axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    SubCell,
    Voxel,
    Chunk,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::SubCell => write!(f, "sub-cell"),
            Level::Voxel => write!(f, "voxel"),
            Level::Chunk => write!(f, "chunk"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("invalid {level} coordinate ({x}, {y}, {z}): axes must be within 0..=3")]
    InvalidCoordinate { level: Level, x: u32, y: u32, z: u32 },
}
