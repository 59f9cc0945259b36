// Setup-time errors. The per-tick core (integration, steering, collision)
// is total and never produces one of these.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MazeError {
    #[error("maze must have at least one cell, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("cell ({x}, {y}) is outside the {width}x{height} maze")]
    CellOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

pub type MazeResult<T> = Result<T, MazeError>;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} = {value} is outside {range}")]
    OutOfRange {
        key: &'static str,
        value: f64,
        range: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
