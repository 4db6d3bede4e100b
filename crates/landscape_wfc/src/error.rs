//! Error types shared across the solver.
//!
//! Configuration problems fail construction. Contradictions are not errors:
//! they are reported through `StepResult`.

use std::fmt;

/// Errors raised while building an alphabet, rule table or solver.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The alphabet has no tiles
    EmptyAlphabet,
    /// The alphabet exceeds the possibility mask width
    TooManyTiles { count: usize, max: usize },
    /// A tile name appears twice in the alphabet
    DuplicateTile(String),
    /// A referenced tile name is not in the alphabet
    UnknownTile { name: String, context: String },
    /// A direction name is not one of up/down/left/right
    UnknownDirection(String),
    /// The rule table has no entry for a (tile, direction) pair
    MissingRule { tile: String, direction: String },
    /// The rule table was built for a different alphabet size
    RuleTableSize { expected: usize, found: usize },
    /// Width or height is zero
    InvalidDimensions { width: usize, height: usize },
    /// A start or preset coordinate lies outside the grid
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A decoration probability is not within [0, 1]
    InvalidProbability { tile: String, probability: f64 },
    /// Config file could not be read
    Io(String),
    /// Config file is not valid JSON for the expected shape
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyAlphabet => write!(f, "tile alphabet is empty"),
            ConfigError::TooManyTiles { count, max } => {
                write!(f, "tile alphabet has {} tiles, at most {} supported", count, max)
            }
            ConfigError::DuplicateTile(name) => write!(f, "duplicate tile '{}'", name),
            ConfigError::UnknownTile { name, context } => {
                write!(f, "unknown tile '{}' in {}", name, context)
            }
            ConfigError::UnknownDirection(name) => write!(f, "unknown direction '{}'", name),
            ConfigError::MissingRule { tile, direction } => {
                write!(f, "no adjacency rule for tile '{}' direction {}", tile, direction)
            }
            ConfigError::RuleTableSize { expected, found } => write!(
                f,
                "rule table has {} entries but the alphabet has {} tiles",
                found, expected
            ),
            ConfigError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {}x{}", width, height)
            }
            ConfigError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "coordinate ({}, {}) outside {}x{} grid",
                x, y, width, height
            ),
            ConfigError::InvalidProbability { tile, probability } => write!(
                f,
                "decoration probability {} for tile '{}' is outside [0, 1]",
                probability, tile
            ),
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e.to_string())
    }
}

/// Misuse of grid coordinates by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside the grid
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for GridError {}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => ConfigError::OutOfBounds {
                x,
                y,
                width,
                height,
            },
        }
    }
}
