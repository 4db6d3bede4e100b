//! Save/load of finished grids.
//!
//! Two encodings, picked from the file extension by `GridFormat::for_path`:
//! - `.json`: pretty-printed JSON
//! - anything else: binary, a fixed header followed by a bincode payload
//!
//! Binary layout (little endian):
//!
//! | bytes  | field                 |
//! |--------|-----------------------|
//! | 0..8   | magic `WFCGRID\0`     |
//! | 8..12  | format version (u32)  |
//! | 12..20 | payload length (u64)  |
//! | 20..   | bincode `GridSnapshot`|
//!
//! Only fully collapsed grids can be saved. Everything read back is checked
//! before it is returned, so a damaged file is an error, never a panic.
//!
//! # Example
//!
//! ```ignore
//! let snapshot = GridSnapshot::from_grid(solver.grid(), &tileset.alphabet)?;
//! save_grid(&snapshot, "maps/island.wfcgrid")?;
//! let loaded = load_grid("maps/island.wfcgrid")?;
//! ```

use crate::grid::Grid;
use crate::tile::TileAlphabet;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAGIC: &[u8; 8] = b"WFCGRID\0";

/// Newest binary version this build reads and the one it writes.
const VERSION: u32 = 1;

const HEADER_LEN: usize = 8 + 4 + 8;

/// Errors that can occur during grid I/O.
#[derive(Debug)]
pub enum GridIoError {
    /// File system error
    Io(std::io::Error),
    /// Binary payload could not be encoded or decoded
    Bincode(bincode::Error),
    /// JSON could not be encoded or decoded
    Json(String),
    /// Header or contents are inconsistent
    InvalidFormat(String),
    /// Written by a newer format version
    UnsupportedVersion(u32),
    /// The grid still has uncollapsed cells
    Incomplete { uncollapsed: usize },
}

impl std::fmt::Display for GridIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridIoError::Io(e) => write!(f, "grid file I/O failed: {}", e),
            GridIoError::Bincode(e) => write!(f, "bad binary grid payload: {}", e),
            GridIoError::Json(e) => write!(f, "bad JSON grid: {}", e),
            GridIoError::InvalidFormat(msg) => write!(f, "not a valid grid file: {}", msg),
            GridIoError::UnsupportedVersion(v) => {
                write!(f, "grid file version {} is newer than {}", v, VERSION)
            }
            GridIoError::Incomplete { uncollapsed } => {
                write!(f, "grid has {} uncollapsed cells", uncollapsed)
            }
        }
    }
}

impl std::error::Error for GridIoError {}

impl From<std::io::Error> for GridIoError {
    fn from(e: std::io::Error) -> Self {
        GridIoError::Io(e)
    }
}

impl From<bincode::Error> for GridIoError {
    fn from(e: bincode::Error) -> Self {
        GridIoError::Bincode(e)
    }
}

impl From<serde_json::Error> for GridIoError {
    fn from(e: serde_json::Error) -> Self {
        GridIoError::Json(e.to_string())
    }
}

pub type GridIoResult<T> = Result<T, GridIoError>;

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    Binary,
    Json,
}

impl GridFormat {
    /// `.json` (any case) selects JSON; every other path is binary.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => GridFormat::Json,
            _ => GridFormat::Binary,
        }
    }
}

/// Persisted form of a finished grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    /// Tile names; `cells` index into this list.
    pub tiles: Vec<String>,
    /// Tile index per cell, row-major.
    pub cells: Vec<u8>,
}

impl GridSnapshot {
    /// Capture a fully collapsed grid.
    pub fn from_grid(grid: &Grid, alphabet: &TileAlphabet) -> GridIoResult<Self> {
        let tiles = grid.tiles().ok_or(GridIoError::Incomplete {
            uncollapsed: grid.len() - grid.collapsed_count(),
        })?;

        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            tiles: alphabet.names().to_vec(),
            cells: tiles.iter().map(|t| t.index() as u8).collect(),
        })
    }

    /// Tile name at `(x, y)`, or `None` outside the grid.
    pub fn tile_name(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = *self.cells.get(x + y * self.width)? as usize;
        self.tiles.get(index).map(String::as_str)
    }

    /// Encode in `format`.
    pub fn to_bytes(&self, format: GridFormat) -> GridIoResult<Vec<u8>> {
        match format {
            GridFormat::Json => Ok(serde_json::to_vec_pretty(self)?),
            GridFormat::Binary => {
                let payload = bincode::serialize(self)?;
                let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
                out.extend_from_slice(MAGIC);
                out.extend_from_slice(&VERSION.to_le_bytes());
                out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
                out.extend_from_slice(&payload);
                Ok(out)
            }
        }
    }

    /// Decode and check bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8], format: GridFormat) -> GridIoResult<Self> {
        let snapshot: Self = match format {
            GridFormat::Json => serde_json::from_slice(bytes)?,
            GridFormat::Binary => bincode::deserialize(binary_payload(bytes)?)?,
        };
        snapshot.checked()
    }

    fn checked(self) -> GridIoResult<Self> {
        let expected = self.width.checked_mul(self.height).ok_or_else(|| {
            GridIoError::InvalidFormat(format!(
                "dimensions {}x{} overflow",
                self.width, self.height
            ))
        })?;
        if self.cells.len() != expected {
            return Err(GridIoError::InvalidFormat(format!(
                "{} cells for a {}x{} grid",
                self.cells.len(),
                self.width,
                self.height
            )));
        }
        if let Some(&bad) = self.cells.iter().find(|&&c| c as usize >= self.tiles.len()) {
            return Err(GridIoError::InvalidFormat(format!(
                "tile index {} with {} tiles",
                bad,
                self.tiles.len()
            )));
        }
        Ok(self)
    }
}

/// Split `n` bytes off the front of `bytes`.
fn take<'a>(bytes: &'a [u8], n: usize, field: &str) -> GridIoResult<(&'a [u8], &'a [u8])> {
    if bytes.len() < n {
        return Err(GridIoError::InvalidFormat(format!("truncated {}", field)));
    }
    Ok(bytes.split_at(n))
}

/// Validate the binary header and return the payload it announces.
fn binary_payload(bytes: &[u8]) -> GridIoResult<&[u8]> {
    let (magic, rest) = take(bytes, MAGIC.len(), "magic")?;
    if magic != MAGIC {
        return Err(GridIoError::InvalidFormat("missing grid magic".to_string()));
    }

    let (version, rest) = take(rest, 4, "version")?;
    let version = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
    if version > VERSION {
        return Err(GridIoError::UnsupportedVersion(version));
    }

    let (length, payload) = take(rest, 8, "payload length")?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(length);
    let length = u64::from_le_bytes(raw);

    if usize::try_from(length).ok() != Some(payload.len()) {
        return Err(GridIoError::InvalidFormat(format!(
            "header announces {} payload bytes, file has {}",
            length,
            payload.len()
        )));
    }
    Ok(payload)
}

/// Save a snapshot, encoding it by the path's extension.
pub fn save_grid<P: AsRef<Path>>(snapshot: &GridSnapshot, path: P) -> GridIoResult<()> {
    let path = path.as_ref();
    save_grid_as(snapshot, path, GridFormat::for_path(path))
}

/// Load a snapshot, decoding it by the path's extension.
pub fn load_grid<P: AsRef<Path>>(path: P) -> GridIoResult<GridSnapshot> {
    let path = path.as_ref();
    load_grid_as(path, GridFormat::for_path(path))
}

/// Save a snapshot in an explicit format.
pub fn save_grid_as<P: AsRef<Path>>(
    snapshot: &GridSnapshot,
    path: P,
    format: GridFormat,
) -> GridIoResult<()> {
    std::fs::write(path, snapshot.to_bytes(format)?)?;
    Ok(())
}

/// Load a snapshot stored in an explicit format.
pub fn load_grid_as<P: AsRef<Path>>(path: P, format: GridFormat) -> GridIoResult<GridSnapshot> {
    let bytes = std::fs::read(path)?;
    GridSnapshot::from_bytes(&bytes, format)
}
