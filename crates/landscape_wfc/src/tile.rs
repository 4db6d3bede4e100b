//! Tile alphabet and possibility sets.
//!
//! Tile types are interned: the alphabet owns the names and everything
//! downstream works with compact `TileId` indices. A `Possibilities` set is a
//! single `u64` bitmask, which caps the alphabet at `MAX_TILES` entries.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest alphabet a `Possibilities` mask can hold.
pub const MAX_TILES: usize = 64;

/// Index of a tile type within its alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u8);

impl TileId {
    /// Create a tile id from an alphabet index.
    ///
    /// Returns `None` if the index cannot fit in a `Possibilities` mask.
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_TILES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Position of this tile in its alphabet.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn bit(self) -> u64 {
        1u64 << self.0
    }
}

/// Set of tile types still possible at a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Possibilities(u64);

impl Possibilities {
    /// The empty set (a contradiction when held by a cell).
    pub const EMPTY: Self = Self(0);

    /// Every tile of an alphabet with `count` entries.
    pub fn full(count: usize) -> Self {
        if count >= MAX_TILES {
            Self(u64::MAX)
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// A set holding exactly one tile.
    pub fn single(tile: TileId) -> Self {
        Self(tile.bit())
    }

    /// Build a set from tile ids.
    pub fn from_tiles<I: IntoIterator<Item = TileId>>(tiles: I) -> Self {
        let mut set = Self::EMPTY;
        for tile in tiles {
            set.insert(tile);
        }
        set
    }

    pub fn insert(&mut self, tile: TileId) {
        self.0 |= tile.bit();
    }

    #[inline]
    pub fn contains(self, tile: TileId) -> bool {
        self.0 & tile.bit() != 0
    }

    /// Tiles present in both sets.
    #[inline]
    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// True if every tile of `self` is also in `other`.
    #[inline]
    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Number of tiles in the set (the cell's entropy).
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The only tile in the set, if it has exactly one.
    pub fn single_tile(self) -> Option<TileId> {
        if self.len() == 1 {
            TileId::new(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// The `n`th tile in ascending id order.
    pub fn nth(self, n: usize) -> Option<TileId> {
        self.iter().nth(n)
    }

    /// Iterate tiles in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = TileId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            TileId::new(index)
        })
    }
}

impl fmt::Debug for Possibilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(TileId::index)).finish()
    }
}

impl FromIterator<TileId> for Possibilities {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self::from_tiles(iter)
    }
}

/// Ordered, duplicate-free list of tile type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileAlphabet {
    names: Vec<String>,
}

impl TileAlphabet {
    /// Intern a list of tile names.
    ///
    /// Fails on an empty list, a repeated name, or more than `MAX_TILES` names.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if names.len() > MAX_TILES {
            return Err(ConfigError::TooManyTiles {
                count: names.len(),
                max: MAX_TILES,
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ConfigError::DuplicateTile(name.clone()));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up a tile id by name.
    pub fn id(&self, name: &str) -> Option<TileId> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(TileId::new)
    }

    /// Name of a tile. Returns `None` for ids outside this alphabet.
    pub fn name(&self, tile: TileId) -> Option<&str> {
        self.names.get(tile.index()).map(String::as_str)
    }

    /// All tile ids in alphabet order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.names.len()).filter_map(TileId::new)
    }

    /// The full possibility set (every tile allowed).
    pub fn all(&self) -> Possibilities {
        Possibilities::full(self.names.len())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
