//! Adjacency rule table.
//!
//! `allowed(tile, direction)` is the set of tiles permitted in the neighbor
//! cell lying in `direction` from a cell holding `tile`. The table is total
//! over alphabet x direction; construction refuses anything less.

use crate::direction::Direction;
use crate::error::ConfigError;
use crate::tile::{Possibilities, TileAlphabet, TileId};
use bevy_log::warn;
use std::collections::BTreeMap;

/// Name-keyed rule table as written in tileset files:
/// `tile -> direction -> [allowed neighbor tiles]`.
pub type NamedRules = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Total lookup table of permitted neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRules {
    /// `allowed[tile][direction]`
    allowed: Vec<[Possibilities; 4]>,
}

impl AdjacencyRules {
    /// Build a table from per-tile allowed sets indexed by `Direction::index`.
    ///
    /// The table must have exactly one row per alphabet entry, and every set
    /// must stay within the alphabet.
    pub fn new(
        alphabet: &TileAlphabet,
        allowed: Vec<[Possibilities; 4]>,
    ) -> Result<Self, ConfigError> {
        if allowed.len() != alphabet.len() {
            return Err(ConfigError::RuleTableSize {
                expected: alphabet.len(),
                found: allowed.len(),
            });
        }

        let all = alphabet.all();
        for (tile, row) in alphabet.ids().zip(&allowed) {
            for d in Direction::ALL {
                let set = row[d.index()];
                if !set.is_subset_of(all) {
                    let stray = set.iter().find(|t| !all.contains(*t));
                    return Err(ConfigError::UnknownTile {
                        name: format!("#{}", stray.map(TileId::index).unwrap_or_default()),
                        context: format!(
                            "rule for '{}' {}",
                            alphabet.name(tile).unwrap_or("?"),
                            d.name()
                        ),
                    });
                }
            }
        }

        let rules = Self { allowed };
        rules.warn_asymmetries(alphabet);
        Ok(rules)
    }

    /// Build a table from tile names.
    ///
    /// Every tile needs an entry for every direction (an entry may list the
    /// whole alphabet). Unknown tile or direction names are rejected.
    pub fn from_named(alphabet: &TileAlphabet, named: &NamedRules) -> Result<Self, ConfigError> {
        for (tile_name, per_direction) in named {
            if alphabet.id(tile_name).is_none() {
                return Err(ConfigError::UnknownTile {
                    name: tile_name.clone(),
                    context: "rule table".to_string(),
                });
            }
            for dir_name in per_direction.keys() {
                if Direction::from_name(dir_name).is_none() {
                    return Err(ConfigError::UnknownDirection(dir_name.clone()));
                }
            }
        }

        let mut allowed = Vec::with_capacity(alphabet.len());
        for tile_name in alphabet.names() {
            let per_direction = named.get(tile_name);
            let mut row = [Possibilities::EMPTY; 4];

            for d in Direction::ALL {
                let neighbors = per_direction.and_then(|p| p.get(d.name())).ok_or_else(|| {
                    ConfigError::MissingRule {
                        tile: tile_name.clone(),
                        direction: d.name().to_string(),
                    }
                })?;

                for neighbor in neighbors {
                    let id = alphabet.id(neighbor).ok_or_else(|| ConfigError::UnknownTile {
                        name: neighbor.clone(),
                        context: format!("rule for '{}' {}", tile_name, d.name()),
                    })?;
                    row[d.index()].insert(id);
                }
            }
            allowed.push(row);
        }

        Self::new(alphabet, allowed)
    }

    /// Table in which every tile permits every tile in every direction.
    pub fn permissive(alphabet: &TileAlphabet) -> Self {
        Self {
            allowed: vec![[alphabet.all(); 4]; alphabet.len()],
        }
    }

    /// Tiles permitted next to `tile` in `direction`.
    #[inline]
    pub fn allowed(&self, tile: TileId, direction: Direction) -> Possibilities {
        self.allowed
            .get(tile.index())
            .map(|row| row[direction.index()])
            .unwrap_or(Possibilities::EMPTY)
    }

    /// Number of tile types the table covers.
    pub fn tile_count(&self) -> usize {
        self.allowed.len()
    }

    /// Whether `b` may sit in `direction` from `a`.
    pub fn permits(&self, a: TileId, direction: Direction, b: TileId) -> bool {
        self.allowed(a, direction).contains(b)
    }

    /// Pairs `(a, d, b)` where `a` permits `b` in `d` but `b` does not permit
    /// `a` in the opposite direction.
    pub fn asymmetries(&self) -> Vec<(TileId, Direction, TileId)> {
        let mut found = Vec::new();
        for a in (0..self.allowed.len()).filter_map(TileId::new) {
            for d in Direction::ALL {
                for b in self.allowed(a, d).iter() {
                    if !self.permits(b, d.opposite(), a) {
                        found.push((a, d, b));
                    }
                }
            }
        }
        found
    }

    fn warn_asymmetries(&self, alphabet: &TileAlphabet) {
        for (a, d, b) in self.asymmetries() {
            warn!(
                "asymmetric adjacency rule: '{}' permits '{}' {} but not the reverse",
                alphabet.name(a).unwrap_or("?"),
                alphabet.name(b).unwrap_or("?"),
                d.name()
            );
        }
    }
}
