//! Tileset definitions: alphabet, adjacency rules and decorations.
//!
//! Tilesets are plain JSON:
//!
//! ```json
//! {
//!   "tiles": ["water", "sand"],
//!   "allowed": {
//!     "water": { "up": ["water", "sand"], "down": ["water", "sand"],
//!                "left": ["water", "sand"], "right": ["water", "sand"] },
//!     "sand":  { "up": ["water", "sand"], "down": ["water", "sand"],
//!                "left": ["water", "sand"], "right": ["water", "sand"] }
//!   },
//!   "decorations": [{ "tile": "sand", "decoration": "cactus", "probability": 0.1 }]
//! }
//! ```

use crate::decoration::DecorationRule;
use crate::direction::Direction;
use crate::error::ConfigError;
use crate::rules::{AdjacencyRules, NamedRules};
use crate::tile::TileAlphabet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Decoration entry as written in a tileset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationConfig {
    pub tile: String,
    pub decoration: String,
    pub probability: f64,
}

/// Serializable tileset description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetConfig {
    /// Tile names; order fixes the tile ids.
    pub tiles: Vec<String>,
    /// `tile -> direction -> allowed neighbor tiles`
    pub allowed: NamedRules,
    #[serde(default)]
    pub decorations: Vec<DecorationConfig>,
}

/// Validated tileset ready for solving.
#[derive(Debug, Clone)]
pub struct Tileset {
    pub alphabet: TileAlphabet,
    pub rules: AdjacencyRules,
    pub decorations: Vec<DecorationRule>,
}

impl TilesetConfig {
    /// Five-terrain landscape: water, sand, grass, mountain, snow.
    ///
    /// Each terrain borders itself and its neighbors in that chain, in every
    /// direction. Snow carries snowmen, grass trees and sand cacti.
    pub fn landscape() -> Self {
        let chain: [(&str, &[&str]); 5] = [
            ("water", &["water", "sand"]),
            ("sand", &["water", "sand", "grass"]),
            ("grass", &["sand", "grass", "mountain"]),
            ("mountain", &["grass", "mountain", "snow"]),
            ("snow", &["mountain", "snow"]),
        ];

        let mut allowed = NamedRules::new();
        for (tile, neighbors) in chain {
            let neighbors: Vec<String> = neighbors.iter().map(|s| s.to_string()).collect();
            let per_direction: BTreeMap<String, Vec<String>> = Direction::ALL
                .iter()
                .map(|d| (d.name().to_string(), neighbors.clone()))
                .collect();
            allowed.insert(tile.to_string(), per_direction);
        }

        let decoration = |tile: &str, decoration: &str, probability: f64| DecorationConfig {
            tile: tile.to_string(),
            decoration: decoration.to_string(),
            probability,
        };

        Self {
            tiles: chain.iter().map(|(tile, _)| tile.to_string()).collect(),
            allowed,
            decorations: vec![
                decoration("snow", "snowman", 0.1),
                decoration("grass", "tree", 0.3),
                decoration("sand", "cactus", 0.1),
            ],
        }
    }

    /// Parse a tileset from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a tileset JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate names and build the alphabet, rule table and decoration rules.
    pub fn build(&self) -> Result<Tileset, ConfigError> {
        let alphabet = TileAlphabet::new(self.tiles.iter().cloned())?;
        let rules = AdjacencyRules::from_named(&alphabet, &self.allowed)?;

        let mut decorations = Vec::with_capacity(self.decorations.len());
        for entry in &self.decorations {
            let tile = alphabet
                .id(&entry.tile)
                .ok_or_else(|| ConfigError::UnknownTile {
                    name: entry.tile.clone(),
                    context: "decorations".to_string(),
                })?;
            if !(0.0..=1.0).contains(&entry.probability) {
                return Err(ConfigError::InvalidProbability {
                    tile: entry.tile.clone(),
                    probability: entry.probability,
                });
            }
            decorations.push(DecorationRule::new(
                tile,
                entry.decoration.clone(),
                entry.probability,
            ));
        }

        Ok(Tileset {
            alphabet,
            rules,
            decorations,
        })
    }
}
