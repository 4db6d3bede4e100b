//! Generator configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid config that generates the
//! 20x15 landscape.

use crate::error::ConfigError;
use crate::grid::Coord;
use crate::solver::SolverConfig;
use crate::tileset::{Tileset, TilesetConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a generation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Start cell `[x, y]`; the grid centre when absent.
    pub start: Option<[usize; 2]>,
    /// Force the start cell to this tile name.
    pub start_tile: Option<String>,
    /// Master seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Fresh runs to try before giving up.
    pub attempts: usize,
    /// Step cap per run.
    pub max_steps: Option<usize>,
    /// Tileset JSON file; the built-in landscape when absent.
    pub tileset: Option<PathBuf>,
    /// Where to save the finished grid (`.json` or binary).
    pub output: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            start: None,
            start_tile: None,
            seed: None,
            attempts: 10,
            max_steps: None,
            tileset: None,
            output: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured tileset, or the built-in landscape.
    ///
    /// A relative tileset path is resolved against `base_dir`.
    pub fn load_tileset(&self, base_dir: &Path) -> Result<Tileset, ConfigError> {
        let config = match &self.tileset {
            Some(path) => TilesetConfig::load(base_dir.join(path))?,
            None => TilesetConfig::landscape(),
        };
        config.build()
    }

    /// Resolve names against `tileset` and produce solver settings.
    pub fn solver_config(&self, tileset: &Tileset) -> Result<SolverConfig, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let mut config = SolverConfig::new(self.width, self.height);

        if let Some([x, y]) = self.start {
            if x >= self.width || y >= self.height {
                return Err(ConfigError::OutOfBounds {
                    x,
                    y,
                    width: self.width,
                    height: self.height,
                });
            }
            config = config.with_start(Coord::new(x, y));
        }

        if let Some(name) = &self.start_tile {
            let tile = tileset
                .alphabet
                .id(name)
                .ok_or_else(|| ConfigError::UnknownTile {
                    name: name.clone(),
                    context: "start_tile".to_string(),
                })?;
            config = config.with_start_tile(tile);
        }

        Ok(config)
    }
}

/// Read a generator config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    GeneratorConfig::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!((config.width, config.height), (20, 15));
        assert_eq!(config.attempts, 10);
    }

    #[test]
    fn test_solver_config_resolves_start() {
        let tileset = TilesetConfig::landscape().build().unwrap();
        let config = GeneratorConfig::from_json(
            r#"{ "width": 8, "height": 4, "start": [1, 2], "start_tile": "snow" }"#,
        )
        .unwrap();

        let solver = config.solver_config(&tileset).unwrap();
        assert_eq!(solver.width, 8);
        assert_eq!(solver.start_coord(), Coord::new(1, 2));
        assert_eq!(solver.start_tile, tileset.alphabet.id("snow"));
    }

    #[test]
    fn test_solver_config_rejects_bad_values() {
        let tileset = TilesetConfig::landscape().build().unwrap();

        let config = GeneratorConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.solver_config(&tileset),
            Err(ConfigError::InvalidDimensions { .. })
        ));

        let config = GeneratorConfig {
            start: Some([20, 0]),
            ..Default::default()
        };
        assert!(matches!(
            config.solver_config(&tileset),
            Err(ConfigError::OutOfBounds { x: 20, .. })
        ));

        let config = GeneratorConfig {
            start_tile: Some("lava".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.solver_config(&tileset),
            Err(ConfigError::UnknownTile { .. })
        ));
    }

    #[test]
    fn test_load_config_and_tileset_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let tileset_json = serde_json::to_string(&TilesetConfig::landscape()).unwrap();
        std::fs::write(dir.path().join("terrain.json"), tileset_json).unwrap();

        let config_path = dir.path().join("generator.json");
        let mut file = std::fs::File::create(&config_path).unwrap();
        write!(file, r#"{{ "width": 6, "tileset": "terrain.json", "seed": 9 }}"#).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, 15);
        assert_eq!(config.seed, Some(9));

        let tileset = config.load_tileset(dir.path()).unwrap();
        assert_eq!(tileset.alphabet.len(), 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/generator.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
