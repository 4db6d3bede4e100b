//! Generates a landscape map and prints it as text.
//!
//! Usage: `wave_landscape [generator.json]`
//!
//! Without a config file the built-in 20x15 landscape is generated from an
//! entropy seed. Set `RUST_LOG=debug` for per-run details.

use bevy_log::tracing_subscriber::{self, EnvFilter};
use bevy_log::{error, info};
use landscape_wfc::{
    decorate, generate, load_config, save_grid, Decoration, GeneratorConfig, Grid, GridSnapshot,
    StdRandom, TileAlphabet, WfcRng,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let (config, base_dir) = match &config_path {
        Some(path) => {
            info!("loading config from {}", path.display());
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (load_config(path)?, base)
        }
        None => (GeneratorConfig::default(), PathBuf::new()),
    };

    let tileset = config.load_tileset(&base_dir)?;
    let solver_config = config.solver_config(&tileset)?;
    let seed = config
        .seed
        .unwrap_or_else(|| StdRandom::from_entropy().next_u64());
    info!(
        "generating {}x{} grid with {} tiles (seed {})",
        config.width,
        config.height,
        tileset.alphabet.len(),
        seed
    );

    let generated = generate(
        &tileset,
        &solver_config,
        seed,
        config.attempts,
        config.max_steps,
    )?;

    let mut decoration_rng = StdRandom::from_u64_seed(generated.seed);
    let decorations = decorate(&generated.grid, &tileset.decorations, &mut decoration_rng);
    info!("placed {} decorations", decorations.len());

    print!(
        "{}",
        render_text(&generated.grid, &tileset.alphabet, &decorations)
    );

    if let Some(output) = &config.output {
        let path = base_dir.join(output);
        let snapshot = GridSnapshot::from_grid(&generated.grid, &tileset.alphabet)?;
        save_grid(&snapshot, &path)?;
        info!("saved grid to {}", path.display());
    }

    Ok(())
}

/// One character per cell: the tile glyph, or the decoration's initial in
/// upper case where one was placed.
fn render_text(grid: &Grid, alphabet: &TileAlphabet, decorations: &[Decoration]) -> String {
    let glyphs = tile_glyphs(alphabet);
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());

    for (at, cell) in grid.iter() {
        let glyph = match decorations.iter().find(|d| d.at == at) {
            Some(d) => d
                .decoration
                .chars()
                .next()
                .map_or('?', |c| c.to_ascii_uppercase()),
            None => cell.tile().map_or('?', |t| glyphs[t.index()]),
        };
        out.push(glyph);
        if at.x + 1 == grid.width() {
            out.push('\n');
        }
    }

    out
}

/// Distinct lower-case glyph per tile: the first letter of its name not
/// already taken, or a digit.
fn tile_glyphs(alphabet: &TileAlphabet) -> Vec<char> {
    let mut glyphs: Vec<char> = Vec::with_capacity(alphabet.len());
    for (i, name) in alphabet.names().iter().enumerate() {
        let glyph = name
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .find(|c| c.is_ascii_alphabetic() && !glyphs.contains(c))
            .or_else(|| char::from_digit((i % 10) as u32, 10))
            .unwrap_or('?');
        glyphs.push(glyph);
    }
    glyphs
}
