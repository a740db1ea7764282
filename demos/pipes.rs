use anyhow::Result;
use clap::Parser;
use wave_collapse::{Catalog, Sockets, Tile, WaveFunction};

/// Collapse a grid of box-drawing pipes and print it to stdout.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    /// Grid width in cells.
    #[arg(long, default_value_t = 48)]
    width: usize,
    /// Grid height in cells.
    #[arg(long, default_value_t = 16)]
    height: usize,
    /// Seed for the random stream; drawn from process entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Wrap the grid into a torus.
    #[arg(long)]
    wrap: bool,
    /// Grid regenerations allowed before giving up.
    #[arg(long)]
    max_restarts: Option<u64>,
}

const WALL: u8 = 0;
const OPEN: u8 = 1;

/// Pipe segments with matching open and walled edges.
fn pipes() -> Vec<Tile<char, u8>> {
    vec![
        Tile::weighted(' ', Sockets::new(WALL, WALL, WALL, WALL), 4.0),
        Tile::weighted('─', Sockets::new(WALL, OPEN, WALL, OPEN), 1.5),
        Tile::weighted('│', Sockets::new(OPEN, WALL, OPEN, WALL), 1.5),
        Tile::new('└', Sockets::new(OPEN, OPEN, WALL, WALL)),
        Tile::new('┌', Sockets::new(WALL, OPEN, OPEN, WALL)),
        Tile::new('┐', Sockets::new(WALL, WALL, OPEN, OPEN)),
        Tile::new('┘', Sockets::new(OPEN, WALL, WALL, OPEN)),
        Tile::weighted('┼', Sockets::new(OPEN, OPEN, OPEN, OPEN), 0.5),
    ]
}

fn main() -> Result<()> {
    let config = Config::parse();

    let catalog = Catalog::new(pipes())?;
    let mut wave =
        WaveFunction::new(&catalog, config.width, config.height)?.with_wrap(config.wrap);
    if let Some(seed) = config.seed {
        wave = wave.with_seed(seed);
    }
    if let Some(budget) = config.max_restarts {
        wave = wave.with_max_restarts(budget);
    }

    let tiling = wave.run()?;
    print!("{tiling}");
    eprintln!("({} restarts)", wave.restarts());

    Ok(())
}
