use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use wave_collapse::{Catalog, WaveFunction, race_seeds};

/// Grow river terrain from a YAML tile catalog.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    /// Path to a YAML tile catalog; the built-in river set when omitted.
    #[arg(long)]
    catalog: Option<String>,
    /// Grid width in cells.
    #[arg(long, default_value_t = 60)]
    width: usize,
    /// Grid height in cells.
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Seed of the first sample; each further sample advances it by one.
    #[arg(long, default_value_t = 2024)]
    seed: u64,
    /// Number of tilings to generate; the last one is printed.
    #[arg(long, default_value_t = 1)]
    samples: u64,
    /// Race this many seeds across the thread pool instead of sampling.
    #[arg(long)]
    race: Option<u64>,
    /// Grid regenerations allowed per run.
    #[arg(long, default_value_t = 64)]
    max_restarts: u64,
}

fn main() -> Result<()> {
    let config = Config::parse();

    let source = match &config.catalog {
        Some(path) => fs::read_to_string(path)?,
        None => include_str!("terrain.yaml").to_owned(),
    };
    let catalog: Catalog<String, String> = Catalog::from_yaml_str(&source)?;

    if let Some(entrants) = config.race {
        let seeds = config.seed..config.seed + entrants;
        let outcome = race_seeds(
            &catalog,
            config.width,
            config.height,
            false,
            seeds,
            config.max_restarts,
        )?;
        match outcome {
            Some(tiling) => print!("{tiling}"),
            None => eprintln!("no entrant finished within {} restarts", config.max_restarts),
        }
        return Ok(());
    }

    let bar = ProgressBar::new(config.samples);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut wave = WaveFunction::new(&catalog, config.width, config.height)?
        .with_max_restarts(config.max_restarts);
    let mut restarts = 0;
    let mut last = None;
    for seed in config.seed..config.seed + config.samples {
        wave.reseed(seed);
        last = Some(wave.run()?);
        restarts += wave.restarts();
        bar.inc(1);
    }
    bar.finish_with_message(format!("{restarts} restarts"));

    if let Some(tiling) = last {
        print!("{tiling}");
    }

    Ok(())
}
