use rayon::prelude::*;

use crate::{Catalog, Tiling, WaveError, WaveFunction};

/// Race one engine per seed across the thread pool and keep whichever tiling
/// finishes first.
///
/// Each engine is independent and single-threaded; only whole runs race. Every
/// engine gets the same `max_restarts` budget, so a seed that keeps
/// contradicting bows out instead of searching forever. Returns `Ok(None)`
/// when every seed exhausts its budget. When several seeds succeed, which
/// tiling is kept depends on thread timing.
pub fn race_seeds<'c, T, S>(
    catalog: &'c Catalog<T, S>,
    width: usize,
    height: usize,
    wrap: bool,
    seeds: impl IntoParallelIterator<Item = u64>,
    max_restarts: u64,
) -> Result<Option<Tiling<'c, T, S>>, WaveError>
where
    T: Sync,
    S: Sync,
{
    // Surface configuration problems once, before fanning out.
    WaveFunction::new(catalog, width, height)?;
    Ok(seeds.into_par_iter().find_map_any(|seed| {
        let mut wave = WaveFunction::new(catalog, width, height)
            .ok()?
            .with_wrap(wrap)
            .with_seed(seed)
            .with_max_restarts(max_restarts);
        wave.run().ok()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sockets, Tile};

    fn uniform(value: char) -> Tile<char, u8> {
        Tile::new(value, Sockets::uniform(0))
    }

    #[test]
    fn racing_returns_a_complete_tiling() {
        let catalog = Catalog::new(vec![uniform('a'), uniform('b')]).unwrap();
        let tiling = race_seeds(&catalog, 6, 4, false, 0..8u64, 4)
            .unwrap()
            .expect("an unconstrained catalog collapses on any seed");
        assert_eq!(tiling.width(), 6);
        assert_eq!(tiling.height(), 4);
        for (x, y, _) in tiling.iter() {
            assert!(x < 6 && y < 4);
        }
    }

    #[test]
    fn racing_an_unsatisfiable_catalog_yields_none() {
        let catalog = Catalog::new(vec![
            Tile::new('x', Sockets::new(9, 1, 9, 2)),
            Tile::new('y', Sockets::new(9, 3, 9, 4)),
        ])
        .unwrap();
        let outcome = race_seeds(&catalog, 2, 1, false, 0..8u64, 2).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn racing_a_zero_area_grid_is_refused() {
        let catalog = Catalog::new(vec![uniform('a')]).unwrap();
        assert!(race_seeds(&catalog, 0, 4, false, 0..8u64, 2).is_err());
    }
}
