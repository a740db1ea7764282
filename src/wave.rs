use fixedbitset::FixedBitSet;
use log::debug;
use thiserror::Error;

use crate::cell::Restriction;
use crate::{Catalog, Cell, Grid, SeededRng, Tiling};

/// Scale of the per-cell noise folded into freshly initialised entropies.
/// Orders of magnitude below any real entropy difference; it only breaks
/// exact ties.
const ENTROPY_NOISE: f64 = 1e-12;

/// Why a run or engine construction failed outright.
///
/// Local inconsistencies are not represented here: the engine recovers from
/// them automatically by regenerating the grid.
#[derive(Debug, Error)]
pub enum WaveError {
    /// The requested grid has no cells.
    #[error("grid dimensions {width}x{height} enclose no cells")]
    ZeroAreaGrid {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The configured restart budget ran out before a consistent grid formed.
    #[error("no consistent grid found within {budget} restarts")]
    RestartBudgetExceeded {
        /// The configured budget.
        budget: u64,
    },
}

/// Where a local inconsistency was detected. Internal only; recovery is
/// automatic.
#[derive(Clone, Copy, Debug)]
struct Contradiction {
    x: usize,
    y: usize,
}

/// Completion state of a working grid.
enum Completion {
    /// Every cell is resolved.
    Done,
    /// At least one cell is still open.
    Open,
    /// An open cell has run out of admissible tiles.
    Broken(Contradiction),
}

/// The collapse engine: repeatedly fixes the most-certain cell and propagates
/// the consequences until the whole grid is resolved.
///
/// Strictly single-threaded. For parallel search, race independently seeded
/// instances over a shared catalog; see [`race_seeds`](crate::race_seeds).
pub struct WaveFunction<'c, T, S> {
    catalog: &'c Catalog<T, S>,
    width: usize,
    height: usize,
    wrap: bool,
    rng: SeededRng,
    max_restarts: Option<u64>,
    restarts: u64,
}

impl<'c, T, S> WaveFunction<'c, T, S> {
    /// An engine over `catalog` for a `width` by `height` grid.
    ///
    /// Defaults: hard borders, a seed drawn from the process entropy source,
    /// and no restart budget.
    pub fn new(
        catalog: &'c Catalog<T, S>,
        width: usize,
        height: usize,
    ) -> Result<Self, WaveError> {
        if width == 0 || height == 0 {
            return Err(WaveError::ZeroAreaGrid { width, height });
        }
        Ok(WaveFunction {
            catalog,
            width,
            height,
            wrap: false,
            rng: SeededRng::from_entropy(),
            max_restarts: None,
            restarts: 0,
        })
    }

    /// Treat the grid as a torus: neighbours wrap across the borders.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Key the random stream; identical seeds reproduce identical runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SeededRng::new(seed);
        self
    }

    /// Fail a run after this many grid regenerations instead of retrying
    /// forever. Without a budget, an unsatisfiable catalog restarts without
    /// bound.
    pub fn with_max_restarts(mut self, budget: u64) -> Self {
        self.max_restarts = Some(budget);
        self
    }

    /// Re-key the random stream in place; the next run starts from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the grid wraps across its borders.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Grid regenerations performed by the most recent run.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Collapse a fresh grid into a fully-determined tiling.
    ///
    /// Loops selection, collapse, and propagation until every cell resolves.
    /// A contradiction discards the grid and starts over on the continuing
    /// random stream; the seed is never reset implicitly. Fails only when a
    /// restart budget is configured and exhausted.
    pub fn run(&mut self) -> Result<Tiling<'c, T, S>, WaveError> {
        self.restarts = 0;
        let mut grid = self.empty_grid();
        loop {
            match Self::completion(&grid) {
                Completion::Done => break,
                Completion::Broken(at) => self.restart(&mut grid, at)?,
                Completion::Open => {
                    let Some((x, y)) = Self::lowest_entropy(&grid) else {
                        // No open cell left; the completion check ends the loop.
                        continue;
                    };
                    if let Err(at) = self.collapse_at(&mut grid, x, y) {
                        self.restart(&mut grid, at)?;
                    }
                }
            }
        }
        debug!("grid collapsed after {} restarts", self.restarts);
        let indices = Grid::from_fn(self.width, self.height, self.wrap, |x, y| {
            grid[(x, y)]
                .resolved()
                .expect("Every cell must be resolved after completion")
        });
        Ok(Tiling::new(self.catalog, indices, self.restarts))
    }

    /// A fresh working grid: every tile admissible everywhere, entropies
    /// seeded with row-major tie-breaking noise from the shared stream.
    fn empty_grid(&mut self) -> Grid<Cell> {
        let options = self.catalog.full_set();
        let entropy = self.catalog.total_entropy();
        let weight_sum = self.catalog.total_weight();
        let rng = &mut self.rng;
        Grid::from_fn(self.width, self.height, self.wrap, |_, _| {
            Cell::open(
                options.clone(),
                entropy + rng.next_float(ENTROPY_NOISE),
                weight_sum,
            )
        })
    }

    /// Scan every cell once: complete, still open, or broken by a cell whose
    /// admissible set emptied without being caught during propagation.
    fn completion(grid: &Grid<Cell>) -> Completion {
        let mut open = false;
        for ((x, y), cell) in grid.iter() {
            if cell.is_collapsed() {
                continue;
            }
            if cell.options().is_clear() {
                return Completion::Broken(Contradiction { x, y });
            }
            open = true;
        }
        if open { Completion::Open } else { Completion::Done }
    }

    /// Row-major scan for the strictly smallest entropy; the earliest cell
    /// wins exact ties. Collapsed cells carry infinite entropy and never win.
    fn lowest_entropy(grid: &Grid<Cell>) -> Option<(usize, usize)> {
        let mut best = f64::INFINITY;
        let mut coordinates = None;
        for ((x, y), cell) in grid.iter() {
            if cell.entropy() < best {
                best = cell.entropy();
                coordinates = Some((x, y));
            }
        }
        coordinates
    }

    /// Resolve the cell at `(x, y)` by a weighted draw over its admissible
    /// tiles, then propagate the consequences.
    fn collapse_at(
        &mut self,
        grid: &mut Grid<Cell>,
        x: usize,
        y: usize,
    ) -> Result<(), Contradiction> {
        let cell = &grid[(x, y)];
        let mut remaining = self.rng.next_float(cell.weight_sum());
        let mut selected = None;
        for tile in cell.options().ones() {
            selected = Some(tile);
            remaining -= self.catalog.weights()[tile];
            if remaining < 0.0 {
                break;
            }
        }
        // Rounding can leave the draw non-negative after the last weight; the
        // walk then ends on the final candidate.
        let Some(tile) = selected else {
            return Err(Contradiction { x, y });
        };
        grid[(x, y)].collapse_to(tile);
        self.propagate(grid, x, y)
    }

    /// Re-establish local consistency outward from `(start_x, start_y)`.
    ///
    /// A LIFO stack holds coordinates whose neighbours need re-checking. Each
    /// neighbour's admissible set is intersected with the tiles the source
    /// cell still supports in that direction; strict shrinks are pushed in
    /// turn, and a set shrinking to one tile collapses on the spot. An
    /// emptied set, or two collapsed cells whose sockets disagree, aborts the
    /// pass as a contradiction.
    fn propagate(
        &self,
        grid: &mut Grid<Cell>,
        start_x: usize,
        start_y: usize,
    ) -> Result<(), Contradiction> {
        let mut stack = vec![(start_x, start_y)];
        let mut combined = FixedBitSet::with_capacity(self.catalog.len());
        while let Some((x, y)) = stack.pop() {
            for neighbour in grid.adjacent(x, y) {
                let source = grid[(x, y)].resolved();
                let target = &grid[(neighbour.x, neighbour.y)];
                if let (Some(tile), Some(other)) = (source, target.resolved()) {
                    if !self.catalog.adjacent(tile, neighbour.direction).contains(other) {
                        return Err(Contradiction { x, y });
                    }
                    continue;
                }
                if target.is_collapsed() {
                    continue;
                }
                let support: &FixedBitSet = match source {
                    Some(tile) => self.catalog.adjacent(tile, neighbour.direction),
                    None => {
                        combined.clear();
                        for tile in grid[(x, y)].options().ones() {
                            combined.union_with(self.catalog.adjacent(tile, neighbour.direction));
                        }
                        &combined
                    }
                };
                let target = &mut grid[(neighbour.x, neighbour.y)];
                match target.restrict(
                    support,
                    self.catalog.weights(),
                    self.catalog.contributions(),
                ) {
                    Restriction::Unchanged => {}
                    Restriction::Emptied => {
                        return Err(Contradiction {
                            x: neighbour.x,
                            y: neighbour.y,
                        });
                    }
                    Restriction::Single(tile) => {
                        target.collapse_to(tile);
                        stack.push((neighbour.x, neighbour.y));
                    }
                    Restriction::Reduced => stack.push((neighbour.x, neighbour.y)),
                }
            }
        }
        Ok(())
    }

    /// Discard the grid and start over on the continuing random stream,
    /// unless that would overrun the restart budget.
    fn restart(&mut self, grid: &mut Grid<Cell>, at: Contradiction) -> Result<(), WaveError> {
        if let Some(budget) = self.max_restarts {
            if self.restarts >= budget {
                return Err(WaveError::RestartBudgetExceeded { budget });
            }
        }
        self.restarts += 1;
        debug!(
            "contradiction at ({}, {}); regenerating grid (restart {})",
            at.x, at.y, self.restarts
        );
        *grid = self.empty_grid();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sockets, Tile};

    fn tile(value: char, sockets: [u8; 4], weight: f64) -> Tile<char, u8> {
        Tile::weighted(
            value,
            Sockets::new(sockets[0], sockets[1], sockets[2], sockets[3]),
            weight,
        )
    }

    /// Two tiles that force strict alternation in both axes.
    fn checkerboard() -> Catalog<char, u8> {
        Catalog::new(vec![
            tile('a', [0, 1, 2, 3], 1.0),
            tile('b', [2, 3, 0, 1], 1.0),
        ])
        .unwrap()
    }

    /// Two tiles with no legal horizontal pairing at all.
    fn horizontally_incompatible() -> Catalog<char, u8> {
        Catalog::new(vec![
            tile('x', [9, 1, 9, 2], 1.0),
            tile('y', [9, 3, 9, 4], 1.0),
        ])
        .unwrap()
    }

    /// Three interchangeable tiles with identical weights.
    fn uniform_trio() -> Catalog<char, u8> {
        Catalog::new(vec![
            tile('a', [0, 0, 0, 0], 0.5),
            tile('b', [0, 0, 0, 0], 0.5),
            tile('c', [0, 0, 0, 0], 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn zero_area_grids_are_refused() {
        let catalog = checkerboard();
        assert!(matches!(
            WaveFunction::new(&catalog, 0, 3),
            Err(WaveError::ZeroAreaGrid {
                width: 0,
                height: 3
            })
        ));
        assert!(matches!(
            WaveFunction::new(&catalog, 3, 0),
            Err(WaveError::ZeroAreaGrid { .. })
        ));
    }

    #[test]
    fn a_zero_budget_fails_on_the_first_contradiction() {
        let catalog = horizontally_incompatible();
        let mut wave = WaveFunction::new(&catalog, 2, 1)
            .unwrap()
            .with_seed(5)
            .with_max_restarts(0);
        assert!(matches!(
            wave.run(),
            Err(WaveError::RestartBudgetExceeded { budget: 0 })
        ));
        assert_eq!(wave.restarts(), 0);
    }

    #[test]
    fn fresh_grids_replay_noise_per_seed() {
        let catalog = checkerboard();
        let mut first = WaveFunction::new(&catalog, 4, 3).unwrap().with_seed(11);
        let mut second = WaveFunction::new(&catalog, 4, 3).unwrap().with_seed(11);
        let a = first.empty_grid();
        let b = second.empty_grid();
        for (coords, cell) in a.iter() {
            let twin = &b[coords];
            assert!((cell.entropy() - twin.entropy()).abs() < f64::EPSILON);
            assert!(cell.entropy() >= catalog.total_entropy());
            assert!(cell.entropy() < catalog.total_entropy() + ENTROPY_NOISE);
        }
    }

    #[test]
    fn collapsing_one_cell_forces_its_neighbours() {
        let catalog = checkerboard();
        let mut wave = WaveFunction::new(&catalog, 3, 1).unwrap().with_seed(2);
        let mut grid = wave.empty_grid();
        wave.collapse_at(&mut grid, 1, 0).unwrap();
        let centre = grid[(1, 0)].resolved().unwrap();
        assert_eq!(grid[(0, 0)].resolved(), Some(1 - centre));
        assert_eq!(grid[(2, 0)].resolved(), Some(1 - centre));
    }

    #[test]
    fn collapse_detects_immediate_contradictions() {
        let catalog = horizontally_incompatible();
        let mut wave = WaveFunction::new(&catalog, 2, 1).unwrap().with_seed(1);
        let mut grid = wave.empty_grid();
        assert!(wave.collapse_at(&mut grid, 0, 0).is_err());
    }

    #[test]
    fn reduced_cells_win_the_entropy_scan() {
        let catalog = uniform_trio();
        let mut wave = WaveFunction::new(&catalog, 3, 3).unwrap().with_seed(8);
        let mut grid = wave.empty_grid();
        let mut mask = catalog.full_set();
        mask.remove(2);
        grid[(1, 1)].restrict(&mask, catalog.weights(), catalog.contributions());
        assert_eq!(WaveFunction::<char, u8>::lowest_entropy(&grid), Some((1, 1)));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn the_earliest_cell_wins_an_exact_entropy_tie() {
        let catalog = uniform_trio();
        let mut wave = WaveFunction::new(&catalog, 3, 3).unwrap().with_seed(8);
        let mut grid = wave.empty_grid();
        let mut mask = catalog.full_set();
        mask.remove(2);
        // Restriction recomputes entropy without initialisation noise, so
        // cells cut to the same set tie exactly.
        grid[(2, 1)].restrict(&mask, catalog.weights(), catalog.contributions());
        grid[(1, 0)].restrict(&mask, catalog.weights(), catalog.contributions());
        assert_eq!(grid[(2, 1)].entropy(), grid[(1, 0)].entropy());
        assert_eq!(WaveFunction::<char, u8>::lowest_entropy(&grid), Some((1, 0)));
    }
}
