use ndarray::Array2;
use std::ops::{Index, IndexMut};

use crate::{ALL_DIRECTIONS, Direction};

/// A neighbouring position, fully precomputed so callers never re-derive
/// geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbour {
    /// Neighbour x coordinate, already wrapped into range when wrapping is on.
    pub x: usize,
    /// Neighbour y coordinate.
    pub y: usize,
    /// Flat row-major index: `x + y * width`.
    pub index: usize,
    /// Direction travelled from the source cell to reach this neighbour.
    pub direction: Direction,
    /// Direction from the neighbour back to the source cell.
    pub opposite: Direction,
}

/// Dense 2-D storage with optional toroidal wraparound.
///
/// Row-major throughout: iteration runs y outer, x inner, and `(x, y)` sits
/// at flat index `x + y * width`. The iteration order is part of the
/// contract; initialisation noise is drawn in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<C> {
    width: usize,
    height: usize,
    wrap: bool,
    cells: Array2<C>,
}

impl<C> Grid<C> {
    /// Build a grid by calling `f(x, y)` for every position in row-major
    /// order.
    pub fn from_fn(
        width: usize,
        height: usize,
        wrap: bool,
        mut f: impl FnMut(usize, usize) -> C,
    ) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        let cells = Array2::from_shape_vec((height, width), cells)
            .expect("Failed to create cell array");
        Grid {
            width,
            height,
            wrap,
            cells,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether neighbour lookups wrap across the borders.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at `(x, y)`: coordinates are wrapped into range when wrapping
    /// is on, otherwise out-of-bounds lookups return `None`.
    pub fn get(&self, x: usize, y: usize) -> Option<&C> {
        let (x, y) = self.normalise(x, y)?;
        Some(&self.cells[(y, x)])
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut C> {
        let (x, y) = self.normalise(x, y)?;
        Some(&mut self.cells[(y, x)])
    }

    /// Store `value` at `(x, y)`. Returns false without writing when the
    /// position is out of bounds and wrapping is off.
    pub fn set(&mut self, x: usize, y: usize, value: C) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn normalise(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        if self.is_empty() {
            None
        } else if self.wrap {
            Some((x % self.width, y % self.height))
        } else if x < self.width && y < self.height {
            Some((x, y))
        } else {
            None
        }
    }

    /// Neighbour descriptors for the four cardinal directions, in canonical
    /// order. Out-of-bounds neighbours are omitted unless wrapping folds them
    /// into range, and empty grids have no neighbours at all.
    pub fn adjacent(&self, x: usize, y: usize) -> Vec<Neighbour> {
        if self.is_empty() {
            return Vec::new();
        }
        debug_assert!(
            x < self.width && y < self.height,
            "Source cell must be within the grid"
        );
        let mut neighbours = Vec::with_capacity(4);
        for direction in ALL_DIRECTIONS {
            let (dx, dy) = direction.offset();
            if let Some((nx, ny)) = self.step(x, y, dx, dy) {
                neighbours.push(Neighbour {
                    x: nx,
                    y: ny,
                    index: nx + ny * self.width,
                    direction,
                    opposite: direction.opposite(),
                });
            }
        }
        neighbours
    }

    fn step(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if self.wrap {
            Some((
                nx.rem_euclid(self.width as isize) as usize,
                ny.rem_euclid(self.height as isize) as usize,
            ))
        } else if nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    }

    /// Row-major iteration over `((x, y), cell)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &C)> {
        self.cells
            .indexed_iter()
            .map(|((y, x), cell)| ((x, y), cell))
    }
}

impl<C> Index<(usize, usize)> for Grid<C> {
    type Output = C;

    /// Panicking access by `(x, y)`; callers must stay in bounds.
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.cells[(y, x)]
    }
}

impl<C> IndexMut<(usize, usize)> for Grid<C> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.cells[(y, x)]
    }
}
