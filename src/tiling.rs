use std::fmt::{Display, Formatter};

use crate::{Catalog, Grid};

/// A fully-determined grid: every cell resolved to one tile of the catalog.
///
/// Holds the resolved tile indices plus a reference to the catalog that
/// produced them, so payload values read back by coordinate.
pub struct Tiling<'c, T, S> {
    catalog: &'c Catalog<T, S>,
    indices: Grid<usize>,
    restarts: u64,
}

impl<'c, T, S> Tiling<'c, T, S> {
    pub(crate) fn new(catalog: &'c Catalog<T, S>, indices: Grid<usize>, restarts: u64) -> Self {
        Tiling {
            catalog,
            indices,
            restarts,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.indices.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.indices.height()
    }

    /// Grid regenerations the producing run went through.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// The resolved tile index at `(x, y)`.
    pub fn tile_index(&self, x: usize, y: usize) -> usize {
        self.indices[(x, y)]
    }

    /// The resolved payload value at `(x, y)`.
    pub fn value(&self, x: usize, y: usize) -> &'c T {
        &self.catalog.tile(self.indices[(x, y)]).value
    }

    /// The resolved tile indices, row-major.
    pub fn indices(&self) -> &Grid<usize> {
        &self.indices
    }

    /// Row-major iteration over `(x, y, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &'c T)> {
        let catalog = self.catalog;
        self.indices
            .iter()
            .map(move |((x, y), &index)| (x, y, &catalog.tile(index).value))
    }
}

/// Concatenates cell values in row-major order, one text line per grid row.
impl<T: Display, S> Display for Tiling<'_, T, S> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", self.value(x, y))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sockets, Tile};

    fn catalog() -> Catalog<char, u8> {
        Catalog::new(vec![
            Tile::new('a', Sockets::uniform(0)),
            Tile::new('b', Sockets::uniform(0)),
        ])
        .unwrap()
    }

    #[test]
    fn values_read_back_by_coordinate() {
        let catalog = catalog();
        let indices = Grid::from_fn(2, 2, false, |x, y| usize::from((x + y) % 2 == 1));
        let tiling = Tiling::new(&catalog, indices, 3);
        assert_eq!(*tiling.value(0, 0), 'a');
        assert_eq!(*tiling.value(1, 0), 'b');
        assert_eq!(tiling.tile_index(0, 1), 1);
        assert_eq!(tiling.restarts(), 3);
    }

    #[test]
    fn display_breaks_rows_at_the_grid_width() {
        let catalog = catalog();
        let indices = Grid::from_fn(3, 2, false, |x, _| usize::from(x == 2));
        let tiling = Tiling::new(&catalog, indices, 0);
        assert_eq!(tiling.to_string(), "aab\naab\n");
    }

    #[test]
    fn iteration_is_row_major() {
        let catalog = catalog();
        let indices = Grid::from_fn(2, 2, false, |x, _| x);
        let tiling = Tiling::new(&catalog, indices, 0);
        let coords: Vec<(usize, usize)> = tiling.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        let values: String = tiling.iter().map(|(_, _, &value)| value).collect();
        assert_eq!(values, "abab");
    }
}
