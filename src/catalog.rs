use fixedbitset::FixedBitSet;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{ALL_DIRECTIONS, Direction, Tile};

/// Why a tile list was rejected at catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The tile list was empty.
    #[error("tile catalog is empty")]
    Empty,
    /// A tile's weight was zero, negative, or not finite.
    #[error("tile {index} has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Position of the offending tile in the input list.
        index: usize,
        /// The rejected weight.
        weight: f64,
    },
    /// A catalog file failed to parse.
    #[error("malformed tile catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A validated tile list with its adjacency compiled into bit masks.
///
/// `adjacent(t, d)` holds every tile whose `d.opposite()` socket equals tile
/// `t`'s `d` socket. The table is built once here; the collapse loop never
/// compares raw sockets again. Tiles are addressed by their index in the
/// input list, and weighted selection walks that order, so catalog order is
/// part of a run's identity.
#[derive(Debug)]
pub struct Catalog<T, S> {
    tiles: Vec<Tile<T, S>>,
    adjacent: Vec<[FixedBitSet; 4]>,
    weights: Vec<f64>,
    contributions: Vec<f64>,
    total_weight: f64,
    total_entropy: f64,
}

impl<T, S: PartialEq> Catalog<T, S> {
    /// Validate `tiles` and compile the adjacency table.
    ///
    /// Costs one socket comparison per tile pair per direction; everything
    /// downstream is bit operations.
    pub fn new(tiles: Vec<Tile<T, S>>) -> Result<Self, CatalogError> {
        if tiles.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, tile) in tiles.iter().enumerate() {
            if tile.weight <= 0.0 || !tile.weight.is_finite() {
                return Err(CatalogError::NonPositiveWeight {
                    index,
                    weight: tile.weight,
                });
            }
        }

        let n = tiles.len();
        let mut adjacent = Vec::with_capacity(n);
        for tile in &tiles {
            let mut rows = [
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
                FixedBitSet::with_capacity(n),
            ];
            for (u, candidate) in tiles.iter().enumerate() {
                for direction in ALL_DIRECTIONS {
                    if tile.sockets.fits(direction, &candidate.sockets) {
                        rows[direction.index()].insert(u);
                    }
                }
            }
            adjacent.push(rows);
        }

        let weights: Vec<f64> = tiles.iter().map(|tile| tile.weight).collect();
        let contributions: Vec<f64> = weights.iter().map(|w| -w * w.log2()).collect();
        let total_weight = weights.iter().sum();
        let total_entropy = contributions.iter().sum();

        Ok(Catalog {
            tiles,
            adjacent,
            weights,
            contributions,
            total_weight,
            total_entropy,
        })
    }
}

impl<T, S> Catalog<T, S>
where
    T: DeserializeOwned,
    S: DeserializeOwned + PartialEq,
{
    /// Parse a YAML sequence of tiles and compile it.
    ///
    /// Each entry carries a `value`, a `sockets` map with `up`, `right`,
    /// `down`, and `left` labels, and an optional `weight` defaulting to 1:
    ///
    /// ```yaml
    /// - value: "~"
    ///   sockets: { up: water, right: water, down: water, left: water }
    ///   weight: 4.0
    /// ```
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        let tiles: Vec<Tile<T, S>> = serde_yaml::from_str(source)?;
        Self::new(tiles)
    }
}

impl<T, S> Catalog<T, S> {
    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false: construction refuses empty tile lists.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tiles, in input order.
    pub fn tiles(&self) -> &[Tile<T, S>] {
        &self.tiles
    }

    /// The tile at `index`.
    pub fn tile(&self, index: usize) -> &Tile<T, S> {
        &self.tiles[index]
    }

    /// The tiles admissible in direction `direction` from tile `tile`.
    pub fn adjacent(&self, tile: usize, direction: Direction) -> &FixedBitSet {
        &self.adjacent[tile][direction.index()]
    }

    /// Per-tile selection weights, indexed like the tiles.
    pub(crate) fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Per-tile entropy contributions `-w * log2(w)`, indexed like the tiles.
    pub(crate) fn contributions(&self) -> &[f64] {
        &self.contributions
    }

    /// Sum of all tile weights.
    pub(crate) fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Sum of all entropy contributions.
    pub(crate) fn total_entropy(&self) -> f64 {
        self.total_entropy
    }

    /// A set admitting every tile.
    pub(crate) fn full_set(&self) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(self.tiles.len());
        set.insert_range(..);
        set
    }
}
