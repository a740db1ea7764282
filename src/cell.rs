use fixedbitset::FixedBitSet;

/// How a cell's admissible set changed when a constraint was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Restriction {
    /// No tile was removed.
    Unchanged,
    /// The set shrank; several tiles remain.
    Reduced,
    /// The set shrank to exactly this tile.
    Single(usize),
    /// Every tile was removed: the grid is contradictory.
    Emptied,
}

/// One grid position: the tiles still admissible there, plus derived scalars.
///
/// `entropy` and `weight_sum` are recomputed from the set whenever it
/// shrinks, never adjusted incrementally, so they cannot drift. A collapsed
/// cell reports infinite entropy and so never wins the selection scan.
#[derive(Clone, Debug)]
pub struct Cell {
    options: FixedBitSet,
    entropy: f64,
    weight_sum: f64,
    resolved: Option<usize>,
}

impl Cell {
    /// An open cell with the given admissible set and precomputed scalars.
    pub(crate) fn open(options: FixedBitSet, entropy: f64, weight_sum: f64) -> Self {
        Cell {
            options,
            entropy,
            weight_sum,
            resolved: None,
        }
    }

    /// True once the cell holds exactly one tile.
    pub fn is_collapsed(&self) -> bool {
        self.resolved.is_some()
    }

    /// The resolved tile index, once collapsed.
    pub fn resolved(&self) -> Option<usize> {
        self.resolved
    }

    /// Indices of the tiles still admissible here.
    pub fn options(&self) -> &FixedBitSet {
        &self.options
    }

    /// Entropy proxy driving cell selection; infinite once collapsed.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    /// Total weight of the admissible tiles.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Fix the cell to `tile`: options cleared, entropy pinned to infinity.
    pub(crate) fn collapse_to(&mut self, tile: usize) {
        self.options.clear();
        self.resolved = Some(tile);
        self.entropy = f64::INFINITY;
        self.weight_sum = 0.0;
    }

    /// Intersect the admissible set with `allowed`, recomputing the scalars
    /// on a strict shrink. Scalars are left stale when the set empties; the
    /// caller discards the whole grid in that case.
    pub(crate) fn restrict(
        &mut self,
        allowed: &FixedBitSet,
        weights: &[f64],
        contributions: &[f64],
    ) -> Restriction {
        let before = self.options.count_ones(..);
        self.options.intersect_with(allowed);
        let after = self.options.count_ones(..);
        if after == before {
            return Restriction::Unchanged;
        }
        if after == 0 {
            return Restriction::Emptied;
        }
        self.entropy = self.options.ones().map(|tile| contributions[tile]).sum();
        self.weight_sum = self.options.ones().map(|tile| weights[tile]).sum();
        if after == 1 {
            if let Some(tile) = self.options.ones().next() {
                return Restriction::Single(tile);
            }
        }
        Restriction::Reduced
    }
}
