use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::Direction;

/// One edge label per side of a tile.
///
/// Adjacency is equality of touching edges: tile B may sit in direction `d`
/// from tile A exactly when `A.sockets[d] == B.sockets[d.opposite()]`. The
/// label type is anything comparable for equality; the engine never inspects
/// it further.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sockets<S> {
    /// Label on the top edge.
    pub up: S,
    /// Label on the right edge.
    pub right: S,
    /// Label on the bottom edge.
    pub down: S,
    /// Label on the left edge.
    pub left: S,
}

impl<S> Sockets<S> {
    /// Bundle four edge labels, in canonical direction order.
    pub fn new(up: S, right: S, down: S, left: S) -> Self {
        Sockets {
            up,
            right,
            down,
            left,
        }
    }

    /// The same label on all four edges.
    pub fn uniform(label: S) -> Self
    where
        S: Clone,
    {
        Sockets {
            up: label.clone(),
            right: label.clone(),
            down: label.clone(),
            left: label,
        }
    }
}

impl<S: PartialEq> Sockets<S> {
    /// True when `other` may sit in direction `direction` from `self`.
    pub fn fits(&self, direction: Direction, other: &Self) -> bool {
        self[direction] == other[direction.opposite()]
    }
}

impl<S> Index<Direction> for Sockets<S> {
    type Output = S;

    fn index(&self, direction: Direction) -> &Self::Output {
        match direction {
            Direction::Up => &self.up,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
        }
    }
}
