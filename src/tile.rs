use serde::{Deserialize, Serialize};

use crate::Sockets;

fn default_weight() -> f64 {
    1.0
}

/// A catalog entry: an opaque payload, four edge sockets, and a selection
/// weight.
///
/// The engine never looks inside `value`; it travels through collapse
/// untouched and comes back out in the finished tiling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile<T, S> {
    /// Payload handed back wherever this tile lands.
    pub value: T,
    /// Edge labels governing which tiles may sit beside this one.
    pub sockets: Sockets<S>,
    /// Positive, finite selection weight; heavier tiles are drawn more often.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl<T, S> Tile<T, S> {
    /// A tile with the default weight of 1.
    pub fn new(value: T, sockets: Sockets<S>) -> Self {
        Tile {
            value,
            sockets,
            weight: 1.0,
        }
    }

    /// A tile with an explicit selection weight.
    pub fn weighted(value: T, sockets: Sockets<S>, weight: f64) -> Self {
        Tile {
            value,
            sockets,
            weight,
        }
    }
}
