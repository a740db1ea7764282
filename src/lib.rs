//! # `wave-collapse`
//!
//! `wave-collapse` is a library for procedurally generating 2D tile grids.

// #![deny(warnings)]
#![deny(missing_docs)]
// #![deny(unused)]
// #![deny(dead_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod catalog;
mod cell;
mod direction;
mod grid;
mod parallel;
mod rng;
mod socket;
mod tile;
mod tiling;
mod wave;

pub use catalog::{Catalog, CatalogError};
pub use cell::Cell;
pub use direction::{ALL_DIRECTIONS, Direction};
pub use grid::{Grid, Neighbour};
pub use parallel::race_seeds;
pub use rng::SeededRng;
pub use socket::Sockets;
pub use tile::Tile;
pub use tiling::Tiling;
pub use wave::{WaveError, WaveFunction};
