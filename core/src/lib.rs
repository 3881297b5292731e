//! Minefield model for a single-player mine-uncovering puzzle.
//!
//! A [`Minefield`] owns a grid of [`Cell`]s built from a [`MineLayout`]. Frontends
//! drive it through `reveal`, `flag`, `mark` and `clear_annotation`, read what
//! to draw through [`Minefield::cell_symbol`], and watch [`Minefield::state`].
#![no_std]

extern crate alloc;

pub use cell::*;
pub use config::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use settings::*;
pub use types::*;

mod cell;
mod config;
mod error;
mod field;
mod generator;
mod settings;
mod types;
