//! Tiling puzzles as exact cover problems: pieces, boards, and the
//! calendar puzzle built from them.

pub mod board;
pub mod calendar;
pub mod shape;

pub use board::{Board, Column, Placement, Tiling};
pub use calendar::Month;
pub use shape::{Piece, Shape};
