//! Wrap-around snake: a fixed-delay game loop over a grid board, with the
//! simulation kept separate from the terminal that draws it.

pub mod audio;
pub mod collision;
pub mod config;
pub mod food;
pub mod game;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod snake;
pub mod store;
pub mod term;

/// Pixel coordinate on the board. Cells sit on multiples of the unit size.
pub type Px = i32;
