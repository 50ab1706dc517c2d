//! Game constants and command-line settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::geometry::Board;
use crate::Px;

/// Edge length of one grid cell, in pixels.
pub const UNIT_SIZE: Px = 25;

pub const DEFAULT_BOARD_WIDTH: Px = 500;
pub const DEFAULT_BOARD_HEIGHT: Px = 500;

/// Tick delay at the start of every session (ms).
pub const BASE_SPEED_MS: u64 = 75;
/// Fastest possible tick delay (ms).
pub const MIN_SPEED_MS: u64 = 30;
/// How much the delay shrinks at each speed-up (ms).
pub const SPEED_STEP_MS: u64 = 3;
/// Speed up whenever the score lands on a multiple of this.
pub const SPEED_INCREASE_INTERVAL: u32 = 5;

pub const INITIAL_SNAKE_LENGTH: usize = 5;

/// Chance that a freshly spawned food item is the 2x2 bonus kind.
pub const BONUS_FOOD_CHANCE: f64 = 0.3;
pub const BONUS_FOOD_LIFETIME: Duration = Duration::from_millis(3000);
pub const BONUS_FOOD_CELLS: Px = 2;

pub const NORMAL_FOOD_POINTS: u32 = 1;
pub const BONUS_FOOD_POINTS: u32 = 2;

pub const CLIP_VOLUME: f32 = 0.2;

pub const DEFAULT_BEST_SCORE_FILE: &str = "snake-best.json";

#[derive(Debug, Parser)]
#[command(name = "snake-wrap", about = "Wrap-around snake for the terminal")]
pub struct Cli {
    /// Board width in pixels (multiple of the 25px unit)
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
    pub width: Px,

    /// Board height in pixels (multiple of the 25px unit)
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
    pub height: Px,

    /// Where the best score is kept between runs
    #[arg(long, env = "SNAKE_BEST_SCORE_FILE", default_value = DEFAULT_BEST_SCORE_FILE)]
    pub best_score_file: PathBuf,

    /// Write tracing output to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable the terminal bell
    #[arg(long)]
    pub mute: bool,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text file drawn on the game-over screen
    #[arg(long)]
    pub game_over_art: Option<PathBuf>,
}

impl Cli {
    pub fn board(&self) -> Result<Board> {
        board_from_pixels(self.width, self.height)
    }
}

pub fn board_from_pixels(width: Px, height: Px) -> Result<Board> {
    if width % UNIT_SIZE != 0 || height % UNIT_SIZE != 0 {
        bail!("board {width}x{height} is not a multiple of the {UNIT_SIZE}px unit");
    }
    // Bonus food needs a 2x2 block to fit.
    if width < UNIT_SIZE * BONUS_FOOD_CELLS || height < UNIT_SIZE * BONUS_FOOD_CELLS {
        bail!("board {width}x{height} is smaller than 2x2 cells");
    }
    // The starting snake lies along the top row.
    if width < UNIT_SIZE * INITIAL_SNAKE_LENGTH as Px {
        bail!("board {width}px wide cannot hold the {INITIAL_SNAKE_LENGTH}-cell starting snake");
    }
    Ok(Board::new(width, height, UNIT_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_is_twenty_cells_square() {
        let board = board_from_pixels(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT).unwrap();
        assert_eq!(board.columns(), 20);
        assert_eq!(board.rows(), 20);
    }

    #[test]
    fn rejects_off_grid_and_tiny_boards() {
        assert!(board_from_pixels(510, 500).is_err());
        assert!(board_from_pixels(25, 500).is_err());
        assert!(board_from_pixels(125, 25).is_err());
        assert!(board_from_pixels(125, 50).is_ok());
    }

    #[test]
    fn rejects_boards_narrower_than_the_starting_snake() {
        assert!(board_from_pixels(75, 500).is_err());
        assert!(board_from_pixels(100, 500).is_err());

        let board = board_from_pixels(125, 500).unwrap();
        let state = crate::sim::GameState::new(board, crate::food::Food::normal(Default::default()));
        assert!(state.snake.body().all(|cell| board.contains(*cell)));
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["snake-wrap"]);
        assert_eq!(cli.width, DEFAULT_BOARD_WIDTH);
        assert!(!cli.mute);
        assert!(cli.seed.is_none());
    }
}
