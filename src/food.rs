use rand::Rng;

use crate::config::{
    BONUS_FOOD_CELLS, BONUS_FOOD_CHANCE, BONUS_FOOD_POINTS, NORMAL_FOOD_POINTS,
};
use crate::geometry::{Board, Cell};
use crate::Px;

/// A food item. Bonus ("big") food covers a 2x2 block and is worth double.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub is_big: bool,
}

impl Food {
    pub fn normal(cell: Cell) -> Self {
        Food { cell, is_big: false }
    }

    pub fn big(cell: Cell) -> Self {
        Food { cell, is_big: true }
    }

    /// Edge length of the footprint in cells.
    pub fn cells(&self) -> Px {
        if self.is_big {
            BONUS_FOOD_CELLS
        } else {
            1
        }
    }

    pub fn points(&self) -> u32 {
        if self.is_big {
            BONUS_FOOD_POINTS
        } else {
            NORMAL_FOOD_POINTS
        }
    }

    /// Box containment of `cell` in the footprint.
    pub fn covers(&self, cell: Cell, unit: Px) -> bool {
        let size = self.cells() * unit;
        cell.x >= self.cell.x
            && cell.x < self.cell.x + size
            && cell.y >= self.cell.y
            && cell.y < self.cell.y + size
    }
}

/// Draws food positions on the unit grid so the whole footprint stays on
/// the board. Positions may overlap the snake.
pub struct FoodGenerator<R> {
    rng: R,
}

impl<R: Rng> FoodGenerator<R> {
    pub fn new(rng: R) -> Self {
        FoodGenerator { rng }
    }

    pub fn generate(&mut self, board: &Board) -> Food {
        let is_big = self.rng.gen_bool(BONUS_FOOD_CHANCE);
        let cells = if is_big { BONUS_FOOD_CELLS } else { 1 };

        let col = self.rng.gen_range(0..=board.columns() - cells);
        let row = self.rng.gen_range(0..=board.rows() - cells);
        Food { cell: board.cell_at(col, row), is_big }
    }
}
