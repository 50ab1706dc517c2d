//! Boundary wrap and self-collision, applied once per tick after movement.

use crate::geometry::Board;
use crate::snake::Snake;

/// Moves a head that left the board to the opposite edge. Only one axis is
/// corrected per call: an x correction skips the y checks.
pub fn wrap_head(snake: &mut Snake, board: &Board) {
    let head = snake.head_mut();

    if head.x < 0 {
        head.x = board.width() - board.unit();
    } else if head.x >= board.width() {
        head.x = 0;
    } else if head.y < 0 {
        head.y = board.height() - board.unit();
    } else if head.y >= board.height() {
        head.y = 0;
    }
}

/// True when any segment other than the head shares the head's cell.
pub fn hits_self(snake: &Snake) -> bool {
    let head = snake.head();
    snake.trailing().any(|cell| *cell == head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;

    fn board() -> Board {
        Board::new(100, 100, 25)
    }

    fn head_after_wrap(x: i32, y: i32) -> Cell {
        let mut snake = Snake::from_cells([Cell::new(x, y)]);
        wrap_head(&mut snake, &board());
        snake.head()
    }

    #[test]
    fn wraps_each_edge() {
        assert_eq!(head_after_wrap(-25, 50), Cell::new(75, 50));
        assert_eq!(head_after_wrap(100, 50), Cell::new(0, 50));
        assert_eq!(head_after_wrap(50, -25), Cell::new(50, 75));
        assert_eq!(head_after_wrap(50, 100), Cell::new(50, 0));
        assert_eq!(head_after_wrap(50, 50), Cell::new(50, 50));
    }

    #[test]
    fn x_correction_suppresses_y_correction() {
        assert_eq!(head_after_wrap(100, 100), Cell::new(0, 100));
        assert_eq!(head_after_wrap(-25, -25), Cell::new(75, -25));
    }

    #[test]
    fn only_the_head_is_moved() {
        let mut snake = Snake::from_cells([Cell::new(100, 0), Cell::new(75, 0)]);
        wrap_head(&mut snake, &board());
        let cells: Vec<Cell> = snake.body().copied().collect();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(75, 0)]);
    }

    #[test]
    fn self_hit_needs_a_trailing_segment_on_the_head() {
        let clear = Snake::from_cells([Cell::new(0, 0), Cell::new(25, 0), Cell::new(25, 25)]);
        assert!(!hits_self(&clear));

        let bitten = Snake::from_cells([
            Cell::new(25, 25),
            Cell::new(25, 0),
            Cell::new(0, 0),
            Cell::new(0, 25),
            Cell::new(25, 25),
        ]);
        assert!(hits_self(&bitten));

        assert!(!hits_self(&Snake::from_cells([Cell::new(0, 0)])));
    }
}
