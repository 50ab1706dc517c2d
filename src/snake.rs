use std::collections::VecDeque;

use crate::geometry::{Cell, Direction, Velocity};
use crate::Px;

/// Body segments, head at the front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A straight snake whose head is at `head`, trailing behind it
    /// opposite to `direction`.
    pub fn new(head: Cell, size: usize, direction: Direction, unit: Px) -> Self {
        assert!(size > 0, "a snake needs at least one segment");
        let back = direction.opposite().velocity(unit);

        let body = (0..size as Px)
            .map(|i| Cell::new(head.x + back.dx * i, head.y + back.dy * i))
            .collect();
        Snake { body }
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body }
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> + DoubleEndedIterator {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub(crate) fn head_mut(&mut self) -> &mut Cell {
        &mut self.body[0]
    }

    /// Prepends `head + velocity` and returns it. The tail stays put; the
    /// caller drops it with [`Snake::drop_tail`] unless the snake grows.
    pub fn advance(&mut self, velocity: Velocity) -> Cell {
        let new_head = self.head() + velocity;
        self.body.push_front(new_head);
        new_head
    }

    pub fn drop_tail(&mut self) -> Option<Cell> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    /// Segments other than the head.
    pub fn trailing(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter().skip(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction::*;

    #[test]
    fn new_lays_segments_behind_the_head() {
        let snake = Snake::new(Cell::new(100, 0), 5, Right, 25);
        let cells: Vec<Cell> = snake.body().copied().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(100, 0),
                Cell::new(75, 0),
                Cell::new(50, 0),
                Cell::new(25, 0),
                Cell::new(0, 0),
            ]
        );
    }

    #[test]
    fn advance_then_drop_tail_keeps_length() {
        let mut snake = Snake::new(Cell::new(50, 50), 3, Down, 25);
        let head = snake.advance(Down.velocity(25));
        assert_eq!(head, Cell::new(50, 75));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.drop_tail(), Some(Cell::new(50, 0)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), head);
    }

    #[test]
    fn never_drops_the_last_segment() {
        let mut snake = Snake::from_cells([Cell::new(0, 0)]);
        assert_eq!(snake.drop_tail(), None);
        assert_eq!(snake.len(), 1);
    }
}
