use std::ops::Add;

use crate::Px;
use Direction::*;

/// Top-left corner of one grid cell, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: Px,
    pub y: Px,
}

impl Cell {
    pub const fn new(x: Px, y: Px) -> Self {
        Cell { x, y }
    }
}

impl Add<Velocity> for Cell {
    type Output = Cell;

    fn add(self, v: Velocity) -> Cell {
        Cell::new(self.x + v.dx, self.y + v.dy)
    }
}

/// Per-tick displacement. Exactly one component is +-unit, the other 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Velocity {
    pub dx: Px,
    pub dy: Px,
}

impl Velocity {
    pub fn direction(&self) -> Option<Direction> {
        match (self.dx.signum(), self.dy.signum()) {
            (0, -1) => Some(Up),
            (0, 1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }

    pub fn dot(&self, other: Velocity) -> Px {
        self.dx * other.dx + self.dy * other.dy
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn velocity(self, unit: Px) -> Velocity {
        let (dx, dy) = match self {
            Up => (0, -unit),
            Down => (0, unit),
            Left => (-unit, 0),
            Right => (unit, 0),
        };
        Velocity { dx, dy }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Left | Right)
    }
}

/// Drawing surface dimensions. Width and height are whole multiples of `unit`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: Px,
    height: Px,
    unit: Px,
}

impl Board {
    pub fn new(width: Px, height: Px, unit: Px) -> Self {
        debug_assert!(unit > 0 && width % unit == 0 && height % unit == 0);
        Board { width, height, unit }
    }

    pub fn width(&self) -> Px {
        self.width
    }

    pub fn height(&self) -> Px {
        self.height
    }

    pub fn unit(&self) -> Px {
        self.unit
    }

    pub fn columns(&self) -> Px {
        self.width / self.unit
    }

    pub fn rows(&self) -> Px {
        self.height / self.unit
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Pixel corner of the cell at grid position `(col, row)`.
    pub fn cell_at(&self, col: Px, row: Px) -> Cell {
        Cell::new(col * self.unit, row * self.unit)
    }

    /// Grid position of the cell containing pixel `(x, y)`.
    pub fn grid_pos(&self, x: Px, y: Px) -> (Px, Px) {
        (x.div_euclid(self.unit), y.div_euclid(self.unit))
    }
}
