//! The pure per-tick simulation: movement, food, wrap, self-collision and
//! the speed ramp. No drawing, sound or timers happen here.

use std::time::Duration;

use crate::collision::{hits_self, wrap_head};
use crate::config::{
    BASE_SPEED_MS, INITIAL_SNAKE_LENGTH, MIN_SPEED_MS, SPEED_INCREASE_INTERVAL, SPEED_STEP_MS,
};
use crate::food::Food;
use crate::geometry::{Board, Cell, Direction, Velocity};
use crate::snake::Snake;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub snake: Snake,
    pub velocity: Velocity,
    pub food: Food,
    pub score: u32,
    /// Current tick delay in milliseconds.
    pub speed_ms: u64,
}

/// What happened during one [`GameState::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The food item consumed this tick, if any.
    pub eaten: Option<Food>,
    pub collided: bool,
    pub speed_changed: bool,
}

impl GameState {
    /// Fresh session state: score 0, base speed, the canonical snake along
    /// the top row heading right.
    pub fn new(board: Board, food: Food) -> Self {
        let unit = board.unit();
        let head = Cell::new(unit * (INITIAL_SNAKE_LENGTH as i32 - 1), 0);

        GameState {
            board,
            snake: Snake::new(head, INITIAL_SNAKE_LENGTH, Direction::Right, unit),
            velocity: Direction::Right.velocity(unit),
            food,
            score: 0,
            speed_ms: BASE_SPEED_MS,
        }
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn heading(&self) -> Option<Direction> {
        self.velocity.direction()
    }

    /// Points the snake along `dir` from the next tick on. Requests on the
    /// current axis (a reversal or a repeat) are ignored.
    pub fn turn(&mut self, dir: Direction) -> bool {
        match self.heading() {
            Some(current) if current.is_horizontal() == dir.is_horizontal() => false,
            _ => {
                self.velocity = dir.velocity(self.board.unit());
                true
            }
        }
    }

    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        let head = self.snake.advance(self.velocity);

        // Food is tested before the head is wrapped back onto the board.
        if self.food.covers(head, self.board.unit()) {
            self.score += self.food.points();
            report.eaten = Some(self.food);

            let speed = next_speed(self.speed_ms, self.score);
            report.speed_changed = speed != self.speed_ms;
            self.speed_ms = speed;
        } else {
            self.snake.drop_tail();
        }

        wrap_head(&mut self.snake, &self.board);
        report.collided = hits_self(&self.snake);
        report
    }
}

/// Tick delay after the score becomes `score`. Shrinks by one step on
/// every multiple of the interval, never below the minimum.
pub fn next_speed(speed_ms: u64, score: u32) -> u64 {
    if score % SPEED_INCREASE_INTERVAL == 0 && speed_ms > MIN_SPEED_MS {
        speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS)
    } else {
        speed_ms
    }
}
