//! Session lifecycle: start, reset, game over and direction input, plus the
//! timers that drive ticks and bonus-food expiry. All drawing, sound and
//! persistence happen here, around the pure [`GameState::step`].

use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::{AudioSink, Clip};
use crate::config::{BONUS_FOOD_CELLS, BONUS_FOOD_LIFETIME, CLIP_VOLUME, INITIAL_SNAKE_LENGTH};
use crate::food::{Food, FoodGenerator};
use crate::geometry::{Board, Cell, Direction};
use crate::render::{self, Canvas, Image};
use crate::scheduler::{Scheduler, TimerId};
use crate::sim::GameState;
use crate::store::ScoreStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Timer {
    Tick,
    BonusExpiry,
}

pub struct Session<C, A, S, R = StdRng> {
    board: Board,
    phase: Phase,
    state: GameState,
    foods: FoodGenerator<R>,
    timers: Scheduler<Timer>,
    tick_timer: Option<TimerId>,
    bonus_timer: Option<TimerId>,
    best_score: u32,
    canvas: C,
    audio: A,
    store: S,
    game_over_image: Option<Image>,
}

impl<C: Canvas, A: AudioSink, S: ScoreStore, R: Rng> Session<C, A, S, R> {
    /// Loads the best score once; a failing store counts as no best yet.
    ///
    /// # Panics
    ///
    /// If `board` cannot hold the starting snake or a bonus food block.
    /// [`board_from_pixels`](crate::config::board_from_pixels) rejects
    /// such boards up front.
    pub fn new(board: Board, rng: R, canvas: C, audio: A, mut store: S) -> Self {
        assert!(
            board.columns() >= INITIAL_SNAKE_LENGTH as i32 && board.rows() >= BONUS_FOOD_CELLS,
            "board of {}x{} cells is too small to play on",
            board.columns(),
            board.rows()
        );

        let best_score = match store.load() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                warn!("could not load best score: {e:#}");
                0
            }
        };

        Session {
            board,
            phase: Phase::Idle,
            state: GameState::new(board, Food::normal(Cell::default())),
            foods: FoodGenerator::new(rng),
            timers: Scheduler::new(),
            tick_timer: None,
            bonus_timer: None,
            best_score,
            canvas,
            audio,
            store,
            game_over_image: None,
        }
    }

    pub fn with_game_over_image(mut self, image: Option<Image>) -> Self {
        self.game_over_image = image;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Start is offered whenever no game is in progress.
    pub fn start_enabled(&self) -> bool {
        !self.is_running()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios (placing food, bending the snake).
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tick_timer(&self) -> Option<TimerId> {
        self.tick_timer
    }

    pub fn bonus_timer(&self) -> Option<TimerId> {
        self.bonus_timer
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_pending(id)
    }

    /// When the driver next needs to call [`Session::advance`].
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Paints the empty board shown before the first game.
    pub fn show_board(&mut self) -> Result<()> {
        render::clear_board(&mut self.canvas, &self.board);
        self.canvas.present()
    }

    /// Starts a new game unless one is already running. Returns whether a
    /// game was started.
    pub fn start(&mut self, now: Duration) -> Result<bool> {
        if self.is_running() {
            return Ok(false);
        }

        info!("starting session (best score {})", self.best_score);
        self.begin(now)?;
        self.start_background();
        Ok(true)
    }

    /// Abandons whatever is going on and immediately starts a new game.
    pub fn reset(&mut self, now: Duration) -> Result<()> {
        info!(phase = ?self.phase, score = self.state.score, "resetting session");
        self.cancel_timers();
        self.phase = Phase::Idle;
        self.with_audio("stop game-over clip", |a| a.stop(Clip::GameOver));

        self.start_background();
        self.begin(now)
    }

    /// Applies a direction request from the next tick on. Reversals and
    /// repeats of the current axis are ignored, as is input between games.
    pub fn turn(&mut self, dir: Direction) -> bool {
        self.is_running() && self.state.turn(dir)
    }

    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Duration) -> Result<()> {
        while let Some((id, timer)) = self.timers.pop_due(now) {
            match timer {
                Timer::Tick => {
                    debug_assert_eq!(self.tick_timer, Some(id));
                    self.tick_timer = None;
                    self.tick(now)?;
                }
                Timer::BonusExpiry => {
                    debug_assert_eq!(self.bonus_timer, Some(id));
                    self.bonus_timer = None;
                    debug!("bonus food at {:?} expired", self.state.food.cell);
                    self.spawn_food(now);
                }
            }
        }
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn begin(&mut self, now: Duration) -> Result<()> {
        self.cancel_timers();
        self.state = GameState::new(self.board, self.state.food);
        self.phase = Phase::Running;
        self.spawn_food(now);

        render::clear_board(&mut self.canvas, &self.board);
        render::draw_food(&mut self.canvas, &self.board, &self.state.food);
        self.canvas.present()?;

        self.schedule_tick(now);
        Ok(())
    }

    fn tick(&mut self, now: Duration) -> Result<()> {
        render::clear_board(&mut self.canvas, &self.board);
        render::draw_food(&mut self.canvas, &self.board, &self.state.food);

        let report = self.state.step();

        if let Some(food) = report.eaten {
            self.with_audio("eat", |a| {
                a.set_volume(Clip::Eat, CLIP_VOLUME)?;
                a.play(Clip::Eat)
            });
            if report.speed_changed {
                debug!(score = self.state.score, speed_ms = self.state.speed_ms, "speeding up");
            }
            debug!(score = self.state.score, big = food.is_big, "food eaten");
            self.spawn_food(now);
        }

        render::draw_snake(&mut self.canvas, &self.board, &self.state.snake, self.state.heading());
        self.canvas.present()?;

        if report.collided {
            self.game_over()
        } else {
            self.schedule_tick(now);
            Ok(())
        }
    }

    fn game_over(&mut self) -> Result<()> {
        self.phase = Phase::GameOver;
        self.cancel_timers();

        let score = self.state.score;
        if score > self.best_score {
            self.best_score = score;
            if let Err(e) = self.store.save(score) {
                warn!("could not save best score {score}: {e:#}");
            }
        }
        info!(score, best = self.best_score, "game over");

        self.with_audio("game-over clip", |a| {
            a.set_volume(Clip::GameOver, CLIP_VOLUME)?;
            a.play(Clip::GameOver)?;
            a.set_volume(Clip::Background, 0.0)
        });

        if self.game_over_image.is_none() {
            debug!("no game-over image to draw");
        }
        render::draw_game_over(
            &mut self.canvas,
            &self.board,
            score,
            self.best_score,
            self.game_over_image.as_ref(),
        );
        self.canvas.present()
    }

    /// Replaces the food, cancelling any pending bonus expiry first.
    fn spawn_food(&mut self, now: Duration) {
        if let Some(id) = self.bonus_timer.take() {
            self.timers.cancel(id);
        }

        let food = self.foods.generate(&self.board);
        if food.is_big {
            let id = self.timers.schedule_after(now, BONUS_FOOD_LIFETIME, Timer::BonusExpiry);
            self.bonus_timer = Some(id);
        }
        debug!(x = food.cell.x, y = food.cell.y, big = food.is_big, "food spawned");
        self.state.food = food;
    }

    fn schedule_tick(&mut self, now: Duration) {
        let id = self.timers.schedule_after(now, self.state.speed(), Timer::Tick);
        self.tick_timer = Some(id);
    }

    fn cancel_timers(&mut self) {
        for id in [self.tick_timer.take(), self.bonus_timer.take()].into_iter().flatten() {
            self.timers.cancel(id);
        }
    }

    fn start_background(&mut self) {
        self.with_audio("background", |a| {
            a.set_volume(Clip::Background, CLIP_VOLUME)?;
            a.play(Clip::Background)
        });
    }

    fn with_audio(&mut self, what: &str, f: impl FnOnce(&mut A) -> Result<()>) {
        if let Err(e) = f(&mut self.audio) {
            warn!("audio ({what}) failed: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::render::tests::Recorder;
    use crate::store::MemoryScoreStore;
    use anyhow::anyhow;
    use rand::SeedableRng;

    type TestSession = Session<Recorder, Silent, MemoryScoreStore>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session() -> TestSession {
        Session::new(
            Board::new(500, 500, 25),
            StdRng::seed_from_u64(1),
            Recorder::default(),
            Silent,
            MemoryScoreStore::default(),
        )
    }

    #[test]
    fn double_start_is_a_no_op() {
        let mut s = session();
        assert!(s.start(ms(0)).unwrap());
        let tick = s.tick_timer().unwrap();
        assert!(!s.start(ms(10)).unwrap());
        assert_eq!(s.tick_timer(), Some(tick));
        assert!(!s.start_enabled());
    }

    #[test]
    fn tick_is_rescheduled_at_the_current_speed() {
        let mut s = session();
        s.start(ms(0)).unwrap();
        assert_eq!(s.next_deadline(), Some(ms(75)));

        s.state_mut().food = Food::normal(Cell::new(475, 475));
        s.state_mut().speed_ms = 40;

        s.advance(ms(75)).unwrap();
        assert_eq!(s.next_deadline(), Some(ms(115)));
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn refuses_a_board_narrower_than_the_snake() {
        Session::new(
            Board::new(25, 500, 25),
            StdRng::seed_from_u64(1),
            Recorder::default(),
            Silent,
            MemoryScoreStore::default(),
        );
    }

    #[test]
    fn input_between_games_is_ignored() {
        let mut s = session();
        assert!(!s.turn(Direction::Down));
        s.start(ms(0)).unwrap();
        assert!(s.turn(Direction::Down));
    }

    struct Broken;

    impl AudioSink for Broken {
        fn play(&mut self, _: Clip) -> Result<()> {
            Err(anyhow!("no device"))
        }

        fn stop(&mut self, _: Clip) -> Result<()> {
            Err(anyhow!("no device"))
        }

        fn set_volume(&mut self, _: Clip, _: f32) -> Result<()> {
            Err(anyhow!("no device"))
        }
    }

    #[test]
    fn audio_failures_do_not_stop_the_game() {
        let mut s = Session::new(
            Board::new(500, 500, 25),
            StdRng::seed_from_u64(1),
            Recorder::default(),
            Broken,
            MemoryScoreStore::default(),
        );
        s.start(ms(0)).unwrap();
        s.reset(ms(5)).unwrap();
        assert!(s.is_running());
        assert!(s.tick_timer().is_some());
    }
}
