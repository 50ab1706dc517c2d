//! The drawing contract the session paints through, and the painting of
//! board, food, snake and the game-over screen on top of it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::food::Food;
use crate::geometry::{Board, Cell, Direction};
use crate::snake::Snake;
use crate::Px;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// `self` composited over an opaque `below`.
    pub fn over(self, below: Color) -> Color {
        let a = self.a as u32;
        let mix = |top: u8, bottom: u8| ((top as u32 * a + bottom as u32 * (255 - a)) / 255) as u8;
        Color::rgb(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b))
    }
}

pub const BOARD_BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);
pub const GRID_COLOR: Color = Color::rgba(103, 148, 153, 38);
pub const SNAKE_COLOR: Color = Color::rgb(0x67, 0x94, 0x99);
pub const SNAKE_BODY_COLOR: Color = Color::rgba(103, 148, 153, 200);
pub const SNAKE_BORDER: Color = Color::rgb(0xD7, 0xA2, 0x78);
pub const SNAKE_EYES: Color = Color::rgb(0x00, 0x00, 0x00);
pub const FOOD_COLOR: Color = Color::rgb(0xC3, 0x37, 0x40);
pub const BONUS_FOOD_COLOR: Color = Color::rgb(0xE3, 0xD5, 0xB8);
pub const BONUS_GLYPH_COLOR: Color = Color::rgb(0x69, 0x43, 0x3A);
pub const APPLE_GLYPH_COLOR: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const OVERLAY_COLOR: Color = Color::rgba(0, 0, 0, 204);
pub const TITLE_COLOR: Color = Color::rgb(0xC3, 0x37, 0x40);
pub const SCORE_COLOR: Color = Color::rgb(0x67, 0x94, 0x99);
pub const HIGHLIGHT_COLOR: Color = Color::rgb(0xE3, 0xD5, 0xB8);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: Px,
    pub y: Px,
    pub w: Px,
    pub h: Px,
}

impl Rect {
    pub const fn new(x: Px, y: Px, w: Px, h: Px) -> Self {
        Rect { x, y, w, h }
    }

    pub fn cell(cell: Cell, unit: Px) -> Self {
        Rect::new(cell.x, cell.y, unit, unit)
    }
}

/// Externally supplied picture. In a terminal it is a block of text art.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    lines: Vec<String>,
}

impl Image {
    pub fn from_lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Image { lines: lines.into_iter().map(Into::into).collect() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading image {}", path.display()))?;
        Ok(Image::from_lines(text.lines()))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Side-effecting draw commands. Nothing is ever read back.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` centered on `(x, y)`.
    fn fill_text(&mut self, text: &str, x: Px, y: Px, color: Color);

    fn draw_image(&mut self, image: &Image, rect: Rect);

    /// Pushes everything drawn so far to the screen.
    fn present(&mut self) -> Result<()>;
}

pub fn clear_board(canvas: &mut impl Canvas, board: &Board) {
    canvas.fill_rect(Rect::new(0, 0, board.width(), board.height()), BOARD_BACKGROUND);

    for row in 0..board.rows() {
        for col in 0..board.columns() {
            canvas.stroke_rect(Rect::cell(board.cell_at(col, row), board.unit()), GRID_COLOR);
        }
    }
}

pub fn draw_food(canvas: &mut impl Canvas, board: &Board, food: &Food) {
    let unit = board.unit();
    let size = food.cells() * unit;
    let Cell { x, y } = food.cell;

    if food.is_big {
        canvas.fill_rect(Rect::new(x, y, size, size), BONUS_FOOD_COLOR);
        canvas.fill_text("*", x + unit, y + unit, BONUS_GLYPH_COLOR);
    } else {
        canvas.fill_rect(Rect::new(x, y, size, size), FOOD_COLOR);
        canvas.fill_text("o", x + unit / 2, y + unit / 2, APPLE_GLYPH_COLOR);
    }
}

pub fn draw_snake(canvas: &mut impl Canvas, board: &Board, snake: &Snake, heading: Option<Direction>) {
    let unit = board.unit();

    for (i, part) in snake.body().enumerate() {
        let rect = Rect::cell(*part, unit);
        canvas.fill_rect(rect, if i == 0 { SNAKE_COLOR } else { SNAKE_BODY_COLOR });
        canvas.stroke_rect(rect, SNAKE_BORDER);
    }

    if let Some(dir) = heading {
        for eye in eyes(snake.head(), dir, unit) {
            canvas.fill_rect(eye, SNAKE_EYES);
        }
    }
}

fn eyes(head: Cell, dir: Direction, unit: Px) -> [Rect; 2] {
    const SIZE: Px = 4;
    const OFFSET: Px = 8;
    let Cell { x, y } = head;

    let (a, b) = match dir {
        Direction::Right => ((x + unit - OFFSET, y + 6), (x + unit - OFFSET, y + unit - 10)),
        Direction::Left => ((x + OFFSET - SIZE, y + 6), (x + OFFSET - SIZE, y + unit - 10)),
        Direction::Down => ((x + 6, y + unit - OFFSET), (x + unit - 10, y + unit - OFFSET)),
        Direction::Up => ((x + 6, y + OFFSET - SIZE), (x + unit - 10, y + OFFSET - SIZE)),
    };
    [Rect::new(a.0, a.1, SIZE, SIZE), Rect::new(b.0, b.1, SIZE, SIZE)]
}

pub fn draw_game_over(
    canvas: &mut impl Canvas,
    board: &Board,
    score: u32,
    best_score: u32,
    image: Option<&Image>,
) {
    let (w, h) = (board.width(), board.height());
    let cx = w / 2;
    let cy = h / 2;

    canvas.fill_rect(Rect::new(0, 0, w, h), OVERLAY_COLOR);
    canvas.fill_text("GAME OVER", cx, cy - 120, TITLE_COLOR);
    canvas.fill_text(&format!("SCORE: {score}"), cx, cy - 60, SCORE_COLOR);

    if score == best_score && score > 0 {
        canvas.fill_text("NEW BEST!", cx, cy - 30, HIGHLIGHT_COLOR);
    }

    if let Some(image) = image {
        canvas.fill_rect(Rect::new(cx - 104, cy + 10, 208, 208), SNAKE_BORDER);
        canvas.draw_image(image, Rect::new(cx - 100, cy + 14, 200, 200));
    }

    canvas.fill_text("PRESS RESET", cx, h - 30, HIGHLIGHT_COLOR);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Canvas that keeps a log of draw calls.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub ops: Vec<String>,
        pub presents: usize,
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, r: Rect, c: Color) {
            self.ops.push(format!("fill {} {} {} {} {:?}", r.x, r.y, r.w, r.h, c));
        }

        fn stroke_rect(&mut self, r: Rect, _: Color) {
            self.ops.push(format!("stroke {} {} {} {}", r.x, r.y, r.w, r.h));
        }

        fn fill_text(&mut self, text: &str, _: Px, _: Px, _: Color) {
            self.ops.push(format!("text {text}"));
        }

        fn draw_image(&mut self, _: &Image, r: Rect) {
            self.ops.push(format!("image {} {}", r.x, r.y));
        }

        fn present(&mut self) -> Result<()> {
            self.presents += 1;
            Ok(())
        }
    }

    #[test]
    fn alpha_compositing() {
        let white = Color::rgb(255, 255, 255);
        assert_eq!(OVERLAY_COLOR.over(white), Color::rgb(51, 51, 51));
        assert_eq!(SNAKE_COLOR.over(white), SNAKE_COLOR);
    }

    #[test]
    fn clear_board_strokes_every_cell() {
        let mut canvas = Recorder::default();
        clear_board(&mut canvas, &Board::new(100, 50, 25));
        assert_eq!(canvas.ops.len(), 1 + 4 * 2);
        assert!(canvas.ops[0].starts_with("fill 0 0 100 50"));
    }

    #[test]
    fn head_gets_eyes_facing_its_heading() {
        let mut canvas = Recorder::default();
        let snake = Snake::from_cells([Cell::new(50, 50), Cell::new(25, 50)]);
        draw_snake(&mut canvas, &Board::new(100, 100, 25), &snake, Some(Direction::Right));

        let eyes: Vec<_> = canvas.ops.iter().filter(|op| op.starts_with("fill") && op.contains(" 4 4 ")).collect();
        assert_eq!(eyes.len(), 2);
        assert!(eyes[0].starts_with("fill 67 56 4 4"));
        assert!(eyes[1].starts_with("fill 67 65 4 4"));
    }

    #[test]
    fn game_over_marks_a_new_best_only_when_matching() {
        let board = Board::new(500, 500, 25);

        let mut canvas = Recorder::default();
        draw_game_over(&mut canvas, &board, 15, 15, None);
        assert!(canvas.ops.contains(&"text NEW BEST!".to_string()));
        assert!(canvas.ops.contains(&"text SCORE: 15".to_string()));
        assert!(!canvas.ops.iter().any(|op| op.starts_with("image")));

        let mut canvas = Recorder::default();
        let art = Image::from_lines(["x"]);
        draw_game_over(&mut canvas, &board, 3, 15, Some(&art));
        assert!(!canvas.ops.contains(&"text NEW BEST!".to_string()));
        assert!(canvas.ops.contains(&"image 150 264".to_string()));
    }
}
