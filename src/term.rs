use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{poll, read, Event};
use crossterm::style::{self, Color as TermColor};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::geometry::Board;
use crate::render::{Canvas, Color, Image, Rect, BOARD_BACKGROUND};
use crate::Px;

const TEXT_COLOR: Color = Color::rgb(0xE3, 0xD5, 0xB8);
const DOT_CHAR: char = '•';

/// One terminal character with its colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BLANK: Glyph = Glyph { ch: ' ', fg: TEXT_COLOR, bg: BOARD_BACKGROUND };
}

/// Draws the board into a character buffer, two terminal columns per grid
/// cell, and sends only the characters that changed on [`Canvas::present`].
pub struct TermCanvas {
    unit: Px,
    cols: u16,
    rows: u16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    shown: Vec<Option<Glyph>>,
}

impl TermCanvas {
    pub fn new(board: &Board) -> Result<Self> {
        let (cols, rows) = grid_size(board)?;

        let (width, height) = terminal::size()?;
        // Frame on every side plus a status line.
        if width < cols + 2 || height < rows + 3 {
            bail!(
                "terminal is {width}x{height}, the board needs at least {}x{}",
                cols + 2,
                rows + 3
            );
        }

        let len = cols as usize * rows as usize;
        Ok(TermCanvas {
            unit: board.unit(),
            cols,
            rows,
            stdout: stdout(),
            screen: vec![Glyph::BLANK; len],
            shown: vec![None; len],
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking)?;
        execute!(self.stdout, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Waits up to `timeout` for an event.
    pub fn poll_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if poll(timeout)? {
            Ok(Some(read()?))
        } else {
            Ok(None)
        }
    }

    /// Redraws everything, e.g. after the terminal was resized.
    pub fn invalidate(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        self.shown.iter_mut().for_each(|g| *g = None);
        self.draw_frame()
    }

    pub fn draw_frame(&mut self) -> Result<()> {
        let (end_x, end_y) = (self.cols + 1, self.rows + 1);

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(x, 0), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        self.stdout.flush()?;
        Ok(())
    }

    /// Writes a line under the board.
    pub fn status(&mut self, text: &str) -> Result<()> {
        let width = self.cols as usize + 2;
        let line: String = format!("{text:<width$}").chars().take(width).collect();
        let row = self.rows + 2;

        queue!(self.stdout, style::ResetColor, cursor::MoveTo(0, row), style::Print(line))?;
        self.stdout.flush()?;
        Ok(())
    }

    /// A boxed, centered block of text over the board. It stays until the
    /// board is drawn over it.
    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = lines.len() as u16 + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
        let top = (self.rows / 2).saturating_sub(msg_height / 2);
        let left = (self.cols / 2).saturating_sub(msg_width / 2);

        for y in top..(top + msg_height).min(self.rows) {
            let text = match (y - top) as usize {
                0 => String::new(),
                i if i <= lines.len() => lines[i - 1].to_string(),
                _ => String::new(),
            };
            let padded = format!("{text: ^width$}", width = msg_width as usize);

            for (dx, ch) in padded.chars().enumerate() {
                if let Some(glyph) = self.glyph_mut(left as i32 + dx as i32, y as i32) {
                    *glyph = Glyph { ch, fg: TEXT_COLOR, bg: Color::rgb(0x20, 0x20, 0x20) };
                }
            }
        }

        self.present()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn glyph_mut(&mut self, col: i32, row: i32) -> Option<&mut Glyph> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        self.screen.get_mut(row as usize * self.cols as usize + col as usize)
    }

    fn column_of(&self, x: Px) -> i32 {
        (x * 2).div_euclid(self.unit)
    }

    fn row_of(&self, y: Px) -> i32 {
        y.div_euclid(self.unit)
    }

    /// Terminal columns and rows touched by `rect`, as half-open ranges.
    fn span(&self, rect: Rect) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let c0 = self.column_of(rect.x);
        let c1 = ((rect.x + rect.w) * 2 + self.unit - 1).div_euclid(self.unit);
        let r0 = self.row_of(rect.y);
        let r1 = (rect.y + rect.h + self.unit - 1).div_euclid(self.unit);
        (c0..c1, r0..r1)
    }

    fn is_dot(&self, rect: Rect) -> bool {
        rect.w * 2 < self.unit && rect.h * 2 < self.unit
    }
}

impl Canvas for TermCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if self.is_dot(rect) {
            let (col, row) = (self.column_of(rect.x), self.row_of(rect.y));
            if let Some(g) = self.glyph_mut(col, row) {
                g.ch = DOT_CHAR;
                g.fg = color.over(g.bg);
            }
            return;
        }

        let (cols, rows) = self.span(rect);
        for row in rows {
            for col in cols.clone() {
                if let Some(g) = self.glyph_mut(col, row) {
                    if color.is_opaque() {
                        *g = Glyph { ch: ' ', fg: color, bg: color };
                    } else {
                        g.bg = color.over(g.bg);
                        g.fg = color.over(g.fg);
                    }
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let (cols, rows) = self.span(rect);
        let (left, right) = (cols.start, cols.end - 1);

        for row in rows {
            for (col, ch) in [(left, '['), (right, ']')] {
                if let Some(g) = self.glyph_mut(col, row) {
                    g.ch = ch;
                    g.fg = color.over(g.bg);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: Px, y: Px, color: Color) {
        let row = self.row_of(y);
        let start = self.column_of(x) - text.chars().count() as i32 / 2;

        for (i, ch) in text.chars().enumerate() {
            if let Some(g) = self.glyph_mut(start + i as i32, row) {
                g.ch = ch;
                g.fg = color.over(g.bg);
            }
        }
    }

    fn draw_image(&mut self, image: &Image, rect: Rect) {
        let (cols, rows) = self.span(rect);
        let width = cols.len() as i32;

        for (line, row) in image.lines().iter().zip(rows) {
            let len = line.chars().count() as i32;
            let start = cols.start + (width - len).max(0) / 2;

            for (i, ch) in line.chars().take(width as usize).enumerate() {
                if let Some(g) = self.glyph_mut(start + i as i32, row) {
                    g.ch = ch;
                    g.fg = TEXT_COLOR;
                }
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        let cols = self.cols as usize;

        for (i, glyph) in self.screen.iter().enumerate() {
            if self.shown[i] == Some(*glyph) {
                continue;
            }
            let (col, row) = ((i % cols) as u16 + 1, (i / cols) as u16 + 1);
            queue!(
                self.stdout,
                cursor::MoveTo(col, row),
                style::SetForegroundColor(term_color(glyph.fg)),
                style::SetBackgroundColor(term_color(glyph.bg)),
                style::Print(glyph.ch)
            )?;
            self.shown[i] = Some(*glyph);
        }

        queue!(self.stdout, style::ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Terminal columns and rows the board itself covers. The frame and status
/// line on top of that must still fit in a `u16`.
fn grid_size(board: &Board) -> Result<(u16, u16)> {
    let width = u16::try_from(board.columns() * 2 + 2).context("board is too wide for a terminal")?;
    let height = u16::try_from(board.rows() + 3).context("board is too tall for a terminal")?;
    Ok((width - 2, height - 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_cell_is_two_columns_wide() {
        assert_eq!(grid_size(&Board::new(500, 500, 25)).unwrap(), (40, 20));
        assert_eq!(grid_size(&Board::new(125, 50, 25)).unwrap(), (10, 2));
    }

    #[test]
    fn oversized_boards_are_an_error_not_a_wrap() {
        // 40000 columns would wrap to 14464 terminal columns with a plain cast.
        assert!(grid_size(&Board::new(25 * 40_000, 500, 25)).is_err());
        assert!(grid_size(&Board::new(500, 25 * 70_000, 25)).is_err());
    }
}
