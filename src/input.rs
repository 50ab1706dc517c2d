use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::geometry::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Start,
    Reset,
    Quit,
}

impl Command {
    pub fn from_key_event(ev: KeyEvent) -> Option<Command> {
        if is_ctrl_c(&ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => Some(Command::Turn(Up)),
            KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(Left)),
            KeyCode::Char('s') | KeyCode::Down => Some(Command::Turn(Down)),
            KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(Right)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Whether `ev` ends the program wherever it is pressed.
pub fn is_quit(ev: KeyEvent) -> bool {
    Command::from_key_event(ev) == Some(Command::Quit)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
