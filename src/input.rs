use std::io;
use std::str::FromStr;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Serialize;
use thiserror::Error;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)` on the grid; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("unrecognized direction token {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ParseDirectionError(other.to_owned())),
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Space: start when stopped, pause when running.
    StartPause,
    /// Enter: start, or play again after the round ended.
    Confirm,
    /// Footer "Reset": clear the session and begin a fresh round.
    Reset,
    ToggleTheme,
    Quit,
    Resize { width: u16, height: u16 },
}

/// Reads terminal events and decodes them into [`GameInput`].
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and decodes it.
    ///
    /// Events that do not map to a game input yield `Ok(None)`.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Resize(width, height) => Some(GameInput::Resize { width, height }),
            _ => None,
        })
    }
}

/// Maps one key press to a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            GameInput::Direction(Direction::Right)
        }
        KeyCode::Char(' ') => GameInput::StartPause,
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char('r' | 'R') => GameInput::Reset,
        KeyCode::Char('t' | 'T') => GameInput::ToggleTheme,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}
