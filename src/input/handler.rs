use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key press to an action, given the snake's current heading.
    ///
    /// A movement key pointing straight back is dropped here already; the
    /// engine rejects it again on update.
    pub fn handle_key_event(&self, key: KeyEvent, current: Direction) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = Self::direction_for(key.code) {
            return if current.is_opposite(direction) {
                KeyAction::None
            } else {
                KeyAction::Turn(direction)
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            _ => KeyAction::None,
        }
    }

    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            // Arrow keys
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),

            // WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),

            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
