use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

/// What a key press asks the driver to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Restart,
    Quit,
    /// Unmapped key, ignored
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = Self::direction_for(key.code) {
            return KeyAction::GameAction(Action::Move(direction));
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            _ => KeyAction::None,
        }
    }

    /// Arrow keys and WASD
    fn direction_for(code: KeyCode) -> Option<Direction> {
        let direction = match code {
            KeyCode::Up => Direction::Up,
            KeyCode::Down => Direction::Down,
            KeyCode::Left => Direction::Left,
            KeyCode::Right => Direction::Right,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Direction::Up,
                's' => Direction::Down,
                'a' => Direction::Left,
                'd' => Direction::Right,
                _ => return None,
            },
            _ => return None,
        };
        Some(direction)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn moves(direction: Direction) -> KeyAction {
        KeyAction::GameAction(Action::Move(direction))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), moves(Direction::Up));
        assert_eq!(press(KeyCode::Down), moves(Direction::Down));
        assert_eq!(press(KeyCode::Left), moves(Direction::Left));
        assert_eq!(press(KeyCode::Right), moves(Direction::Right));
    }

    #[test]
    fn test_wasd_either_case() {
        assert_eq!(press(KeyCode::Char('w')), moves(Direction::Up));
        assert_eq!(press(KeyCode::Char('A')), moves(Direction::Left));
        assert_eq!(press(KeyCode::Char('s')), moves(Direction::Down));
        assert_eq!(press(KeyCode::Char('D')), moves(Direction::Right));
    }

    #[test]
    fn test_quit_and_restart() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('r')), KeyAction::Restart);
        assert_eq!(press(KeyCode::Char('R')), KeyAction::Restart);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Enter), KeyAction::None);
        assert_eq!(press(KeyCode::F(1)), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
