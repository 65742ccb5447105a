//! Keyboard input mapped to a single movement direction
//!
//! Arrow keys and WASD alias the same four directions. Only one direction is
//! active at a time: the last key pressed wins, and diagonals never compose.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Raw keys delivered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit step in screen space (y grows downward)
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
        }
    }
}

impl Key {
    /// Logical direction for movement keys
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Left | Key::Char('a') => Some(Direction::Left),
            Key::Right | Key::Char('d') => Some(Direction::Right),
            Key::Up | Key::Char('w') => Some(Direction::Up),
            Key::Down | Key::Char('s') => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Non-movement commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    /// Debug: add points straight to the score
    AddPoints,
}

/// Key bound to the debug add-points command
pub const ADD_POINTS_KEY: Key = Key::Char('o');

/// Current-direction slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    current: Option<Direction>,
}

impl InputState {
    pub fn current(&self) -> Option<Direction> {
        self.current
    }

    /// Handle a key press. Movement keys replace the current direction;
    /// other bound keys come back as an action.
    pub fn key_down(&mut self, key: Key) -> Option<InputAction> {
        if let Some(dir) = key.direction() {
            self.current = Some(dir);
            return None;
        }
        (key == ADD_POINTS_KEY).then_some(InputAction::AddPoints)
    }

    /// Handle a key release. Clears the direction only if the released key
    /// maps to the direction currently held.
    pub fn key_up(&mut self, key: Key) {
        if key.direction().is_some() && key.direction() == self.current {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_map_to_same_direction() {
        assert_eq!(Key::Left.direction(), Key::Char('a').direction());
        assert_eq!(Key::Right.direction(), Key::Char('d').direction());
        assert_eq!(Key::Up.direction(), Key::Char('w').direction());
        assert_eq!(Key::Down.direction(), Key::Char('s').direction());
        assert_eq!(Key::Char('x').direction(), None);
    }

    #[test]
    fn test_last_key_wins() {
        let mut input = InputState::default();
        input.key_down(Key::Left);
        input.key_down(Key::Char('w'));
        assert_eq!(input.current(), Some(Direction::Up));
    }

    #[test]
    fn test_release_of_other_direction_keeps_current() {
        let mut input = InputState::default();
        input.key_down(Key::Left);
        input.key_down(Key::Up);
        input.key_up(Key::Left);
        assert_eq!(input.current(), Some(Direction::Up));
        input.key_up(Key::Char('w'));
        assert_eq!(input.current(), None);
    }

    #[test]
    fn test_add_points_key() {
        let mut input = InputState::default();
        assert_eq!(input.key_down(Key::Char('o')), Some(InputAction::AddPoints));
        assert_eq!(input.key_down(Key::Char('q')), None);
        assert_eq!(input.current(), None);
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::Up.unit(), IVec2::new(0, -1));
        assert_eq!(Direction::Right.unit() * 30, IVec2::new(30, 0));
    }
}
