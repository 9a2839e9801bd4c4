//! Input intent buffer
//!
//! Event handlers only write here; the round reads it at the start of a
//! tick. Held keys persist until released. Clicks, turns and pause requests
//! are one-shot and cleared once a tick has consumed them.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::DIAGONAL_FACTOR;

/// Steering direction (arrow keys or WASD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Keys the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Move(Direction),
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unknown keys are `None`.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Move(Direction::Up)),
            "s" | "arrowdown" => Some(Key::Move(Direction::Down)),
            "a" | "arrowleft" => Some(Key::Move(Direction::Left)),
            "d" | "arrowright" => Some(Key::Move(Direction::Right)),
            " " => Some(Key::Pause),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    /// Last click in canvas pixels (one-shot)
    pub last_click: Option<Vec2>,
    /// Last steering key pressed this tick (one-shot)
    pub turn: Option<Direction>,
    /// Pause toggle requested (one-shot)
    pub pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Move(direction) => self.turn = Some(direction),
            Key::Pause => self.pause_requested = true,
        }
        self.pressed.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Record a click; non-finite coordinates are dropped
    pub fn click(&mut self, pos: Vec2) {
        if pos.is_finite() {
            self.last_click = Some(pos);
        }
    }

    /// Held-key movement vector, diagonals scaled by 0.707
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_pressed(Key::Move(Direction::Up)) {
            dir.y -= 1.0;
        }
        if self.is_pressed(Key::Move(Direction::Down)) {
            dir.y += 1.0;
        }
        if self.is_pressed(Key::Move(Direction::Left)) {
            dir.x -= 1.0;
        }
        if self.is_pressed(Key::Move(Direction::Right)) {
            dir.x += 1.0;
        }
        if dir.x != 0.0 && dir.y != 0.0 {
            dir *= DIAGONAL_FACTOR;
        }
        dir
    }

    /// Clear one-shot inputs after a tick has processed them
    pub fn clear_one_shots(&mut self) {
        self.last_click = None;
        self.turn = None;
        self.pause_requested = false;
    }

    /// Drop everything, including held keys
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowUp"), Some(Key::Move(Direction::Up)));
        assert_eq!(Key::from_key_name("D"), Some(Key::Move(Direction::Right)));
        assert_eq!(Key::from_key_name(" "), Some(Key::Pause));
        assert_eq!(Key::from_key_name("q"), None);
        assert_eq!(Key::from_key_name("Shift"), None);
    }

    #[test]
    fn test_diagonal_normalized() {
        let mut input = InputState::new();
        input.key_down(Key::Move(Direction::Up));
        input.key_down(Key::Move(Direction::Right));
        assert_eq!(input.movement(), Vec2::new(0.707, -0.707));

        input.key_up(Key::Move(Direction::Up));
        assert_eq!(input.movement(), Vec2::new(1.0, 0.0));

        // Opposing keys cancel
        input.key_down(Key::Move(Direction::Left));
        assert_eq!(input.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_one_shots_clear_but_held_keys_stay() {
        let mut input = InputState::new();
        input.key_down(Key::Move(Direction::Left));
        input.key_down(Key::Pause);
        input.click(Vec2::new(10.0, 20.0));
        assert_eq!(input.turn, Some(Direction::Left));
        assert!(input.pause_requested);

        input.clear_one_shots();
        assert_eq!(input.last_click, None);
        assert_eq!(input.turn, None);
        assert!(!input.pause_requested);
        assert!(input.is_pressed(Key::Move(Direction::Left)));
    }

    #[test]
    fn test_nan_click_dropped() {
        let mut input = InputState::new();
        input.click(Vec2::new(f32::NAN, 1.0));
        assert_eq!(input.last_click, None);
    }
}
