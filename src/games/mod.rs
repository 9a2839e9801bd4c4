//! The arcade games
//!
//! Balloon popper, comets and snake plug into `sim::RoundController`.
//! Tic-tac-toe is turn-based and has its own rule engine.

pub mod asteroids;
pub mod balloon;
pub mod snake;
pub mod tictactoe;

pub use asteroids::CometsGame;
pub use balloon::BalloonGame;
pub use snake::SnakeGame;
pub use tictactoe::TicTacToe;

use rand::Rng;

use crate::settings::Settings;
use crate::sim::entity::Bounds;
use crate::sim::round::Game;

/// Which game a page hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Balloon,
    Comets,
    Snake,
    TicTacToe,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Balloon,
        GameKind::Comets,
        GameKind::Snake,
        GameKind::TicTacToe,
    ];

    /// Parse a URL hash/query value such as `#snake` or `?game=comets`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim_start_matches(['#', '?']);
        let name = name.strip_prefix("game=").unwrap_or(name);
        match name.to_lowercase().as_str() {
            "balloon" | "balloons" | "balloon-popper" => Some(GameKind::Balloon),
            "comets" | "asteroids" => Some(GameKind::Comets),
            "snake" => Some(GameKind::Snake),
            "tictactoe" | "tic-tac-toe" => Some(GameKind::TicTacToe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Balloon => "balloon",
            GameKind::Comets => "comets",
            GameKind::Snake => "snake",
            GameKind::TicTacToe => "tictactoe",
        }
    }

    /// Build the real-time game for this kind; `None` for tic-tac-toe
    pub fn build(&self, settings: &Settings, bounds: Bounds) -> Option<Box<dyn Game>> {
        match self {
            GameKind::Balloon => Some(Box::new(BalloonGame::new(settings.balloon.clone(), bounds))),
            GameKind::Comets => Some(Box::new(CometsGame::new(settings.asteroids.clone(), bounds))),
            GameKind::Snake => Some(Box::new(SnakeGame::new(settings.snake.clone(), bounds))),
            GameKind::TicTacToe => None,
        }
    }
}

/// Uniform sample in `[min, max)`; `min` when the range is empty
pub(crate) fn between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min).max(0.0)
}
