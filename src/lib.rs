//! Arcade Loop - browser arcade games on one entity-simulation loop
//!
//! Core modules:
//! - `sim`: Headless simulation core (clock, spawning, pool, physics, collisions, rounds)
//! - `games`: Balloon popper, comets, snake and the tic-tac-toe rule engine
//! - `renderer`: Frame description and 2D canvas surface
//! - `platform`: Input intent buffer and key/value storage
//! - `settings`: Tunable gameplay constants
//! - `audio`: Event-driven procedural sound effects (browser playback)

pub mod audio;
pub mod games;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions shared by every game (fixed, not resized with the window)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Expected host frame rate. Physics constants are per-frame, tuned for this.
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Seconds per tick, used where the games age things in seconds
    pub const TICK_DT: f32 = 1.0 / TICKS_PER_SECOND;

    /// Trail pickup radius added to an asteroid's size
    pub const TRAIL_PICKUP_RADIUS: f32 = 8.0;
    /// Diagonal input normalization factor (≈ 1/√2)
    pub const DIAGONAL_FACTOR: f32 = 0.707;
}

/// Euclidean distance, NaN-safe: any non-finite input yields `f32::INFINITY`
#[inline]
pub fn finite_distance(a: Vec2, b: Vec2) -> f32 {
    if !a.is_finite() || !b.is_finite() {
        return f32::INFINITY;
    }
    a.distance(b)
}

/// Symmetric random offset in `[-half, half)` from a unit sample
#[inline]
pub fn spread(unit: f32, half: f32) -> f32 {
    (unit - 0.5) * 2.0 * half
}
