//! Game settings and tuning
//!
//! Persisted separately from high scores in LocalStorage. Every gameplay
//! constant lives in a tuning block so a round can be built from settings;
//! the defaults are the classic values.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{KeyValueStore, load_json, save_json};

/// Balloon popper tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonTuning {
    /// Spawn interval at round start (ms)
    pub spawn_start_ms: f64,
    pub spawn_floor_ms: f64,
    /// Interval reduction per spawn (ms)
    pub spawn_step_ms: f64,
    /// Pops needed to win
    pub win_score: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Rise speed range (px/tick)
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for BalloonTuning {
    fn default() -> Self {
        Self {
            spawn_start_ms: 1500.0,
            spawn_floor_ms: 500.0,
            spawn_step_ms: 10.0,
            win_score: 25,
            min_radius: 20.0,
            max_radius: 50.0,
            min_speed: 1.0,
            max_speed: 3.0,
        }
    }
}

/// Comets tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    pub spawn_start_ms: f64,
    pub spawn_floor_ms: f64,
    pub spawn_step_ms: f64,
    pub lives: u32,
    /// Score per level (level rises while score > level * step)
    pub level_step: u32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self {
            spawn_start_ms: 2000.0,
            spawn_floor_ms: 500.0,
            spawn_step_ms: 20.0,
            lives: 3,
            level_step: 100,
            min_size: 20.0,
            max_size: 50.0,
        }
    }
}

/// Snake tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    /// Cell edge in pixels; the board is canvas / cell
    pub cell_px: f32,
    /// Time between moves (ms)
    pub step_ms: f64,
    pub food_points: u32,
    pub start_length: usize,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            cell_px: 20.0,
            step_ms: 150.0,
            food_points: 10,
            start_length: 3,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Tuning ===
    pub balloon: BalloonTuning,
    pub asteroids: AsteroidTuning,
    pub snake: SnakeTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            balloon: BalloonTuning::default(),
            asteroids: AsteroidTuning::default(),
            snake: SnakeTuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "arcade_loop_settings";

    /// Load settings, falling back to defaults on any storage problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from storage");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    /// Effective effect volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Clamp hand-edited values back into playable ranges
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);

        let b = &mut self.balloon;
        if !(b.min_radius > 0.0 && b.max_radius >= b.min_radius) {
            b.min_radius = defaults.balloon.min_radius;
            b.max_radius = defaults.balloon.max_radius;
        }
        if !(b.min_speed > 0.0 && b.max_speed >= b.min_speed) {
            b.min_speed = defaults.balloon.min_speed;
            b.max_speed = defaults.balloon.max_speed;
        }
        b.spawn_floor_ms = b.spawn_floor_ms.max(0.0);
        b.spawn_start_ms = b.spawn_start_ms.max(b.spawn_floor_ms);
        b.spawn_step_ms = b.spawn_step_ms.max(0.0);
        b.win_score = b.win_score.max(1);

        let a = &mut self.asteroids;
        if !(a.min_size > 0.0 && a.max_size >= a.min_size) {
            a.min_size = defaults.asteroids.min_size;
            a.max_size = defaults.asteroids.max_size;
        }
        a.spawn_floor_ms = a.spawn_floor_ms.max(0.0);
        a.spawn_start_ms = a.spawn_start_ms.max(a.spawn_floor_ms);
        a.spawn_step_ms = a.spawn_step_ms.max(0.0);
        a.lives = a.lives.max(1);
        a.level_step = a.level_step.max(1);

        let s = &mut self.snake;
        if !(s.cell_px >= 4.0) {
            s.cell_px = defaults.snake.cell_px;
        }
        s.step_ms = s.step_ms.max(1.0);
        // Whole body must fit left of the centred head
        let max_length = ((crate::consts::CANVAS_WIDTH / s.cell_px) as usize / 2).max(1);
        s.start_length = s.start_length.clamp(1, max_length);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_defaults_are_classic_values() {
        let s = Settings::default();
        assert_eq!(s.balloon.spawn_start_ms, 1500.0);
        assert_eq!(s.balloon.win_score, 25);
        assert_eq!(s.asteroids.spawn_start_ms, 2000.0);
        assert_eq!(s.asteroids.spawn_step_ms, 20.0);
        assert_eq!(s.asteroids.lives, 3);
        assert_eq!(s.snake.step_ms, 150.0);
        assert_eq!(s.snake.food_points, 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"sound": false, "balloon": {"win_score": 10}}"#)
            .unwrap();
        let s = Settings::load(&store);
        assert!(!s.sound);
        assert_eq!(s.balloon.win_score, 10);
        assert_eq!(s.balloon.spawn_start_ms, 1500.0);
        assert_eq!(s.effective_volume(), 0.0);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{broken").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.snake.step_ms = 100.0;
        s.save(&mut store);
        assert_eq!(Settings::load(&store).snake.step_ms, 100.0);
    }

    #[test]
    fn test_save_writes_back_sanitized_values() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"master_volume": 4.0, "snake": {"start_length": 900}}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        loaded.save(&mut store);

        let raw = store.get(Settings::STORAGE_KEY).unwrap().unwrap();
        let stored: Settings = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, loaded);
        assert_eq!(stored.master_volume, 1.0);
        assert_eq!(stored.snake.start_length, 20);
    }

    #[test]
    fn test_sanitize_inverted_ranges() {
        let mut s = Settings::default();
        s.balloon.min_radius = 60.0;
        s.balloon.max_radius = 10.0;
        s.master_volume = 3.0;
        let s = s.sanitized();
        assert_eq!(s.balloon.min_radius, 20.0);
        assert_eq!(s.balloon.max_radius, 50.0);
        assert_eq!(s.master_volume, 1.0);
    }

    #[test]
    fn test_negative_spawn_step_cleared_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{"balloon": {"spawn_step_ms": -50}, "asteroids": {"spawn_step_ms": -5}}"#,
            )
            .unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.balloon.spawn_step_ms, 0.0);
        assert_eq!(s.asteroids.spawn_step_ms, 0.0);
    }

    #[test]
    fn test_start_length_capped_to_board() {
        let mut s = Settings::default();
        s.snake.start_length = 500;
        let s = s.sanitized();
        // 800 / 20 = 40 columns, head at column 20
        assert_eq!(s.snake.start_length, 20);

        let mut s = Settings::default();
        s.snake.start_length = 0;
        assert_eq!(s.sanitized().snake.start_length, 1);
    }
}
