//! Tick timing
//!
//! Host timestamps are milliseconds (`requestAnimationFrame` / `Date.now()`).
//! Nothing here reads a real clock; every call takes `now_ms` explicitly.

use serde::{Deserialize, Serialize};

/// Tracks the time between successive ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    last_tick_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick and return milliseconds since the previous one.
    ///
    /// The first tick after construction or `reset` reports 0 so a restart
    /// never produces a physics spike. A timestamp older than the last one
    /// also reports 0.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_tick_ms {
            Some(last) if now_ms.is_finite() => (now_ms - last).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_tick_ms = Some(now_ms);
        }
        elapsed
    }

    /// Timestamp of the last recorded tick
    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick_ms
    }

    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}

/// Fixed-step gate that decouples a game's move rate from the frame rate.
///
/// Elapsed time accumulates until it strictly exceeds `step_ms`; the gate
/// then fires once and the accumulator restarts from zero (leftover time is
/// dropped, never replayed as a burst of steps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepGate {
    step_ms: f64,
    accumulated_ms: f64,
}

impl StepGate {
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            accumulated_ms: 0.0,
        }
    }

    /// Feed one tick's elapsed time; returns true when a step is due
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.accumulated_ms += elapsed_ms;
        }
        if self.accumulated_ms > self.step_ms {
            self.accumulated_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_reports_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.tick(5000.0), 0.0);
        assert_eq!(clock.tick(5016.0), 16.0);
        assert_eq!(clock.tick(5050.0), 34.0);
    }

    #[test]
    fn test_reset_avoids_spike() {
        let mut clock = Clock::new();
        clock.tick(1000.0);
        clock.tick(1016.0);
        clock.reset();
        assert_eq!(clock.last_tick(), None);
        assert_eq!(clock.tick(90_000.0), 0.0);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = Clock::new();
        clock.tick(1000.0);
        assert_eq!(clock.tick(900.0), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.last_tick(), Some(900.0));
    }

    #[test]
    fn test_step_gate() {
        let mut gate = StepGate::new(150.0);
        // 9 frames of 16ms = 144ms, not enough
        for _ in 0..9 {
            assert!(!gate.advance(16.0));
        }
        assert!(gate.advance(16.0));
        // Exactly one step is not enough (strictly greater)
        assert!(!gate.advance(150.0));
        assert!(gate.advance(1.0));

        gate.advance(100.0);
        gate.reset();
        assert!(!gate.advance(100.0));
        assert!(!gate.advance(f64::NAN));
        assert!(gate.advance(51.0));
    }
}
