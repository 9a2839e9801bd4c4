//! Timer-gated spawning with a difficulty ramp
//!
//! Every trigger shortens the interval by a fixed step until it reaches the
//! floor, so the spawn cadence tightens monotonically over a round.

use serde::{Deserialize, Serialize};

/// Pure spawn decision: floor and decay step for one game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    /// Shortest interval the ramp may reach (ms)
    pub floor_ms: f64,
    /// Interval reduction per trigger (ms)
    pub step_ms: f64,
}

impl SpawnPolicy {
    /// A negative or NaN step counts as no decay
    pub fn new(floor_ms: f64, step_ms: f64) -> Self {
        Self {
            floor_ms,
            step_ms: step_ms.max(0.0),
        }
    }

    /// Decide whether to spawn and return the interval to use afterwards.
    pub fn maybe_spawn(&self, now_ms: f64, last_spawn_ms: f64, interval_ms: f64) -> (bool, f64) {
        if now_ms - last_spawn_ms > interval_ms {
            (true, (interval_ms - self.step_ms).max(self.floor_ms))
        } else {
            (false, interval_ms)
        }
    }
}

/// Spawn policy plus the mutable timer state a round owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    policy: SpawnPolicy,
    initial_ms: f64,
    interval_ms: f64,
    last_spawn_ms: f64,
}

impl SpawnTimer {
    pub fn new(policy: SpawnPolicy, initial_ms: f64) -> Self {
        Self {
            policy,
            initial_ms,
            interval_ms: initial_ms,
            last_spawn_ms: 0.0,
        }
    }

    /// Returns true when an entity should be created this tick
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let (spawn, interval) = self
            .policy
            .maybe_spawn(now_ms, self.last_spawn_ms, self.interval_ms);
        if spawn {
            self.last_spawn_ms = now_ms;
            if interval != self.interval_ms {
                log::debug!("Spawn interval {} -> {} ms", self.interval_ms, interval);
            }
            self.interval_ms = interval;
        }
        spawn
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Back to the initial interval; the next poll spawns immediately
    pub fn reset(&mut self) {
        self.interval_ms = self.initial_ms;
        self.last_spawn_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_balloon_ramp_reaches_floor() {
        let policy = SpawnPolicy::new(500.0, 10.0);
        let mut interval = 1500.0;
        let mut last = 0.0;
        let mut now = 0.0;
        for _ in 0..100 {
            now += interval + 1.0;
            let (spawn, next) = policy.maybe_spawn(now, last, interval);
            assert!(spawn);
            last = now;
            interval = next;
        }
        assert_eq!(interval, 500.0);
    }

    #[test]
    fn test_no_spawn_at_exact_interval() {
        let policy = SpawnPolicy::new(500.0, 20.0);
        assert_eq!(policy.maybe_spawn(3000.0, 1000.0, 2000.0), (false, 2000.0));
        assert_eq!(policy.maybe_spawn(3001.0, 1000.0, 2000.0), (true, 1980.0));
    }

    #[test]
    fn test_timer_reset() {
        let mut timer = SpawnTimer::new(SpawnPolicy::new(500.0, 20.0), 2000.0);
        assert!(timer.poll(10_000.0));
        assert!(!timer.poll(10_500.0));
        assert!(timer.poll(12_000.0));
        assert_eq!(timer.interval_ms(), 1960.0);

        timer.reset();
        assert_eq!(timer.interval_ms(), 2000.0);
        assert_eq!(timer.last_spawn_ms(), 0.0);
    }

    #[test]
    fn test_negative_step_never_grows() {
        let mut timer = SpawnTimer::new(SpawnPolicy::new(500.0, -50.0), 1500.0);
        let mut now = 0.0;
        for _ in 0..10 {
            now += 5000.0;
            assert!(timer.poll(now));
            assert_eq!(timer.interval_ms(), 1500.0);
        }
    }

    proptest! {
        #[test]
        fn prop_interval_monotonic_and_floored(
            start in 500.0f64..5000.0,
            floor in 100.0f64..500.0,
            step in 0.0f64..200.0,
            gaps in prop::collection::vec(0.0f64..3000.0, 1..200),
        ) {
            let mut timer = SpawnTimer::new(SpawnPolicy::new(floor, step), start);
            let mut now = 0.0;
            let mut prev = timer.interval_ms();
            for gap in gaps {
                now += gap;
                timer.poll(now);
                let interval = timer.interval_ms();
                prop_assert!(interval <= prev);
                prop_assert!(interval >= floor);
                prev = interval;
            }
        }
    }
}
