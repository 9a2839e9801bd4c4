//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no external files. Which sounds to
//! play is decided from a tick's events (pure, testable anywhere); playing
//! them needs a browser.

use crate::games::GameKind;
use crate::sim::events::{EventKind, GameEvent, Subject};
use crate::sim::round::{Hud, RoundPhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Balloon popped
    Pop,
    /// Asteroid swept by the trail
    AsteroidDestroyed,
    /// Asteroid hit the ship
    ShipHit,
    /// Snake ate food
    Eat,
    RoundWon,
    RoundLost,
    /// New best score
    HighScore,
}

/// Sounds for one tick. `before`/`after` are the HUD snapshots around it.
pub fn effects_for(kind: GameKind, events: &[GameEvent], before: &Hud, after: &Hud) -> Vec<SoundEffect> {
    let mut effects = Vec::new();

    for event in events {
        let effect = match (event.kind, event.subject) {
            (EventKind::Scored { .. }, Subject::Food) => Some(SoundEffect::Eat),
            (EventKind::Scored { .. }, _) => match kind {
                GameKind::Balloon => Some(SoundEffect::Pop),
                GameKind::Comets => Some(SoundEffect::AsteroidDestroyed),
                _ => None,
            },
            (EventKind::Hit, Subject::Player) => Some(SoundEffect::ShipHit),
            _ => None,
        };
        if let Some(effect) = effect {
            // One of each per tick is plenty
            if !effects.contains(&effect) {
                effects.push(effect);
            }
        }
    }

    if before.phase == RoundPhase::Running {
        match after.phase {
            RoundPhase::Won => effects.push(SoundEffect::RoundWon),
            RoundPhase::Lost => effects.push(SoundEffect::RoundLost),
            RoundPhase::Running => {}
        }
    }
    if after.new_best && !before.new_best {
        effects.push(SoundEffect::HighScore);
    }
    effects
}

#[cfg(target_arch = "wasm32")]
pub use manager::AudioManager;

#[cfg(target_arch = "wasm32")]
mod manager {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Pop => self.play_pop(ctx, vol),
                SoundEffect::AsteroidDestroyed => self.play_crumble(ctx, vol),
                SoundEffect::ShipHit => self.play_ship_hit(ctx, vol),
                SoundEffect::Eat => self.play_eat(ctx, vol),
                SoundEffect::RoundWon => self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1),
                SoundEffect::RoundLost => self.play_arpeggio(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2),
                SoundEffect::HighScore => {
                    self.play_arpeggio(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08)
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Balloon pop - 200Hz to 50Hz drop
        fn play_pop(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Asteroid destroyed - low crumble
        fn play_crumble(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Ship hit - thump plus crack
        fn play_ship_hit(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(150.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Snake eat - short rising blip
        fn play_eat(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Note sequence, `spacing` seconds apart
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], spacing: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn hud(phase: RoundPhase, new_best: bool) -> Hud {
        Hud {
            score: 0,
            lives: None,
            level: None,
            length: None,
            best: 0,
            phase,
            paused: false,
            new_best,
        }
    }

    #[test]
    fn test_scores_map_per_game() {
        let running = hud(RoundPhase::Running, false);
        let pop = [
            GameEvent::new(EventKind::Scored { points: 1 }, Subject::Entity(1), Vec2::ZERO),
            GameEvent::new(EventKind::Destroyed, Subject::Entity(1), Vec2::ZERO),
            GameEvent::new(EventKind::Scored { points: 1 }, Subject::Entity(2), Vec2::ZERO),
        ];
        assert_eq!(
            effects_for(GameKind::Balloon, &pop, &running, &running),
            vec![SoundEffect::Pop]
        );
        assert_eq!(
            effects_for(GameKind::Comets, &pop, &running, &running),
            vec![SoundEffect::AsteroidDestroyed]
        );

        let eat = [GameEvent::new(EventKind::Scored { points: 10 }, Subject::Food, Vec2::ZERO)];
        assert_eq!(
            effects_for(GameKind::Snake, &eat, &running, &running),
            vec![SoundEffect::Eat]
        );
    }

    #[test]
    fn test_round_end_sounds_once() {
        let running = hud(RoundPhase::Running, false);
        let lost = hud(RoundPhase::Lost, true);
        let hit = [GameEvent::new(EventKind::Hit, Subject::Player, Vec2::ZERO)];
        assert_eq!(
            effects_for(GameKind::Comets, &hit, &running, &lost),
            vec![SoundEffect::ShipHit, SoundEffect::RoundLost, SoundEffect::HighScore]
        );
        // Later frozen ticks stay quiet
        assert!(effects_for(GameKind::Comets, &[], &lost, &lost).is_empty());
    }
}
