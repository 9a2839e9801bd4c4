//! Balloon popper
//!
//! Balloons rise from below the canvas; clicking one pops it for a point.
//! The round is won at the target score. There is no losing condition.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::between;
use crate::renderer::{Frame, Style, TextAlign, TextStyle};
use crate::settings::BalloonTuning;
use crate::sim::collision::resolve_click;
use crate::sim::entity::{Balloon, Bounds, Color, Entity, EntityKind};
use crate::sim::events::GameEvent;
use crate::sim::pool::EntityPool;
use crate::sim::round::{Game, RoundState, TickContext};
use crate::sim::spawn::{SpawnPolicy, SpawnTimer};
use crate::sim::step;

pub const STORAGE_KEY: &str = "balloonHighScore";

pub const PALETTE: [Color; 10] = [
    Color::rgb(0xFF, 0x6B, 0x6B), // Red
    Color::rgb(0x4E, 0xCD, 0xC4), // Teal
    Color::rgb(0x45, 0xB7, 0xD1), // Blue
    Color::rgb(0x96, 0xCE, 0xB4), // Green
    Color::rgb(0xFF, 0xEA, 0xA7), // Yellow
    Color::rgb(0xDD, 0xA0, 0xDD), // Plum
    Color::rgb(0xFF, 0xB3, 0x47), // Orange
    Color::rgb(0x98, 0xD8, 0xC8), // Mint
    Color::rgb(0xF7, 0xDC, 0x6F), // Gold
    Color::rgb(0xBB, 0x8F, 0xCE), // Purple
];

const STRING_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);

pub struct BalloonGame {
    tuning: BalloonTuning,
    bounds: Bounds,
    pool: EntityPool,
    spawner: SpawnTimer,
}

impl BalloonGame {
    pub fn new(tuning: BalloonTuning, bounds: Bounds) -> Self {
        let spawner = SpawnTimer::new(
            SpawnPolicy::new(tuning.spawn_floor_ms, tuning.spawn_step_ms),
            tuning.spawn_start_ms,
        );
        Self {
            tuning,
            bounds,
            pool: EntityPool::new(),
            spawner,
        }
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn spawner(&self) -> &SpawnTimer {
        &self.spawner
    }

    /// A new balloon just below the bottom edge, fully inside horizontally
    fn make_balloon<R: Rng>(&self, rng: &mut R) -> Entity {
        let t = &self.tuning;
        let radius = between(rng, t.min_radius, t.max_radius);
        let x = between(rng, radius, (self.bounds.width - radius).max(radius));
        let speed = between(rng, t.min_speed, t.max_speed);
        let color = PALETTE.choose(rng).copied().unwrap_or(Color::WHITE);
        let string_length = between(rng, 30.0, 80.0);

        Entity::new(
            Vec2::new(x, self.bounds.height + radius),
            Vec2::new(0.0, -speed),
            radius,
            EntityKind::Balloon(Balloon::new(color, string_length)),
        )
    }
}

impl Game for BalloonGame {
    fn name(&self) -> &'static str {
        "Balloon Popper"
    }

    fn storage_key(&self) -> &'static str {
        STORAGE_KEY
    }

    fn win_score(&self) -> Option<u32> {
        Some(self.tuning.win_score)
    }

    fn reset(&mut self, _rng: &mut Pcg32) {
        self.pool.clear();
        self.spawner.reset();
    }

    fn spawn(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32) {
        if self.spawner.poll(ctx.now_ms) {
            let balloon = self.make_balloon(rng);
            let id = self.pool.add(balloon);
            log::debug!("Spawned balloon {}", id);
        }
    }

    fn advance(&mut self, _ctx: &TickContext<'_>, rng: &mut Pcg32) {
        step::advance(&mut self.pool, rng);
    }

    fn resolve(&mut self, ctx: &TickContext<'_>, _rng: &mut Pcg32) -> Vec<GameEvent> {
        match ctx.input.last_click {
            Some(click) => resolve_click(&mut self.pool, click),
            None => Vec::new(),
        }
    }

    fn prune(&mut self) {
        self.pool.prune_expired(&self.bounds);
    }

    fn draw(&self, round: &RoundState, frame: &mut Frame) {
        frame.clear();
        frame.rect(
            Vec2::ZERO,
            Vec2::new(self.bounds.width, self.bounds.height),
            Style::fill(Color::rgba(135, 206, 250, 0.3)),
        );

        for entity in self.pool.iter() {
            let EntityKind::Balloon(balloon) = &entity.kind else {
                continue;
            };
            let (pos, r) = (entity.pos, entity.radius);

            if entity.is_destroyed() {
                for spark in &balloon.sparks {
                    let alpha = spark.life.remaining();
                    frame.circle(spark.pos, 3.0, Style::fill(Color::WHITE.with_alpha(alpha)));
                }
                continue;
            }

            let knot = pos + Vec2::new(0.0, r);
            frame.line(knot, knot + Vec2::new(0.0, balloon.string_length), STRING_COLOR, 2.0);
            frame.circle(pos, r, Style::fill(balloon.color));
            frame.circle(
                pos - Vec2::splat(r * 0.3),
                r * 0.4,
                Style::fill(Color::rgba(255, 255, 255, 0.3)),
            );
            frame.circle(knot, 3.0, Style::fill(STRING_COLOR));
        }

        frame.text(
            format!("Score: {}/{}", round.score, self.tuning.win_score),
            Vec2::new(self.bounds.width / 2.0, 30.0),
            TextStyle::new(Color::rgba(255, 255, 255, 0.8), 24.0, TextAlign::Center),
        );
    }
}
