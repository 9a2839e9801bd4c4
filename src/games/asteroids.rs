//! Comets
//!
//! Asteroids fall from the top edge. The ship cannot shoot: it destroys
//! asteroids by sweeping its glowing trail through them, and loses a life
//! when one touches the hull. Out of lives ends the round.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::between;
use crate::renderer::{Frame, Shape, Style, TextAlign, TextStyle};
use crate::settings::AsteroidTuning;
use crate::sim::collision::resolve_ship;
use crate::sim::entity::{Asteroid, Bounds, Color, Entity, EntityKind, Ship};
use crate::sim::events::GameEvent;
use crate::sim::pool::EntityPool;
use crate::sim::round::{Game, RoundState, TickContext};
use crate::sim::spawn::{SpawnPolicy, SpawnTimer};
use crate::sim::step::{self, advance_ship};
use crate::spread;

pub const STORAGE_KEY: &str = "cometsHighScore";

const ROCK_FILL: Color = Color::rgb(0x8B, 0x45, 0x13);
const ROCK_EDGE: Color = Color::rgb(0x65, 0x43, 0x21);
const SHIP_FILL: Color = Color::rgb(0x00, 0xFF, 0xFF);
const SHIP_EDGE: Color = Color::rgb(0x00, 0x80, 0xFF);
const STAR_COUNT: usize = 50;

pub struct CometsGame {
    tuning: AsteroidTuning,
    bounds: Bounds,
    pool: EntityPool,
    spawner: SpawnTimer,
    ship: Ship,
}

impl CometsGame {
    pub fn new(tuning: AsteroidTuning, bounds: Bounds) -> Self {
        let spawner = SpawnTimer::new(
            SpawnPolicy::new(tuning.spawn_floor_ms, tuning.spawn_step_ms),
            tuning.spawn_start_ms,
        );
        Self {
            tuning,
            bounds,
            pool: EntityPool::new(),
            spawner,
            ship: Ship::new(bounds.center()),
        }
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.pool
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn spawner(&self) -> &SpawnTimer {
        &self.spawner
    }

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    /// A new asteroid just above the top edge, drifting down
    fn make_asteroid<R: Rng>(&self, rng: &mut R) -> Entity {
        let size = between(rng, self.tuning.min_size, self.tuning.max_size);
        let x = between(rng, 0.0, self.bounds.width);
        let vel = Vec2::new(spread(rng.random(), 2.0), between(rng, 1.0, 3.0));
        let rotation_speed = spread(rng.random(), 0.05);

        Entity::new(
            Vec2::new(x, -size),
            vel,
            size,
            EntityKind::Asteroid(Asteroid {
                rotation: 0.0,
                rotation_speed,
                points: Asteroid::points_for_size(size),
            }),
        )
    }

    fn draw_stars(&self, ticks: u64, frame: &mut Frame) {
        let t = ticks as f32 * 1000.0 / crate::consts::TICKS_PER_SECOND;
        let style = Style::fill(Color::rgba(255, 255, 255, 0.3));
        for i in 0..STAR_COUNT {
            let x = (i * 37) as f32 % self.bounds.width;
            let y = (i * 73) as f32 % self.bounds.height;
            let size = (t * 0.001 + i as f32).sin() * 0.5 + 0.5;
            frame.circle(Vec2::new(x, y), size, style);
        }
    }

    fn draw_ship(&self, frame: &mut Frame) {
        let s = self.ship.size;
        let hull = vec![
            Vec2::new(s, 0.0),
            Vec2::new(-s, s * 0.5),
            Vec2::new(-s * 0.5, 0.0),
            Vec2::new(-s, -s * 0.5),
        ];
        frame.shape(
            Shape::Polygon {
                points: hull,
                rotation: self.ship.angle,
            },
            self.ship.pos,
            Style::fill(SHIP_FILL).with_stroke(SHIP_EDGE, 2.0),
        );

        if self.ship.is_moving() {
            let engine = Vec2::from_angle(self.ship.angle).rotate(Vec2::new(-s * 0.8, 0.0));
            frame.circle(
                self.ship.pos + engine,
                s * 0.3,
                Style::fill(Color::rgba(255, 255, 0, 0.8)),
            );
        }
    }
}

/// Lumpy octagon outline for an asteroid of `size`
fn rock_outline(size: f32) -> Vec<Vec2> {
    (0..8)
        .map(|i| {
            let angle = i as f32 / 8.0 * TAU;
            let radius = size + (angle * 3.0).sin() * 5.0;
            Vec2::from_angle(angle) * radius
        })
        .collect()
}

impl Game for CometsGame {
    fn name(&self) -> &'static str {
        "Comets"
    }

    fn storage_key(&self) -> &'static str {
        STORAGE_KEY
    }

    fn starting_lives(&self) -> Option<u32> {
        Some(self.tuning.lives)
    }

    fn level_step(&self) -> Option<u32> {
        Some(self.tuning.level_step)
    }

    fn reset(&mut self, _rng: &mut Pcg32) {
        self.pool.clear();
        self.spawner.reset();
        self.ship = Ship::new(self.bounds.center());
    }

    fn spawn(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32) {
        if self.spawner.poll(ctx.now_ms) {
            let asteroid = self.make_asteroid(rng);
            let id = self.pool.add(asteroid);
            log::debug!("Spawned asteroid {}", id);
        }
    }

    fn advance(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32) {
        advance_ship(&mut self.ship, ctx.input.movement(), &self.bounds);
        step::advance(&mut self.pool, rng);
    }

    fn resolve(&mut self, _ctx: &TickContext<'_>, rng: &mut Pcg32) -> Vec<GameEvent> {
        resolve_ship(&mut self.pool, &self.ship, rng)
    }

    fn prune(&mut self) {
        self.pool.prune_expired(&self.bounds);
    }

    fn draw(&self, round: &RoundState, frame: &mut Frame) {
        frame.clear();
        frame.rect(
            Vec2::ZERO,
            Vec2::new(self.bounds.width, self.bounds.height),
            Style::fill(Color::BLACK),
        );
        self.draw_stars(round.ticks, frame);

        for segment in &self.ship.trail {
            let fade = segment.life.fraction();
            let size = (fade * 12.0).max(4.0);
            frame.circle(segment.pos, size, Style::fill(SHIP_FILL.with_alpha(fade * 0.6)));
            frame.circle(
                segment.pos,
                size * 0.5,
                Style::fill(SHIP_FILL.with_alpha(fade * 0.3)),
            );
        }

        for entity in self.pool.iter() {
            match &entity.kind {
                EntityKind::Particle(p) => {
                    frame.circle(
                        entity.pos,
                        entity.radius,
                        Style::fill(p.color.with_alpha(p.life.fraction())),
                    );
                }
                EntityKind::Asteroid(a) => {
                    frame.shape(
                        Shape::Polygon {
                            points: rock_outline(entity.radius),
                            rotation: a.rotation,
                        },
                        entity.pos,
                        Style::fill(ROCK_FILL).with_stroke(ROCK_EDGE, 2.0),
                    );
                }
                EntityKind::Balloon(_) => {}
            }
        }

        self.draw_ship(frame);

        let ui = TextStyle::new(Color::rgba(255, 255, 255, 0.8), 20.0, TextAlign::Left);
        frame.text(format!("Score: {}", round.score), Vec2::new(10.0, 30.0), ui);
        frame.text(
            format!("Lives: {}", round.lives.unwrap_or(0)),
            Vec2::new(10.0, 60.0),
            ui,
        );
        frame.text(format!("Level: {}", round.level), Vec2::new(10.0, 90.0), ui);
    }
}
