//! Entity types shared by the simulation games
//!
//! Pool entities carry a common header (id, position, velocity, radius,
//! destroyed flag) and a `EntityKind` payload. The player actors (ship,
//! snake) are owned by their game directly, not by the pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identity of an entity inside an `EntityPool`
pub type EntityId = u32;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(crate::consts::CANVAS_WIDTH, crate::consts::CANVAS_HEIGHT)
    }
}

/// RGBA color (alpha 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

/// Remaining life of a transient effect.
///
/// Life only ever goes down; `expired` once it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    life: f32,
    max_life: f32,
    decay: f32,
}

impl Lifetime {
    pub fn new(life: f32, decay: f32) -> Self {
        Self {
            life,
            max_life: life,
            decay: decay.abs(),
        }
    }

    /// Apply one tick of decay
    #[inline]
    pub fn tick(&mut self) {
        self.life -= self.decay;
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.life
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life as a 0-1 fraction (for fading)
    pub fn fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Free particle decay per tick
pub const PARTICLE_DECAY: f32 = 0.02;
/// Downward bias added to a free particle's vy each tick
pub const PARTICLE_GRAVITY: f32 = 0.1;
/// Downward bias for balloon pop sparks (heavier than free particles)
pub const SPARK_GRAVITY: f32 = 0.2;
/// Total sparks a popped balloon emits
pub const MAX_SPARKS: u8 = 10;
/// Sparks emitted per tick while the pop is still emitting
pub const SPARKS_PER_TICK: u8 = 3;
/// Trail segment life in seconds
pub const TRAIL_LIFE_SECS: f32 = 2.0;
/// Upper bound on the ship's trail (one segment per tick for its lifetime)
pub const TRAIL_CAP: usize = 120;

/// A pop spark owned by a balloon (never in the pool itself)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: Lifetime,
}

impl Spark {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += SPARK_GRAVITY;
        self.life.tick();
    }
}

/// Balloon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balloon {
    pub color: Color,
    pub string_length: f32,
    /// Grows by 0.1 per tick after the pop
    pub pop_animation: f32,
    /// Sparks emitted so far (emission stops at `MAX_SPARKS`)
    pub sparks_emitted: u8,
    pub sparks: Vec<Spark>,
}

impl Balloon {
    pub fn new(color: Color, string_length: f32) -> Self {
        Self {
            color,
            string_length,
            pop_animation: 0.0,
            sparks_emitted: 0,
            sparks: Vec::new(),
        }
    }

    /// The pop has finished emitting and every spark has died
    pub fn burst_finished(&self) -> bool {
        self.sparks_emitted >= MAX_SPARKS && self.sparks.is_empty()
    }
}

/// Asteroid payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Score for destroying it, floor(size / 10)
    pub points: u32,
}

impl Asteroid {
    pub fn points_for_size(size: f32) -> u32 {
        (size / 10.0).floor().max(0.0) as u32
    }
}

/// Free-floating explosion particle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub life: Lifetime,
    pub gravity: f32,
    pub color: Color,
}

/// Entity variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Balloon(Balloon),
    Asteroid(Asteroid),
    Particle(Particle),
}

/// A pooled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned by the pool on insertion
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual/collision radius (asteroid "size")
    pub radius: f32,
    destroyed: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, kind: EntityKind) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            radius,
            destroyed: false,
            kind,
        }
    }

    pub fn particle(pos: Vec2, vel: Vec2, color: Color) -> Self {
        Self::new(
            pos,
            vel,
            2.0,
            EntityKind::Particle(Particle {
                life: Lifetime::new(1.0, PARTICLE_DECAY),
                gravity: PARTICLE_GRAVITY,
                color,
            }),
        )
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed. Returns false if it already was (one-way transition).
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }

    /// Can still be hit by clicks, the ship, or the trail
    pub fn is_hittable(&self) -> bool {
        !self.destroyed && !matches!(self.kind, EntityKind::Particle(_))
    }

    /// Prune predicate
    pub fn is_expired(&self, bounds: &Bounds) -> bool {
        match &self.kind {
            // A popped balloon stays until its burst has played out
            EntityKind::Balloon(balloon) => {
                self.pos.y + self.radius < 0.0 || (self.destroyed && balloon.burst_finished())
            }
            EntityKind::Asteroid(_) => {
                self.destroyed
                    || self.pos.y > bounds.height + self.radius
                    || self.pos.x < -self.radius
                    || self.pos.x > bounds.width + self.radius
            }
            EntityKind::Particle(particle) => self.destroyed || particle.life.expired(),
        }
    }
}

/// A fading segment of the ship's trail
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailSegment {
    pub pos: Vec2,
    pub life: Lifetime,
}

impl TrailSegment {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            life: Lifetime::new(TRAIL_LIFE_SECS, crate::consts::TICK_DT),
        }
    }
}

/// The comets player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Thrust factor applied to input direction
    pub thrust: f32,
    pub max_speed: f32,
    /// Bounding radius, also the wrap-around margin
    pub size: f32,
    /// Facing direction (radians), follows input
    pub angle: f32,
    /// Oldest segment first
    pub trail: Vec<TrailSegment>,
}

/// Ship friction multiplier per tick
pub const SHIP_FRICTION: f32 = 0.95;

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            thrust: 5.0,
            max_speed: 8.0,
            size: 15.0,
            angle: 0.0,
            trail: Vec::with_capacity(TRAIL_CAP),
        }
    }

    /// Engine glow shows while moving
    pub fn is_moving(&self) -> bool {
        self.vel.x.abs() > 0.1 || self.vel.y.abs() > 0.1
    }
}
