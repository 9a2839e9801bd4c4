//! Per-tick motion and aging
//!
//! Integration is per tick, not per second: velocities are pixels/tick and
//! every decay is a fixed amount per tick. The spawn and physics constants
//! are tuned for ~60 ticks/second, so the simulation deliberately does not
//! scale by elapsed time.

use glam::Vec2;
use rand::Rng;

use super::entity::{
    Bounds, Entity, EntityKind, Lifetime, MAX_SPARKS, SHIP_FRICTION, SPARKS_PER_TICK, Ship, Spark,
    TRAIL_CAP, TrailSegment,
};
use super::pool::EntityPool;
use crate::spread;

/// Advance every pooled entity by one tick
pub fn advance<R: Rng>(pool: &mut EntityPool, rng: &mut R) {
    for entity in pool.iter_mut() {
        advance_entity(entity, rng);
    }
}

fn advance_entity<R: Rng>(entity: &mut Entity, rng: &mut R) {
    let destroyed = entity.is_destroyed();
    match &mut entity.kind {
        EntityKind::Balloon(balloon) => {
            if !destroyed {
                entity.pos += entity.vel;
                return;
            }

            balloon.pop_animation += 0.1;

            // Emit the burst over the first few ticks after the pop
            if balloon.sparks_emitted < MAX_SPARKS {
                let count = SPARKS_PER_TICK.min(MAX_SPARKS - balloon.sparks_emitted);
                for _ in 0..count {
                    balloon.sparks.push(Spark {
                        pos: entity.pos
                            + Vec2::new(spread(rng.random(), 10.0), spread(rng.random(), 10.0)),
                        vel: Vec2::new(spread(rng.random(), 4.0), spread(rng.random(), 4.0)),
                        life: Lifetime::new(1.0, 0.02),
                    });
                }
                balloon.sparks_emitted += count;
            }

            for spark in &mut balloon.sparks {
                spark.update();
            }
            balloon.sparks.retain(|s| !s.life.expired());
        }
        EntityKind::Asteroid(asteroid) => {
            entity.pos += entity.vel;
            asteroid.rotation += asteroid.rotation_speed;
        }
        EntityKind::Particle(particle) => {
            entity.pos += entity.vel;
            entity.vel.y += particle.gravity;
            particle.life.tick();
        }
    }
}

/// Move the ship for one tick.
///
/// `direction` is the host-normalized input vector (diagonals already scaled).
pub fn advance_ship(ship: &mut Ship, direction: Vec2, bounds: &Bounds) {
    let direction = if direction.is_finite() {
        direction
    } else {
        Vec2::ZERO
    };

    ship.vel += direction * ship.thrust * 0.1;
    ship.vel *= SHIP_FRICTION;

    let speed = ship.vel.length();
    if speed > ship.max_speed {
        ship.vel = ship.vel / speed * ship.max_speed;
    }

    ship.pos += ship.vel;
    wrap_position(&mut ship.pos, ship.size, bounds);

    if direction != Vec2::ZERO {
        ship.angle = direction.y.atan2(direction.x);
    }

    ship.trail.push(TrailSegment::new(ship.pos));
    for segment in &mut ship.trail {
        segment.life.tick();
    }
    ship.trail.retain(|s| !s.life.expired());
    if ship.trail.len() > TRAIL_CAP {
        let excess = ship.trail.len() - TRAIL_CAP;
        ship.trail.drain(..excess);
    }
}

/// Wrap a position around the playfield, each axis independently.
///
/// Leaving past `-margin` re-enters at `extent + margin` and vice versa.
pub fn wrap_position(pos: &mut Vec2, margin: f32, bounds: &Bounds) {
    pos.x = wrap_axis(pos.x, margin, bounds.width);
    pos.y = wrap_axis(pos.y, margin, bounds.height);
}

#[inline]
fn wrap_axis(value: f32, margin: f32, extent: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Balloon, Color};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn balloon(pos: Vec2, speed: f32) -> Entity {
        Entity::new(
            pos,
            Vec2::new(0.0, -speed),
            30.0,
            EntityKind::Balloon(Balloon::new(Color::WHITE, 40.0)),
        )
    }

    #[test]
    fn test_balloon_rises() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = EntityPool::new();
        pool.add(balloon(Vec2::new(100.0, 600.0), 2.0));
        advance(&mut pool, &mut rng);
        advance(&mut pool, &mut rng);
        let e = pool.iter().next().unwrap();
        assert_eq!(e.pos, Vec2::new(100.0, 596.0));
    }

    #[test]
    fn test_popped_balloon_burst_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = EntityPool::new();
        let id = pool.add(balloon(Vec2::new(100.0, 300.0), 2.0));
        pool.get_mut(id).unwrap().destroy();

        for _ in 0..200 {
            advance(&mut pool, &mut rng);
            let e = pool.get(id).unwrap();
            // Popped balloons stop moving
            assert_eq!(e.pos, Vec2::new(100.0, 300.0));
            if let EntityKind::Balloon(b) = &e.kind {
                assert!(b.sparks.len() <= MAX_SPARKS as usize);
                assert!(b.sparks_emitted <= MAX_SPARKS);
            }
        }

        let e = pool.get(id).unwrap();
        assert!(e.is_expired(&Bounds::default()));
    }

    #[test]
    fn test_particle_gravity_and_decay() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = EntityPool::new();
        pool.add(Entity::particle(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE));
        advance(&mut pool, &mut rng);
        let e = pool.iter().next().unwrap();
        assert_eq!(e.pos, Vec2::new(1.0, 0.0));
        assert!((e.vel.y - 0.1).abs() < 1e-6);
        if let EntityKind::Particle(p) = &e.kind {
            assert!((p.life.remaining() - 0.98).abs() < 1e-6);
        }
    }

    #[test]
    fn test_asteroid_moves_and_spins() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = EntityPool::new();
        pool.add(Entity::new(
            Vec2::new(10.0, -20.0),
            Vec2::new(1.5, 2.0),
            20.0,
            EntityKind::Asteroid(Asteroid {
                rotation: 0.0,
                rotation_speed: 0.05,
                points: 2,
            }),
        ));
        advance(&mut pool, &mut rng);
        let e = pool.iter().next().unwrap();
        assert_eq!(e.pos, Vec2::new(11.5, -18.0));
        if let EntityKind::Asteroid(a) = &e.kind {
            assert!((a.rotation - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ship_wraps_right_edge() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut ship = Ship::new(Vec2::new(800.0 + 15.0, 250.0));
        ship.vel = Vec2::new(2.0, 0.0);
        // Friction first: 2.0 * 0.95 = 1.9, so x = 816.9 > 815 and wraps
        advance_ship(&mut ship, Vec2::ZERO, &bounds);
        assert_eq!(ship.pos.x, -15.0);
        assert_eq!(ship.pos.y, 250.0);
        assert!((ship.vel.x - 1.9).abs() < 1e-6);
        assert_eq!(ship.vel.y, 0.0);
    }

    #[test]
    fn test_wrap_position_each_axis() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut pos = Vec2::new(-16.0, 616.0);
        wrap_position(&mut pos, 15.0, &bounds);
        assert_eq!(pos, Vec2::new(815.0, -15.0));

        let mut pos = Vec2::new(400.0, -15.0);
        wrap_position(&mut pos, 15.0, &bounds);
        assert_eq!(pos, Vec2::new(400.0, -15.0));
    }

    #[test]
    fn test_ship_speed_clamped() {
        let bounds = Bounds::default();
        let mut ship = Ship::new(bounds.center());
        for _ in 0..500 {
            advance_ship(&mut ship, Vec2::new(1.0, 0.0), &bounds);
            assert!(ship.vel.length() <= ship.max_speed + 1e-4);
        }
        assert_eq!(ship.angle, 0.0);
    }

    #[test]
    fn test_trail_is_bounded() {
        let bounds = Bounds::default();
        let mut ship = Ship::new(bounds.center());
        for _ in 0..1000 {
            advance_ship(&mut ship, Vec2::new(0.707, 0.707), &bounds);
        }
        assert!(ship.trail.len() <= TRAIL_CAP);
        assert!(ship.trail.iter().all(|s| !s.life.expired()));
    }

    #[test]
    fn test_nan_input_is_ignored() {
        let bounds = Bounds::default();
        let mut ship = Ship::new(bounds.center());
        advance_ship(&mut ship, Vec2::new(f32::NAN, 0.0), &bounds);
        assert_eq!(ship.pos, bounds.center());
    }
}
