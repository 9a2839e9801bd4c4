//! Collision detection and resolution
//!
//! Everything in the pooled games is a circle, so one overlap predicate
//! covers clicks, ship hits and trail sweeps. Resolution is first-match-wins:
//! a pairing stops scanning at its first hit, nothing is damage-summed.
//! Particles spawned by hits are collected first and added to the pool after
//! the scan, so the pool is never mutated while it is being walked.

use glam::Vec2;
use rand::Rng;

use super::entity::{Color, Entity, EntityKind, Ship};
use super::events::{EventKind, GameEvent, Subject};
use super::grid::{Grid, Snake, StepOutcome};
use super::pool::EntityPool;
use crate::consts::TRAIL_PICKUP_RADIUS;
use crate::{finite_distance, spread};

/// Ship explosion color (cyan)
pub const SHIP_DEBRIS: Color = Color::rgb(0, 255, 255);
/// Asteroid explosion color (brown)
pub const ROCK_DEBRIS: Color = Color::rgb(139, 69, 19);

/// Circular overlap test: `distance(a, b) <= ra + rb`.
///
/// Any non-finite coordinate or radius is a miss.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    reach.is_finite() && finite_distance(a, b) <= reach
}

/// Explosion debris around `center`
pub fn burst<R: Rng>(
    rng: &mut R,
    center: Vec2,
    count: usize,
    jitter: f32,
    speed: f32,
    color: Color,
) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let pos = center + Vec2::new(spread(rng.random(), jitter), spread(rng.random(), jitter));
            let vel = Vec2::new(spread(rng.random(), speed), spread(rng.random(), speed));
            Entity::particle(pos, vel, color)
        })
        .collect()
}

/// Pop every live balloon under the click point
pub fn resolve_click(pool: &mut EntityPool, click: Vec2) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !click.is_finite() {
        return events;
    }

    for entity in pool.iter_mut() {
        if !matches!(entity.kind, EntityKind::Balloon(_)) || !entity.is_hittable() {
            continue;
        }
        if circles_overlap(click, 0.0, entity.pos, entity.radius) && entity.destroy() {
            let subject = Subject::Entity(entity.id);
            events.push(GameEvent::new(EventKind::Scored { points: 1 }, subject, entity.pos));
            events.push(GameEvent::new(EventKind::Destroyed, subject, entity.pos));
        }
    }

    if !events.is_empty() {
        log::debug!("Click at {:?} popped {} balloon(s)", click, events.len() / 2);
    }
    events
}

/// Ship-vs-asteroid and trail-vs-asteroid resolution for one tick.
///
/// The ship takes at most one hit per tick (the first asteroid in pool
/// order). Each surviving asteroid is then checked against the trail and
/// destroyed by its first touching segment.
pub fn resolve_ship<R: Rng>(pool: &mut EntityPool, ship: &Ship, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut debris: Vec<Entity> = Vec::new();

    for asteroid in pool.iter_mut() {
        if !is_live_asteroid(asteroid) {
            continue;
        }
        if circles_overlap(asteroid.pos, asteroid.radius, ship.pos, ship.size) {
            asteroid.destroy();
            events.push(GameEvent::new(EventKind::Hit, Subject::Player, ship.pos));
            events.push(GameEvent::new(
                EventKind::Destroyed,
                Subject::Entity(asteroid.id),
                asteroid.pos,
            ));
            debris.extend(burst(rng, ship.pos, 10, 10.0, 4.0, SHIP_DEBRIS));
            log::debug!("Ship hit by asteroid {}", asteroid.id);
            break;
        }
    }

    for asteroid in pool.iter_mut() {
        if !is_live_asteroid(asteroid) {
            continue;
        }
        let touched = ship.trail.iter().any(|segment| {
            circles_overlap(segment.pos, TRAIL_PICKUP_RADIUS, asteroid.pos, asteroid.radius)
        });
        if touched && asteroid.destroy() {
            let points = match &asteroid.kind {
                EntityKind::Asteroid(a) => a.points,
                _ => 0,
            };
            let subject = Subject::Entity(asteroid.id);
            events.push(GameEvent::new(EventKind::Scored { points }, subject, asteroid.pos));
            events.push(GameEvent::new(EventKind::Destroyed, subject, asteroid.pos));
            debris.extend(burst(rng, asteroid.pos, 8, 15.0, 3.0, ROCK_DEBRIS));
        }
    }

    pool.extend(debris);
    events
}

fn is_live_asteroid(entity: &Entity) -> bool {
    matches!(entity.kind, EntityKind::Asteroid(_)) && entity.is_hittable()
}

/// Grid-exact snake resolution: one committed move (or a fatal block).
///
/// `food_points` is awarded when the new head lands on the food cell.
pub fn resolve_snake<R: Rng>(
    snake: &mut Snake,
    grid: &Grid,
    food: &mut Option<super::grid::Cell>,
    food_points: u32,
    rng: &mut R,
) -> Vec<GameEvent> {
    match snake.step(grid, food, rng) {
        StepOutcome::Moved => Vec::new(),
        StepOutcome::Ate { eaten, board_full } => {
            let mut events = vec![GameEvent::new(
                EventKind::Scored {
                    points: food_points,
                },
                Subject::Food,
                eaten.as_vec2(),
            )];
            if board_full {
                events.push(GameEvent::new(
                    EventKind::Cleared,
                    Subject::Player,
                    snake.head().as_vec2(),
                ));
            }
            events
        }
        StepOutcome::Blocked { at, reason } => {
            log::debug!("Snake blocked at {:?} ({:?})", at, reason);
            vec![GameEvent::new(EventKind::Fatal, Subject::Player, at.as_vec2())]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Balloon, TrailSegment};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn balloon_at(pos: Vec2, radius: f32) -> Entity {
        Entity::new(
            pos,
            Vec2::new(0.0, -1.0),
            radius,
            EntityKind::Balloon(Balloon::new(Color::WHITE, 40.0)),
        )
    }

    fn asteroid_at(pos: Vec2, size: f32) -> Entity {
        Entity::new(
            pos,
            Vec2::ZERO,
            size,
            EntityKind::Asteroid(Asteroid {
                rotation: 0.0,
                rotation_speed: 0.0,
                points: Asteroid::points_for_size(size),
            }),
        )
    }

    fn scored(events: &[GameEvent]) -> u32 {
        events.iter().map(GameEvent::points).sum()
    }

    #[test]
    fn test_overlap_is_inclusive() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn test_nan_is_a_miss() {
        assert!(!circles_overlap(Vec2::new(f32::NAN, 0.0), 5.0, Vec2::ZERO, 5.0));
        assert!(!circles_overlap(Vec2::ZERO, f32::NAN, Vec2::ZERO, 5.0));

        let mut pool = EntityPool::new();
        pool.add(balloon_at(Vec2::ZERO, 30.0));
        assert!(resolve_click(&mut pool, Vec2::new(f32::NAN, f32::NAN)).is_empty());
    }

    #[test]
    fn test_click_pops_once() {
        let mut pool = EntityPool::new();
        pool.add(balloon_at(Vec2::new(100.0, 100.0), 30.0));
        pool.add(balloon_at(Vec2::new(400.0, 100.0), 30.0));

        let events = resolve_click(&mut pool, Vec2::new(110.0, 120.0));
        assert_eq!(scored(&events), 1);

        // Same spot again: the popped balloon is no longer hittable
        let events = resolve_click(&mut pool, Vec2::new(110.0, 120.0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_click_pops_every_overlapping_balloon() {
        let mut pool = EntityPool::new();
        pool.add(balloon_at(Vec2::new(100.0, 100.0), 30.0));
        pool.add(balloon_at(Vec2::new(120.0, 100.0), 30.0));
        let events = resolve_click(&mut pool, Vec2::new(110.0, 100.0));
        assert_eq!(scored(&events), 2);
    }

    #[test]
    fn test_click_miss() {
        let mut pool = EntityPool::new();
        pool.add(balloon_at(Vec2::new(100.0, 100.0), 20.0));
        assert!(resolve_click(&mut pool, Vec2::new(130.0, 100.0)).is_empty());
    }

    #[test]
    fn test_ship_hit_first_match_wins() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = EntityPool::new();
        let first = pool.add(asteroid_at(Vec2::new(400.0, 300.0), 30.0));
        let second = pool.add(asteroid_at(Vec2::new(410.0, 300.0), 30.0));
        let ship = Ship::new(Vec2::new(400.0, 300.0));

        let events = resolve_ship(&mut pool, &ship, &mut rng);
        let hits = events.iter().filter(|e| e.kind == EventKind::Hit).count();
        assert_eq!(hits, 1);
        assert!(pool.get(first).is_some_and(|e| e.is_destroyed()));
        assert!(pool.get(second).is_some_and(|e| !e.is_destroyed()));
        // 10 debris particles at the ship
        let particles = pool
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Particle(_)))
            .count();
        assert_eq!(particles, 10);
    }

    #[test]
    fn test_trail_destroys_and_scores() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = EntityPool::new();
        let rock = pool.add(asteroid_at(Vec2::new(100.0, 100.0), 35.0));
        let mut ship = Ship::new(Vec2::new(600.0, 500.0));
        // Two segments both touching: still one score
        ship.trail.push(TrailSegment::new(Vec2::new(140.0, 100.0)));
        ship.trail.push(TrailSegment::new(Vec2::new(138.0, 100.0)));

        let events = resolve_ship(&mut pool, &ship, &mut rng);
        assert_eq!(scored(&events), 3);
        assert!(pool.get(rock).is_some_and(|e| e.is_destroyed()));

        // Already destroyed: never scores again
        let events = resolve_ship(&mut pool, &ship, &mut rng);
        assert_eq!(scored(&events), 0);
    }

    #[test]
    fn test_trail_pickup_radius() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = EntityPool::new();
        pool.add(asteroid_at(Vec2::new(100.0, 100.0), 20.0));
        let mut ship = Ship::new(Vec2::new(600.0, 500.0));
        ship.trail.push(TrailSegment::new(Vec2::new(128.5, 100.0)));
        assert!(resolve_ship(&mut pool, &ship, &mut rng).is_empty());

        ship.trail.push(TrailSegment::new(Vec2::new(128.0, 100.0)));
        assert_eq!(scored(&resolve_ship(&mut pool, &ship, &mut rng)), 2);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            ra in 0.0f32..100.0, rb in 0.0f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ra, b, rb), circles_overlap(b, rb, a, ra));
        }
    }
}
