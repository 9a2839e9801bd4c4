//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come in from the host, never from a real clock
//! - Seeded RNG only
//! - Stable iteration order (pool insertion order)
//! - No canvas or DOM dependencies; drawing goes through `renderer::Frame`

pub mod clock;
pub mod collision;
pub mod entity;
pub mod events;
pub mod grid;
pub mod pool;
pub mod round;
pub mod spawn;
pub mod step;

pub use clock::{Clock, StepGate};
pub use collision::{circles_overlap, resolve_click, resolve_ship, resolve_snake};
pub use entity::{Bounds, Color, Entity, EntityId, EntityKind, Ship};
pub use events::{EventKind, GameEvent, Subject};
pub use grid::{Cell, Grid, Heading, Snake, StepOutcome};
pub use pool::EntityPool;
pub use round::{Game, Hud, RoundController, RoundPhase, RoundState, TickContext};
pub use spawn::{SpawnPolicy, SpawnTimer};
pub use step::{advance, advance_ship, wrap_position};
