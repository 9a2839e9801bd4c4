//! Events emitted by collision resolution
//!
//! Score and lives are never written by the resolver; the round controller
//! folds these events into its state, and the host reads the same list for
//! sounds and logging.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// The subject was hit (player: costs a life)
    Hit,
    /// Points awarded for the subject
    Scored { points: u32 },
    /// The subject left the hittable state
    Destroyed,
    /// Round-ending collision (snake wall/self hit)
    Fatal,
    /// Nothing left to play for (snake filled the board)
    Cleared,
}

/// Who it happened to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Player,
    Entity(EntityId),
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub subject: Subject,
    /// Pixel position for pooled entities and the ship, cell coordinates for grid games
    pub at: Vec2,
}

impl GameEvent {
    pub fn new(kind: EventKind, subject: Subject, at: Vec2) -> Self {
        Self { kind, subject, at }
    }

    pub fn points(&self) -> u32 {
        match self.kind {
            EventKind::Scored { points } => points,
            _ => 0,
        }
    }
}
