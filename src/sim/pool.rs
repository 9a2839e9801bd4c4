//! Ordered entity storage
//!
//! Entities keep insertion order (ids are monotonic, so this is also id
//! order). Removal only happens through `remove_where`, which filters in
//! place; callers never delete while iterating.

use serde::{Deserialize, Serialize};

use super::entity::{Bounds, Entity, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert an entity, assigning it a fresh id
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub fn extend(&mut self, entities: impl IntoIterator<Item = Entity>) {
        for entity in entities {
            self.add(entity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn for_each(&self, mut visit: impl FnMut(&Entity)) {
        for entity in &self.entities {
            visit(entity);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Drop every entity matching `predicate`; returns how many went
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !predicate(e));
        before - self.entities.len()
    }

    /// The prune pass: off-screen, burnt out, or destroyed
    pub fn prune_expired(&mut self, bounds: &Bounds) -> usize {
        self.remove_where(|e| e.is_expired(bounds))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Empty the pool and restart id allocation
    pub fn clear(&mut self) {
        self.entities.clear();
        self.next_id = 1;
    }
}
