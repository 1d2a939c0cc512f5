//! Ordered entity registries
//!
//! Every add or remove appends the matching `Spawned` / `Despawned` event in
//! the same call, so the render side can mirror the registry exactly.
//! Removing an id that is not registered means the two sides have drifted
//! apart; that is a bug and panics.

use super::combatant::{Enemy, Guard, Pursuer, Tower};
use super::entity::{EntityId, EntityKind, Transform};
use super::events::GameEvent;
use super::obstacle::Obstacle;
use super::projectile::Projectile;

/// Anything stored in a registry
pub trait Registered {
    fn entity_id(&self) -> EntityId;
    fn entity_kind(&self) -> EntityKind;
    fn transform(&self) -> Transform;
}

macro_rules! registered_enemy {
    ($($ty:ty),*) => {
        $(
            impl Registered for $ty {
                fn entity_id(&self) -> EntityId {
                    self.id()
                }

                fn entity_kind(&self) -> EntityKind {
                    <$ty as Enemy>::KIND
                }

                fn transform(&self) -> Transform {
                    self.body().transform()
                }
            }
        )*
    };
}

registered_enemy!(Guard, Pursuer, Tower);

impl Registered for Projectile {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_kind(&self) -> EntityKind {
        Projectile::entity_kind(self)
    }

    fn transform(&self) -> Transform {
        self.body.transform()
    }
}

impl Registered for Obstacle {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn transform(&self) -> Transform {
        Obstacle::transform(self)
    }
}

/// Unique-membership, insertion-ordered collection
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Registered> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.entity_id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.entity_id() == id)
    }

    #[inline]
    pub fn at(&self, index: usize) -> &T {
        &self.items[index]
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.entity_id() == id)
    }

    pub fn add(&mut self, item: T, events: &mut Vec<GameEvent>) {
        let id = item.entity_id();
        assert!(!self.contains(id), "registry desync: {id} added twice");
        events.push(GameEvent::Spawned {
            id,
            kind: item.entity_kind(),
        });
        self.items.push(item);
    }

    /// Remove by id, keeping the order of the rest
    pub fn remove(&mut self, id: EntityId, events: &mut Vec<GameEvent>) -> T {
        let Some(index) = self.position(id) else {
            panic!("registry desync: {id} is not registered");
        };
        self.remove_at(index, events)
    }

    /// Remove by index, keeping the order of the rest
    pub fn remove_at(&mut self, index: usize, events: &mut Vec<GameEvent>) -> T {
        let item = self.items.remove(index);
        events.push(GameEvent::Despawned {
            id: item.entity_id(),
            kind: item.entity_kind(),
        });
        item
    }

    /// Remove everything, last to first
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        while let Some(item) = self.items.pop() {
            events.push(GameEvent::Despawned {
                id: item.entity_id(),
                kind: item.entity_kind(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn obstacle(n: u32) -> Obstacle {
        Obstacle::new(EntityId(n), Vec3::new(n as f32, 0.5, 0.0))
    }

    #[test]
    fn test_add_remove_emit_paired_events() {
        let mut events = Vec::new();
        let mut registry = Registry::new();
        registry.add(obstacle(1), &mut events);
        registry.add(obstacle(2), &mut events);

        let removed = registry.remove(EntityId(1), &mut events);

        assert_eq!(removed.id, EntityId(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            events,
            vec![
                GameEvent::Spawned { id: EntityId(1), kind: EntityKind::Obstacle },
                GameEvent::Spawned { id: EntityId(2), kind: EntityKind::Obstacle },
                GameEvent::Despawned { id: EntityId(1), kind: EntityKind::Obstacle },
            ]
        );
    }

    #[test]
    fn test_clear_runs_in_reverse() {
        let mut events = Vec::new();
        let mut registry = Registry::new();
        for n in 1..=3 {
            registry.add(obstacle(n), &mut events);
        }
        events.clear();

        registry.clear(&mut events);

        let order: Vec<EntityId> = events
            .iter()
            .map(|e| match e {
                GameEvent::Despawned { id, .. } => *id,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(order, vec![EntityId(3), EntityId(2), EntityId(1)]);
        assert!(registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "registry desync")]
    fn test_removing_unknown_id_panics() {
        let mut events = Vec::new();
        let mut registry: Registry<Obstacle> = Registry::new();
        registry.remove(EntityId(42), &mut events);
    }
}
