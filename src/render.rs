//! Render collaborator interface
//!
//! The core never reads back from the render side. It announces spawns and
//! despawns in registry order, then pushes every live transform once per
//! dispatch.

use std::collections::HashMap;

use crate::sim::{EntityId, EntityKind, GameEvent, Transform};

pub trait RenderSink {
    fn spawn(&mut self, id: EntityId, kind: EntityKind);

    fn despawn(&mut self, id: EntityId, kind: EntityKind);

    /// Copy the current transform into the drawable
    fn sync(&mut self, id: EntityId, transform: Transform);

    /// An obstacle's bounding volumes were recomputed
    fn obstacle_changed(&mut self, id: EntityId, transform: Transform) {
        self.sync(id, transform);
    }

    /// Non-registry events (protection, stage and game-over signals)
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Keeps a plain copy of the scene
#[derive(Debug, Default)]
pub struct SceneMirror {
    pub entities: HashMap<EntityId, (EntityKind, Option<Transform>)>,
    pub obstacle_updates: usize,
    pub notifications: Vec<GameEvent>,
}

impl SceneMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|(k, _)| *k == kind).count()
    }

    pub fn transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).and_then(|(_, t)| *t)
    }
}

impl RenderSink for SceneMirror {
    fn spawn(&mut self, id: EntityId, kind: EntityKind) {
        let previous = self.entities.insert(id, (kind, None));
        debug_assert!(previous.is_none(), "{id} spawned twice");
    }

    fn despawn(&mut self, id: EntityId, _kind: EntityKind) {
        let removed = self.entities.remove(&id);
        debug_assert!(removed.is_some(), "{id} despawned but never spawned");
    }

    fn sync(&mut self, id: EntityId, transform: Transform) {
        if let Some((_, slot)) = self.entities.get_mut(&id) {
            *slot = Some(transform);
        }
    }

    fn obstacle_changed(&mut self, id: EntityId, transform: Transform) {
        self.obstacle_updates += 1;
        self.sync(id, transform);
    }

    fn notify(&mut self, event: &GameEvent) {
        self.notifications.push(event.clone());
    }
}
