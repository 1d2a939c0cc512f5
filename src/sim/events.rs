//! Typed events for the collaborator bus.
//!
//! Events are appended in the same order the registries change, so a
//! collaborator replaying them keeps its own scene in lockstep.

use super::entity::{EntityId, EntityKind};
use crate::audio::SoundEffect;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind },
    Despawned { id: EntityId, kind: EntityKind },
    Sound { source: EntityId, effect: SoundEffect },
    ProtectionChanged { id: EntityId, protected: bool },
    StageLoaded { stage: u32 },
    StageCleared { stage: u32 },
    GameOver { won: bool },
}
