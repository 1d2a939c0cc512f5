//! Behavior state machines
//!
//! Each combatant carries independent slots (movement, combat), each holding
//! at most one owned [`State`]. Replacing a state calls `enter` on the new
//! one but NOT `exit` on the old one: callers that need a clean exit call
//! [`StateMachine::exit`] themselves. The death path relies on this, exit
//! runs exactly once when a combatant is retired, never on ordinary
//! assignment.

use rand_pcg::Pcg32;

use super::entity::{Body, EntityId};
use super::events::GameEvent;
use super::projectile::Projectile;
use super::steering::Target;
use crate::audio::SoundEffect;

/// The part of a combatant that behaviors may drive
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: EntityId,
    pub body: Body,
}

impl Actor {
    pub fn new(id: EntityId, body: Body) -> Self {
        Self { id, body }
    }
}

/// Everything a behavior may read or produce during one tick
pub struct BehaviorContext<'a> {
    /// Session time in seconds
    pub elapsed: f32,
    /// The player, as seen at the start of the enemy pass
    pub target: Target,
    pub rng: &'a mut Pcg32,
    /// Projectiles fired this tick, registered by the world afterwards
    pub spawned: &'a mut Vec<Projectile>,
    pub events: &'a mut Vec<GameEvent>,
}

impl BehaviorContext<'_> {
    pub fn play(&mut self, source: EntityId, effect: SoundEffect) {
        self.events.push(GameEvent::Sound { source, effect });
    }

    pub fn fire(&mut self, projectile: Projectile) {
        self.spawned.push(projectile);
    }
}

pub trait State {
    fn enter(&mut self, _owner: &mut Actor, _ctx: &mut BehaviorContext<'_>) {}

    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>);

    fn exit(&mut self, _owner: &mut Actor, _ctx: &mut BehaviorContext<'_>) {}
}

/// Holds the current state of one behavior slot
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    current: Option<S>,
}

impl<S> Default for StateMachine<S> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.current.as_mut()
    }

    /// Install `state` and enter it. The previous state is handed back
    /// without having its `exit` called.
    pub fn set_state(
        &mut self,
        state: S,
        owner: &mut Actor,
        ctx: &mut BehaviorContext<'_>,
    ) -> Option<S> {
        let previous = self.current.replace(state);
        if let Some(current) = self.current.as_mut() {
            current.enter(owner, ctx);
        }
        previous
    }

    /// Execute the current state; an empty slot does nothing
    pub fn tick(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if let Some(current) = self.current.as_mut() {
            current.execute(owner, ctx);
        }
    }

    /// Explicitly exit the current state (kept in the slot)
    pub fn exit(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if let Some(current) = self.current.as_mut() {
            current.exit(owner, ctx);
        }
    }
}
