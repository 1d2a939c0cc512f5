//! Simulation module
//!
//! All gameplay logic lives here. The core never touches a device:
//! - Session clock drives every behavior timer
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - Audio and render are reached only through the event bus

pub mod animation;
pub mod bounds;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod combatant;
pub mod entity;
pub mod events;
pub mod fsm;
pub mod movement;
pub mod obstacle;
pub mod projectile;
pub mod registry;
pub mod separation;
pub mod stage;
pub mod steering;
pub mod tick;
pub mod world;

pub use animation::{AnimatedProperty, AnimationSystem, PropertyAnimation};
pub use bounds::Field;
pub use combat::{CombatPattern, DefaultPattern, FocusPattern, SpreadPattern};
pub use combatant::{Enemy, Guard, Health, HitOutcome, Message, Player, Pursuer, Tower};
pub use entity::{Body, EntityId, EntityKind, Transform};
pub use events::GameEvent;
pub use movement::{Circle, LeftRight, MovementPattern, PursuitMovement, Wavy};
pub use obstacle::Obstacle;
pub use projectile::{Projectile, ProjectileKind};
pub use registry::{Registered, Registry};
pub use stage::{ScriptedStages, StageCatalog, StageDef, StageError, StageSource};
pub use tick::{TickInput, tick};
pub use world::{Registries, StagePhase, World};
