//! World orchestrator
//!
//! Owns every registry, the player, the session clock and the stage state
//! machine:
//!
//! ```text
//! Loading -> Active -> StageCleared -> Loading(next)
//!                   -> GameOverWon | GameOverLost
//! ```
//!
//! The per-tick sequence itself lives in `tick.rs`.

use std::rc::Rc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::animation::{AnimatedProperty, AnimationSystem, PropertyAnimation};
use super::bounds::Field;
use super::clock::Clock;
use super::combat::CombatPattern;
use super::combatant::{Enemy, EnemyCore, Guard, Player, Pursuer, Tower};
use super::entity::{Body, EntityId, EntityKind};
use super::events::GameEvent;
use super::fsm::BehaviorContext;
use super::movement::MovementPattern;
use super::obstacle::Obstacle;
use super::projectile::{Projectile, ProjectileKind};
use super::registry::{Registered, Registry};
use super::stage::{StageError, StageSource};
use super::steering::Target;
use crate::audio::{AudioSink, SoundEffect};
use crate::render::RenderSink;
use crate::Settings;

/// Stage lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StagePhase {
    /// Registries are being populated (or the last load failed)
    Loading,
    /// Simulation advancing
    Active,
    /// Showing the transition message before the next stage
    StageCleared { remaining: f32 },
    GameOverWon,
    GameOverLost,
}

/// All entity registries, one per category
#[derive(Debug, Default)]
pub struct Registries {
    pub guards: Registry<Guard>,
    pub pursuers: Registry<Pursuer>,
    pub towers: Registry<Tower>,
    pub obstacles: Registry<Obstacle>,
    pub player_projectiles: Registry<Projectile>,
    pub enemy_projectiles: Registry<Projectile>,
    pub enemy_destructible_projectiles: Registry<Projectile>,
}

impl Registries {
    /// Registry a projectile of `kind` belongs to
    pub fn projectiles_mut(&mut self, kind: ProjectileKind) -> &mut Registry<Projectile> {
        match kind {
            ProjectileKind::Player => &mut self.player_projectiles,
            ProjectileKind::Enemy => &mut self.enemy_projectiles,
            ProjectileKind::EnemyDestructible => &mut self.enemy_destructible_projectiles,
        }
    }

    pub fn projectile_count(&self) -> usize {
        self.player_projectiles.len()
            + self.enemy_projectiles.len()
            + self.enemy_destructible_projectiles.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.guards.len() + self.pursuers.len() + self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemy_count() == 0 && self.obstacles.is_empty() && self.projectile_count() == 0
    }

    /// Shared state of the enemy with `id`, whatever its type
    pub fn enemy_core_mut(&mut self, id: EntityId) -> Option<(EntityKind, &mut EnemyCore)> {
        if let Some(guard) = self.guards.get_mut(id) {
            return Some((Guard::KIND, guard.core_mut()));
        }
        if let Some(pursuer) = self.pursuers.get_mut(id) {
            return Some((Pursuer::KIND, pursuer.core_mut()));
        }
        self.towers
            .get_mut(id)
            .map(|tower| (Tower::KIND, tower.core_mut()))
    }

    /// Empty every registry, each last to first
    fn clear(&mut self, events: &mut Vec<GameEvent>) {
        self.guards.clear(events);
        self.pursuers.clear(events);
        self.towers.clear(events);
        self.obstacles.clear(events);
        self.enemy_projectiles.clear(events);
        self.enemy_destructible_projectiles.clear(events);
        self.player_projectiles.clear(events);
    }
}

/// Session RNG plus the outputs behaviors produce during a tick
#[derive(Debug)]
pub struct Bus {
    pub rng: Pcg32,
    pub spawned: Vec<Projectile>,
    pub events: Vec<GameEvent>,
}

impl Bus {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spawned: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn context(&mut self, elapsed: f32, target: Target) -> BehaviorContext<'_> {
        BehaviorContext {
            elapsed,
            target,
            rng: &mut self.rng,
            spawned: &mut self.spawned,
            events: &mut self.events,
        }
    }
}

pub struct World {
    pub(crate) settings: Settings,
    pub(crate) clock: Clock,
    pub(crate) field: Field,
    pub(crate) player: Player,
    pub(crate) registries: Registries,
    pub(crate) bus: Bus,
    pub(crate) animations: AnimationSystem,
    pub(crate) phase: StagePhase,
    pub(crate) current_stage: u32,
    pub(crate) guards_protected: bool,
    stages: Rc<dyn StageSource>,
    next_id: u32,
}

impl World {
    /// Player id is always 0
    pub const PLAYER_ID: EntityId = EntityId(0);

    pub fn new(settings: Settings, stages: Rc<dyn StageSource>) -> Self {
        let mut bus = Bus::new(settings.seed);
        bus.events.push(GameEvent::Spawned {
            id: Self::PLAYER_ID,
            kind: EntityKind::Player,
        });

        Self {
            clock: Clock::new(settings.max_delta),
            field: Field::default(),
            player: Player::with_settings(Self::PLAYER_ID, &settings),
            registries: Registries::default(),
            bus,
            animations: AnimationSystem::new(),
            phase: StagePhase::Loading,
            current_stage: 1,
            guards_protected: false,
            stages,
            next_id: 1,
            settings,
        }
    }

    // === Lifecycle ===

    /// Load stage 1 and begin
    pub fn start(&mut self) -> Result<(), StageError> {
        log::info!("starting session with {} stages", self.max_stage());
        self.load_stage(1)
    }

    /// Full reset to stage 1 from any phase
    pub fn restart(&mut self) -> Result<(), StageError> {
        log::info!("restart");
        self.player.heal();
        self.player.attach_controls();
        self.clock.resume();
        let result = self.load_stage(1);
        self.play_ui_sound(SoundEffect::ButtonClick);
        result
    }

    /// Stop advancing (e.g. focus lost). Timers freeze in place.
    pub fn suspend(&mut self) {
        if self.clock.is_running() {
            log::debug!("suspended at {:.2}s", self.clock.elapsed());
        }
        self.clock.suspend();
    }

    /// Continue after `suspend`
    pub fn resume(&mut self) {
        self.clock.resume();
        self.play_ui_sound(SoundEffect::ButtonClick);
    }

    /// Tear down and populate `stage`. On failure the world stays in
    /// `Loading` with empty registries.
    pub(crate) fn load_stage(&mut self, stage: u32) -> Result<(), StageError> {
        self.teardown();
        self.phase = StagePhase::Loading;
        self.current_stage = stage;

        let stages = Rc::clone(&self.stages);
        if let Err(err) = stages.load(stage, self) {
            log::warn!("stage {stage} failed to load: {err}");
            self.teardown();
            return Err(err);
        }

        self.phase = StagePhase::Active;
        self.player.attach_controls();
        self.bus.events.push(GameEvent::StageLoaded { stage });
        log::info!(
            "stage {stage} loaded: {} guards, {} pursuers, {} towers, {} obstacles",
            self.registries.guards.len(),
            self.registries.pursuers.len(),
            self.registries.towers.len(),
            self.registries.obstacles.len()
        );
        Ok(())
    }

    /// Empty every registry and drop stage-scoped state
    fn teardown(&mut self) {
        self.guards_protected = false;
        self.registries.clear(&mut self.bus.events);
        self.animations.clear();
        self.bus.spawned.clear();
    }

    fn play_ui_sound(&mut self, effect: SoundEffect) {
        self.bus.events.push(GameEvent::Sound {
            source: Self::PLAYER_ID,
            effect,
        });
    }

    // === Queries ===

    #[inline]
    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    /// Simulation is advancing stage content
    pub fn is_active(&self) -> bool {
        self.phase == StagePhase::Active
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, StagePhase::GameOverWon | StagePhase::GameOverLost)
    }

    pub fn current_stage(&self) -> u32 {
        self.current_stage
    }

    /// Stage that follows the current one, if any
    pub fn next_stage(&self) -> Option<u32> {
        let next = self.current_stage + 1;
        (next <= self.max_stage()).then_some(next)
    }

    pub fn max_stage(&self) -> u32 {
        self.stages.stage_count()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn guards_protected(&self) -> bool {
        self.guards_protected
    }

    pub fn animations(&self) -> &AnimationSystem {
        &self.animations
    }

    /// Events not yet dispatched
    pub fn events(&self) -> &[GameEvent] {
        &self.bus.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.bus.events)
    }

    // === Stage content API ===

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn set_field(&mut self, size: Vec3) {
        self.field = Field::new(size);
    }

    /// Put the player at rest at `position`, facing -Z
    pub fn place_player(&mut self, position: Vec3) {
        self.player.place(position);
    }

    pub fn set_guards_protected(&mut self, protected: bool) {
        self.guards_protected = protected;
    }

    pub fn spawn_guard(&mut self, position: Vec3) -> EntityId {
        let id = self.allocate_id();
        self.registries
            .guards
            .add(Guard::new(id, position), &mut self.bus.events);
        id
    }

    pub fn spawn_pursuer(&mut self, position: Vec3) -> EntityId {
        let id = self.allocate_id();
        self.registries
            .pursuers
            .add(Pursuer::new(id, position), &mut self.bus.events);
        id
    }

    pub fn spawn_tower(&mut self, position: Vec3) -> EntityId {
        let id = self.allocate_id();
        self.registries
            .towers
            .add(Tower::new(id, position), &mut self.bus.events);
        id
    }

    pub fn add_obstacle(&mut self, position: Vec3) -> EntityId {
        let id = self.allocate_id();
        self.registries
            .obstacles
            .add(Obstacle::new(id, position), &mut self.bus.events);
        id
    }

    /// Register a projectile in the registry matching its kind
    pub fn add_projectile(&mut self, mut projectile: Projectile) -> EntityId {
        let id = self.allocate_id();
        projectile.id = id;
        self.registries
            .projectiles_mut(projectile.kind)
            .add(projectile, &mut self.bus.events);
        id
    }

    /// Register everything behaviors fired this tick
    ///
    /// Runs after the projectile pass, so shots launched outside the field
    /// are dropped here instead of living one tick out of bounds.
    pub(crate) fn register_spawned(&mut self) {
        for projectile in std::mem::take(&mut self.bus.spawned) {
            if projectile.is_outside(&self.field) {
                log::trace!("dropping shot from {} fired outside the field", projectile.owner);
                continue;
            }
            self.add_projectile(projectile);
        }
    }

    pub fn enemy_body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.registries
            .enemy_core_mut(id)
            .map(|(_, core)| &mut core.actor.body)
    }

    pub fn set_movement_pattern(
        &mut self,
        id: EntityId,
        pattern: MovementPattern,
    ) -> Result<(), StageError> {
        let mut ctx = self
            .bus
            .context(self.clock.elapsed(), Target::of(self.player.body()));
        match self.registries.enemy_core_mut(id) {
            Some((EntityKind::Tower, _)) => Err(StageError::InvalidPattern {
                stage: self.current_stage,
                reason: format!("tower {id} cannot take a movement pattern"),
            }),
            Some((_, core)) => {
                core.movement.set_state(pattern, &mut core.actor, &mut ctx);
                Ok(())
            }
            None => Err(StageError::UnknownEntity(id)),
        }
    }

    pub fn set_combat_pattern(
        &mut self,
        id: EntityId,
        pattern: CombatPattern,
    ) -> Result<(), StageError> {
        let mut ctx = self
            .bus
            .context(self.clock.elapsed(), Target::of(self.player.body()));
        let (_, core) = self
            .registries
            .enemy_core_mut(id)
            .ok_or(StageError::UnknownEntity(id))?;
        core.combat.set_state(pattern, &mut core.actor, &mut ctx);
        Ok(())
    }

    pub fn protect_guard(&mut self, id: EntityId) -> Result<(), StageError> {
        let mut ctx = self
            .bus
            .context(self.clock.elapsed(), Target::of(self.player.body()));
        let guard = self
            .registries
            .guards
            .get_mut(id)
            .ok_or(StageError::UnknownEntity(id))?;
        guard.enable_protection(&mut ctx);
        Ok(())
    }

    pub fn add_animation(&mut self, animation: PropertyAnimation) {
        self.animations.add(animation);
    }

    /// Uniform draw from `[min, max)` on the session RNG
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.bus.rng.random_range(min..max)
    }

    // === Collaborators ===

    /// Drain pending events to the collaborators, then sync every live
    /// transform. Dirty obstacles recompute their volumes here.
    ///
    /// Events pile up until this or [`World::drain_events`] runs, so hosts
    /// must call one of them every frame.
    pub fn dispatch(&mut self, audio: &mut dyn AudioSink, render: &mut dyn RenderSink) {
        for event in self.bus.events.drain(..) {
            match event {
                GameEvent::Spawned { id, kind } => render.spawn(id, kind),
                GameEvent::Despawned { id, kind } => render.despawn(id, kind),
                GameEvent::Sound { source, effect } => audio.play(source, effect),
                ref other => render.notify(other),
            }
        }

        render.sync(Self::PLAYER_ID, self.player.body().transform());

        let registries = &mut self.registries;
        sync_all(&registries.guards, render);
        sync_all(&registries.pursuers, render);
        sync_all(&registries.towers, render);
        sync_all(&registries.player_projectiles, render);
        sync_all(&registries.enemy_projectiles, render);
        sync_all(&registries.enemy_destructible_projectiles, render);

        for obstacle in registries.obstacles.iter_mut() {
            if obstacle.take_dirty() {
                render.obstacle_changed(obstacle.id, obstacle.transform());
            }
        }
    }

    /// Apply an animated value; false if the target is gone
    pub(crate) fn apply_animation(
        registries: &mut Registries,
        id: EntityId,
        property: AnimatedProperty,
        value: f32,
    ) -> bool {
        let Some((_, core)) = registries.enemy_core_mut(id) else {
            return false;
        };
        match property {
            AnimatedProperty::ShotsPerSecond => {
                if let Some(pattern) = core.combat.current_mut() {
                    pattern.set_shots_per_second(value);
                }
            }
        }
        true
    }
}

fn sync_all<T: Registered>(registry: &Registry<T>, render: &mut dyn RenderSink) {
    for item in registry.iter() {
        render.sync(item.entity_id(), item.transform());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioLog;
    use crate::render::SceneMirror;
    use crate::sim::combat::DefaultPattern;
    use crate::sim::stage::ScriptedStages;

    fn two_stage_world() -> World {
        let stages = ScriptedStages::new(2, |stage, world: &mut World| {
            world.place_player(Vec3::new(0.0, 0.5, 5.0));
            for i in 0..stage {
                let id = world.spawn_guard(Vec3::new(i as f32 * 2.0, 0.5, -4.0));
                world.set_combat_pattern(id, CombatPattern::Default(DefaultPattern::default()))?;
            }
            world.add_obstacle(Vec3::new(3.0, 0.5, 0.0));
            Ok(())
        });
        World::new(Settings::default(), Rc::new(stages))
    }

    #[test]
    fn test_start_populates_and_activates() {
        let mut world = two_stage_world();
        world.start().unwrap();

        assert!(world.is_active());
        assert_eq!(world.current_stage(), 1);
        assert_eq!(world.next_stage(), Some(2));
        assert_eq!(world.registries().guards.len(), 1);
        assert_eq!(world.registries().obstacles.len(), 1);
        assert!(world.events().contains(&GameEvent::StageLoaded { stage: 1 }));
    }

    #[test]
    fn test_failed_load_stays_loading_and_empty() {
        let stages = ScriptedStages::new(1, |_, world: &mut World| {
            world.spawn_guard(Vec3::ZERO);
            Err(StageError::UnknownEntity(EntityId(99)))
        });
        let mut world = World::new(Settings::default(), Rc::new(stages));

        assert!(world.start().is_err());
        assert_eq!(world.phase(), StagePhase::Loading);
        assert!(world.registries().is_empty());
    }

    #[test]
    fn test_tower_rejects_movement_pattern() {
        let mut world = two_stage_world();
        world.start().unwrap();
        let tower = world.spawn_tower(Vec3::new(-3.0, 0.5, 0.0));

        let result = world.set_movement_pattern(
            tower,
            MovementPattern::LeftRight(Default::default()),
        );

        assert!(matches!(result, Err(StageError::InvalidPattern { .. })));
    }

    #[test]
    fn test_dispatch_mirrors_registries() {
        let mut world = two_stage_world();
        world.start().unwrap();
        let mut audio = AudioLog::new();
        let mut scene = SceneMirror::new();

        world.dispatch(&mut audio, &mut scene);

        assert_eq!(scene.count(EntityKind::Player), 1);
        assert_eq!(scene.count(EntityKind::Guard), 1);
        assert_eq!(scene.count(EntityKind::Obstacle), 1);
        assert_eq!(scene.obstacle_updates, 1);
        assert!(scene.transform(World::PLAYER_ID).is_some());
        assert!(world.events().is_empty());

        // Dirty flag consumed on the first dispatch only
        world.dispatch(&mut audio, &mut scene);
        assert_eq!(scene.obstacle_updates, 1);
    }

    #[test]
    fn test_ids_are_unique_across_registries() {
        let mut world = two_stage_world();
        world.start().unwrap();
        let a = world.spawn_pursuer(Vec3::ZERO);
        let b = world.add_obstacle(Vec3::ONE);
        let c = world.add_projectile(Projectile::player(World::PLAYER_ID, Vec3::ZERO, Vec3::Z));

        assert!(a != b && b != c && a != World::PLAYER_ID);
        assert_eq!(world.registries().player_projectiles.len(), 1);
    }
}
