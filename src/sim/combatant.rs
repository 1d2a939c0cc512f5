//! Combatants: the player and the three enemy types
//!
//! Every combatant interprets the `hit` message on its own. Enemies report
//! [`HitOutcome::Destroyed`] exactly once, when health first reaches zero;
//! the world then deregisters them and calls [`Enemy::retire`], which exits
//! both behavior slots. Nothing else ever calls exit.

use glam::{Quat, Vec2, Vec3};

use super::bounds::{Field, Obb, Ray, Sphere};
use super::combat::CombatPattern;
use super::entity::{Body, EntityId, EntityKind};
use super::events::GameEvent;
use super::fsm::{Actor, BehaviorContext, StateMachine};
use super::movement::MovementPattern;
use super::obstacle::Obstacle;
use super::projectile::Projectile;
use crate::audio::SoundEffect;
use crate::consts::{
    ENEMY_MAX_SPEED, ENEMY_RADIUS, GUARD_MAX_HEALTH, HIT_EFFECT_DURATION,
    HIT_EFFECT_MIN_DURATION, PLAYER_BRAKING_FORCE, PLAYER_HALF_SIZES, PLAYER_MAX_HEALTH,
    PLAYER_MAX_SPEED, PLAYER_RADIUS, PLAYER_SHOTS_PER_SECOND, PURSUER_MAX_HEALTH,
    TOWER_MAX_HEALTH,
};
use crate::planar;

/// Hit points bounded to `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Remove one point; returns true if this emptied the pool
    pub fn damage(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.current == 0
    }

    pub fn deplete(&mut self) {
        self.current = 0;
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// Messages delivered to combatants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Hit,
    /// Anything the receiver does not understand
    Other(String),
}

impl From<&str> for Message {
    fn from(kind: &str) -> Self {
        match kind {
            "hit" => Message::Hit,
            other => Message::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown message, or the receiver was already destroyed
    Ignored,
    /// Absorbed by a guard's protection
    Shielded,
    Damaged,
    /// Health reached zero with this message
    Destroyed,
}

fn unknown_message(id: EntityId, message: &Message) -> HitOutcome {
    log::warn!("{id}: unknown message {message:?}");
    HitOutcome::Ignored
}

/// State shared by every enemy type
#[derive(Debug, Clone)]
pub struct EnemyCore {
    pub actor: Actor,
    pub health: Health,
    pub movement: StateMachine<MovementPattern>,
    pub combat: StateMachine<CombatPattern>,
}

impl EnemyCore {
    pub fn new(id: EntityId, position: Vec3, max_health: u32) -> Self {
        Self {
            actor: Actor::new(id, Body::new(position, ENEMY_RADIUS, ENEMY_MAX_SPEED)),
            health: Health::new(max_health),
            movement: StateMachine::new(),
            combat: StateMachine::new(),
        }
    }

    /// Behaviors first, then steering and integration
    fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        self.movement.tick(&mut self.actor, ctx);
        self.combat.tick(&mut self.actor, ctx);

        let target = ctx.target;
        self.actor.body.steer(&target, dt);
        self.actor.body.step(dt);
    }
}

/// Behavior shared by guards, pursuers and towers
pub trait Enemy {
    const KIND: EntityKind;

    fn core(&self) -> &EnemyCore;

    fn core_mut(&mut self) -> &mut EnemyCore;

    fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>);

    fn handle_message(&mut self, message: &Message, ctx: &mut BehaviorContext<'_>) -> HitOutcome;

    #[inline]
    fn id(&self) -> EntityId {
        self.core().actor.id
    }

    #[inline]
    fn body(&self) -> &Body {
        &self.core().actor.body
    }

    #[inline]
    fn body_mut(&mut self) -> &mut Body {
        &mut self.core_mut().actor.body
    }

    fn health(&self) -> Health {
        self.core().health
    }

    fn sphere(&self) -> Sphere {
        Sphere::new(self.body().position, self.body().bounding_radius)
    }

    /// Assign the movement slot and enter the new pattern
    fn set_movement_pattern(&mut self, pattern: MovementPattern, ctx: &mut BehaviorContext<'_>) {
        let core = self.core_mut();
        core.movement.set_state(pattern, &mut core.actor, ctx);
    }

    /// Assign the combat slot and enter the new pattern
    fn set_combat_pattern(&mut self, pattern: CombatPattern, ctx: &mut BehaviorContext<'_>) {
        let core = self.core_mut();
        core.combat.set_state(pattern, &mut core.actor, ctx);
    }

    /// Death cleanup: explicitly exit both behavior slots
    fn retire(&mut self, ctx: &mut BehaviorContext<'_>) {
        let core = self.core_mut();
        core.combat.exit(&mut core.actor, ctx);
        core.movement.exit(&mut core.actor, ctx);
    }
}

/// Hit flash shown on a guard for a short time after each hit
///
/// A hit that lands while the flash is visible only restarts it once the
/// flash has been up for at least the minimum duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitFlash {
    visible: bool,
    age: f32,
    hide_at: f32,
}

impl HitFlash {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn trigger(&mut self, elapsed: f32) {
        if self.visible && self.age <= HIT_EFFECT_MIN_DURATION {
            return;
        }
        self.visible = true;
        self.age = 0.0;
        self.hide_at = elapsed + HIT_EFFECT_DURATION;
    }

    fn update(&mut self, dt: f32, elapsed: f32) {
        if !self.visible {
            return;
        }
        self.age += dt;
        if elapsed > self.hide_at {
            self.visible = false;
        }
    }
}

/// Core enemy: the stage is cleared once every guard is gone
#[derive(Debug, Clone)]
pub struct Guard {
    core: EnemyCore,
    protected: bool,
    hit_flash: HitFlash,
}

impl Guard {
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            core: EnemyCore::new(id, position, GUARD_MAX_HEALTH),
            protected: false,
            hit_flash: HitFlash::default(),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn hit_flash(&self) -> HitFlash {
        self.hit_flash
    }

    pub fn enable_protection(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.protected {
            return;
        }
        self.protected = true;
        ctx.events.push(GameEvent::ProtectionChanged {
            id: self.id(),
            protected: true,
        });
    }

    /// Lift protection; returns false (and stays silent) if already lifted
    pub fn disable_protection(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !self.protected {
            return false;
        }
        self.protected = false;
        ctx.events.push(GameEvent::ProtectionChanged {
            id: self.id(),
            protected: false,
        });
        ctx.play(self.id(), SoundEffect::CoreShieldDestroyed);
        log::debug!("guard {}: protection lifted", self.id());
        true
    }
}

impl Enemy for Guard {
    const KIND: EntityKind = EntityKind::Guard;

    fn core(&self) -> &EnemyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnemyCore {
        &mut self.core
    }

    fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        self.core.update(dt, ctx);
        self.hit_flash.update(dt, ctx.elapsed);
    }

    fn handle_message(&mut self, message: &Message, ctx: &mut BehaviorContext<'_>) -> HitOutcome {
        let id = self.id();
        match message {
            Message::Hit if self.core.health.is_depleted() => HitOutcome::Ignored,
            Message::Hit if self.protected => {
                ctx.play(id, SoundEffect::CoreShieldHit);
                HitOutcome::Shielded
            }
            Message::Hit => {
                let destroyed = self.core.health.damage();
                self.hit_flash.trigger(ctx.elapsed);
                ctx.play(id, SoundEffect::EnemyHit);

                if destroyed {
                    ctx.play(id, SoundEffect::CoreExplode);
                    log::debug!("guard {id} destroyed");
                    HitOutcome::Destroyed
                } else {
                    HitOutcome::Damaged
                }
            }
            Message::Other(_) => unknown_message(id, message),
        }
    }
}

/// Fragile escort that usually chases the player
#[derive(Debug, Clone)]
pub struct Pursuer {
    core: EnemyCore,
}

impl Pursuer {
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            core: EnemyCore::new(id, position, PURSUER_MAX_HEALTH),
        }
    }
}

impl Enemy for Pursuer {
    const KIND: EntityKind = EntityKind::Pursuer;

    fn core(&self) -> &EnemyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnemyCore {
        &mut self.core
    }

    fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        self.core.update(dt, ctx);
    }

    fn handle_message(&mut self, message: &Message, ctx: &mut BehaviorContext<'_>) -> HitOutcome {
        let id = self.id();
        match message {
            Message::Hit if self.core.health.is_depleted() => HitOutcome::Ignored,
            Message::Hit => {
                if !self.core.health.damage() {
                    return HitOutcome::Damaged;
                }
                ctx.play(id, SoundEffect::EnemyExplode);
                log::debug!("pursuer {id} destroyed");
                HitOutcome::Destroyed
            }
            Message::Other(_) => unknown_message(id, message),
        }
    }
}

/// Static turret; only its combat slot is used
#[derive(Debug, Clone)]
pub struct Tower {
    core: EnemyCore,
}

impl Tower {
    pub fn new(id: EntityId, position: Vec3) -> Self {
        let mut core = EnemyCore::new(id, position, TOWER_MAX_HEALTH);
        core.actor.body.max_speed = 0.0;
        Self { core }
    }
}

impl Enemy for Tower {
    const KIND: EntityKind = EntityKind::Tower;

    fn core(&self) -> &EnemyCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnemyCore {
        &mut self.core
    }

    fn update(&mut self, _dt: f32, ctx: &mut BehaviorContext<'_>) {
        self.core.combat.tick(&mut self.core.actor, ctx);
    }

    fn handle_message(&mut self, message: &Message, ctx: &mut BehaviorContext<'_>) -> HitOutcome {
        let id = self.id();
        match message {
            Message::Hit if self.core.health.is_depleted() => HitOutcome::Ignored,
            Message::Hit => {
                let destroyed = self.core.health.damage();
                ctx.play(id, SoundEffect::EnemyHit);
                if destroyed {
                    ctx.play(id, SoundEffect::EnemyExplode);
                    log::debug!("tower {id} destroyed");
                    HitOutcome::Destroyed
                } else {
                    HitOutcome::Damaged
                }
            }
            Message::Other(_) => unknown_message(id, message),
        }
    }
}

/// The player's vehicle
#[derive(Debug, Clone)]
pub struct Player {
    pub actor: Actor,
    pub health: Health,
    pub shots_per_second: f32,
    pub braking_force: f32,
    last_shot_time: Option<f32>,
    controls_attached: bool,
}

impl Player {
    pub fn new(id: EntityId) -> Self {
        let mut body = Body::new(Vec3::ZERO, PLAYER_RADIUS, PLAYER_MAX_SPEED);
        body.update_orientation = false;
        body.rotation = Quat::from_rotation_y(std::f32::consts::PI);

        Self {
            actor: Actor::new(id, body),
            health: Health::new(PLAYER_MAX_HEALTH),
            shots_per_second: PLAYER_SHOTS_PER_SECOND,
            braking_force: PLAYER_BRAKING_FORCE,
            last_shot_time: None,
            controls_attached: true,
        }
    }

    /// Build a player with tuned parameters
    pub fn with_settings(id: EntityId, settings: &crate::Settings) -> Self {
        let mut player = Self::new(id);
        player.actor.body.max_speed = settings.player_max_speed;
        player.health = Health::new(settings.player_max_health);
        player.shots_per_second = settings.player_shots_per_second;
        player.braking_force = settings.player_braking_force;
        player
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.actor.id
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.actor.body
    }

    pub fn controls_attached(&self) -> bool {
        self.controls_attached
    }

    pub fn attach_controls(&mut self) {
        self.controls_attached = true;
    }

    pub fn detach_controls(&mut self) {
        self.controls_attached = false;
        self.actor.body.velocity = Vec3::ZERO;
    }

    pub fn obb(&self) -> Obb {
        Obb::new(self.actor.body.position, PLAYER_HALF_SIZES, self.actor.body.rotation)
    }

    /// Move to `position` facing -Z, at rest
    pub fn place(&mut self, position: Vec3) {
        let body = &mut self.actor.body;
        body.position = position;
        body.velocity = Vec3::ZERO;
        body.rotation = Quat::from_rotation_y(std::f32::consts::PI);
        self.last_shot_time = None;
    }

    pub fn heal(&mut self) {
        self.health.restore();
    }

    /// Apply one tick of movement intent
    ///
    /// Non-zero intent accelerates; zero intent brakes. `aim` is a planar
    /// direction the vehicle turns to face.
    pub fn drive(&mut self, movement: Vec2, aim: Option<Vec2>, dt: f32) {
        if !self.controls_attached {
            return;
        }
        let body = &mut self.actor.body;

        if let Some(aim) = aim.filter(|a| a.length_squared() > 0.0) {
            let target = body.position + planar(aim);
            body.look_at(target);
        }

        let direction = planar(movement.normalize_or_zero());
        if direction == Vec3::ZERO {
            let brake = (self.braking_force * dt).min(1.0);
            body.velocity.x -= body.velocity.x * brake;
            body.velocity.z -= body.velocity.z * brake;
        } else {
            body.velocity += direction;
        }
    }

    /// Fire along the facing direction if the fire interval has passed
    pub fn shoot(&mut self, ctx: &mut BehaviorContext<'_>) -> bool {
        if !self.controls_attached || self.shots_per_second <= 0.0 {
            return false;
        }
        let elapsed = ctx.elapsed;
        if let Some(last) = self.last_shot_time {
            if elapsed - last <= 1.0 / self.shots_per_second {
                return false;
            }
        }
        self.last_shot_time = Some(elapsed);

        let body = &self.actor.body;
        ctx.fire(Projectile::player(self.id(), body.position, body.forward()));
        ctx.play(self.id(), SoundEffect::PlayerShot);
        true
    }

    /// Deflect velocity along any obstacle face the player is about to touch
    pub fn restrict_movement(&mut self, obstacles: &[Obstacle]) {
        let body = &mut self.actor.body;
        if body.velocity.length_squared() == 0.0 {
            return;
        }

        let radius = body.bounding_radius;
        for obstacle in obstacles {
            let aabb = obstacle.aabb().expanded(radius * 0.5);
            let ray = Ray::new(body.position, body.velocity.normalize());

            let Some(point) = ray.intersect_aabb(&aabb) else {
                continue;
            };
            if body.position.distance_squared(point) > radius * radius {
                continue;
            }

            let normal = aabb.normal_from_surface_point(point);
            let reflection = ray.direction - 2.0 * ray.direction.dot(normal) * normal;
            let speed = body.speed();
            let slide = 1.0 - normal.dot(ray.direction).abs();
            body.velocity = (ray.direction + reflection).normalize_or_zero() * speed * slide;
        }
    }

    /// Keep the whole vehicle inside the field
    pub fn confine(&mut self, field: &Field) {
        let body = &mut self.actor.body;
        body.position = field.clamp(body.position, body.bounding_radius);
    }

    pub fn step(&mut self, dt: f32) {
        self.actor.body.step(dt);
    }

    pub fn handle_message(&mut self, message: &Message, ctx: &mut BehaviorContext<'_>) -> HitOutcome {
        let id = self.id();
        match message {
            Message::Hit if self.health.is_depleted() => HitOutcome::Ignored,
            Message::Hit => {
                ctx.play(id, SoundEffect::PlayerHit);
                if self.health.damage() {
                    ctx.play(id, SoundEffect::PlayerExplode);
                    HitOutcome::Destroyed
                } else {
                    HitOutcome::Damaged
                }
            }
            Message::Other(_) => unknown_message(id, message),
        }
    }

    /// Contact with an enemy body is always lethal
    pub fn crash(&mut self, ctx: &mut BehaviorContext<'_>) {
        if self.health.is_depleted() {
            return;
        }
        self.health.deplete();
        ctx.play(self.id(), SoundEffect::PlayerExplode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combat::DefaultPattern;
    use crate::sim::fsm::test_support::Harness;
    use crate::sim::movement::PursuitMovement;
    use proptest::prelude::*;

    #[test]
    fn test_guard_shield_absorbs_hits() {
        let mut harness = Harness::new();
        let mut guard = Guard::new(EntityId(2), Vec3::ZERO);
        guard.enable_protection(&mut harness.ctx(0.0));

        let outcome = guard.handle_message(&Message::Hit, &mut harness.ctx(0.1));

        assert_eq!(outcome, HitOutcome::Shielded);
        assert_eq!(guard.health().current(), GUARD_MAX_HEALTH);
        assert_eq!(harness.sounds(SoundEffect::CoreShieldHit), 1);
        assert_eq!(harness.sounds(SoundEffect::EnemyHit), 0);
    }

    #[test]
    fn test_disable_protection_is_idempotent() {
        let mut harness = Harness::new();
        let mut guard = Guard::new(EntityId(2), Vec3::ZERO);
        guard.enable_protection(&mut harness.ctx(0.0));

        assert!(guard.disable_protection(&mut harness.ctx(0.0)));
        assert!(!guard.disable_protection(&mut harness.ctx(0.0)));

        assert_eq!(harness.sounds(SoundEffect::CoreShieldDestroyed), 1);
        let changes = harness
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProtectionChanged { protected: false, .. }))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_guard_destroyed_once() {
        let mut harness = Harness::new();
        let mut guard = Guard::new(EntityId(2), Vec3::ZERO);

        let outcomes: Vec<HitOutcome> = (0..GUARD_MAX_HEALTH + 2)
            .map(|i| guard.handle_message(&Message::Hit, &mut harness.ctx(i as f32)))
            .collect();

        let destroyed = outcomes.iter().filter(|o| **o == HitOutcome::Destroyed).count();
        assert_eq!(destroyed, 1);
        assert_eq!(outcomes[GUARD_MAX_HEALTH as usize - 1], HitOutcome::Destroyed);
        assert_eq!(outcomes[GUARD_MAX_HEALTH as usize], HitOutcome::Ignored);
        assert_eq!(harness.sounds(SoundEffect::CoreExplode), 1);
    }

    #[test]
    fn test_hit_flash_restarts_after_min_duration() {
        let mut harness = Harness::new();
        let mut guard = Guard::new(EntityId(2), Vec3::ZERO);

        guard.handle_message(&Message::Hit, &mut harness.ctx(0.0));
        assert!(guard.hit_flash().is_visible());

        // Second hit too soon: deadline unchanged
        guard.update(0.1, &mut harness.ctx(0.1));
        guard.handle_message(&Message::Hit, &mut harness.ctx(0.1));
        guard.update(0.16, &mut harness.ctx(0.26));
        assert!(!guard.hit_flash().is_visible());

        guard.handle_message(&Message::Hit, &mut harness.ctx(1.0));
        guard.update(0.2, &mut harness.ctx(1.2));
        guard.handle_message(&Message::Hit, &mut harness.ctx(1.2));
        guard.update(0.1, &mut harness.ctx(1.3));
        assert!(guard.hit_flash().is_visible());
    }

    #[test]
    fn test_retire_exits_both_slots() {
        let mut harness = Harness::new();
        let mut pursuer = Pursuer::new(EntityId(3), Vec3::ZERO);
        pursuer.set_movement_pattern(
            MovementPattern::Pursuit(PursuitMovement::default()),
            &mut harness.ctx(0.0),
        );
        pursuer.set_combat_pattern(
            CombatPattern::Default(DefaultPattern::default()),
            &mut harness.ctx(0.0),
        );
        assert!(pursuer.body().steering.is_some());

        assert_eq!(
            pursuer.handle_message(&Message::Hit, &mut harness.ctx(0.5)),
            HitOutcome::Destroyed
        );
        pursuer.retire(&mut harness.ctx(0.5));

        assert!(pursuer.body().steering.is_none());
        assert_eq!(pursuer.body().max_speed, ENEMY_MAX_SPEED);
        assert_eq!(harness.sounds(SoundEffect::EnemyExplode), 1);
    }

    #[test]
    fn test_unknown_message_is_ignored() {
        let mut harness = Harness::new();
        let mut tower = Tower::new(EntityId(4), Vec3::ZERO);

        let outcome = tower.handle_message(&Message::from("wave"), &mut harness.ctx(0.0));

        assert_eq!(outcome, HitOutcome::Ignored);
        assert_eq!(tower.health().current(), TOWER_MAX_HEALTH);
        assert!(harness.events.is_empty());
    }

    #[test]
    fn test_tower_never_moves() {
        let mut harness = Harness::new();
        let mut tower = Tower::new(EntityId(4), Vec3::new(2.0, 0.5, 2.0));
        tower.body_mut().velocity = Vec3::X;

        tower.update(1.0, &mut harness.ctx(1.0));

        assert_eq!(tower.body().position, Vec3::new(2.0, 0.5, 2.0));
    }

    #[test]
    fn test_player_shoot_respects_rate() {
        let mut harness = Harness::new();
        let mut player = Player::new(EntityId(0));

        assert!(player.shoot(&mut harness.ctx(0.0)));
        assert!(!player.shoot(&mut harness.ctx(0.05)));
        assert!(player.shoot(&mut harness.ctx(0.2)));

        assert_eq!(harness.spawned.len(), 2);
        assert_eq!(harness.sounds(SoundEffect::PlayerShot), 2);
        // Fresh player faces -Z
        assert!((harness.spawned[0].body.velocity.normalize() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_player_brakes_without_intent() {
        let mut player = Player::new(EntityId(0));
        player.drive(Vec2::new(1.0, 0.0), None, 0.016);
        assert_eq!(player.body().velocity, Vec3::X);

        player.drive(Vec2::ZERO, None, 0.05);
        assert!((player.body().velocity.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_detached_controls_ignore_input() {
        let mut harness = Harness::new();
        let mut player = Player::new(EntityId(0));
        player.detach_controls();

        player.drive(Vec2::new(0.0, 1.0), Some(Vec2::X), 0.1);

        assert_eq!(player.body().velocity, Vec3::ZERO);
        assert!(!player.shoot(&mut harness.ctx(1.0)));
    }

    #[test]
    fn test_player_slides_along_obstacle() {
        let mut player = Player::new(EntityId(0));
        let obstacle = Obstacle::new(EntityId(9), Vec3::new(0.0, 0.5, -1.0));
        player.actor.body.position = Vec3::new(0.0, 0.5, 0.0);
        player.actor.body.velocity = Vec3::new(1.0, 0.0, -1.0);

        player.restrict_movement(std::slice::from_ref(&obstacle));

        // Motion into the face is removed, tangential motion survives
        let v = player.body().velocity;
        assert!(v.z.abs() < 1e-5);
        assert!(v.x > 0.0);
    }

    #[test]
    fn test_player_hit_until_destroyed() {
        let mut harness = Harness::new();
        let mut player = Player::new(EntityId(0));

        for _ in 0..PLAYER_MAX_HEALTH - 1 {
            assert_eq!(player.handle_message(&Message::Hit, &mut harness.ctx(0.0)), HitOutcome::Damaged);
        }
        assert_eq!(player.handle_message(&Message::Hit, &mut harness.ctx(0.0)), HitOutcome::Destroyed);
        assert_eq!(player.handle_message(&Message::Hit, &mut harness.ctx(0.0)), HitOutcome::Ignored);
        assert_eq!(harness.sounds(SoundEffect::PlayerExplode), 1);
    }

    proptest! {
        #[test]
        fn test_health_stays_in_bounds(max in 1u32..20, ops in proptest::collection::vec(0u8..3, 0..64)) {
            let mut health = Health::new(max);
            let mut destroyed = 0;
            for op in ops {
                match op {
                    0 => if health.damage() { destroyed += 1 },
                    1 => health.restore(),
                    _ => health.deplete(),
                }
                prop_assert!(health.current() <= health.max());
            }
            prop_assert!(destroyed <= 64);
        }
    }
}
