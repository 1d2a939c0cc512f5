//! Per-tick update
//!
//! Advances the world by one host delta in a fixed order:
//! animations, player, enemies, projectiles, separation, collisions, then
//! the stage status check.

use glam::Vec2;

use super::collision;
use super::combatant::Enemy;
use super::events::GameEvent;
use super::separation::{self, Disc};
use super::steering::Target;
use super::world::{StagePhase, World};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Planar movement intent (x, z); zero brakes
    pub movement: Vec2,
    /// Planar direction the vehicle should face
    pub aim: Option<Vec2>,
    /// Fire held
    pub fire: bool,
}

impl World {
    /// Convenience wrapper around [`tick`]
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }
}

/// Advance the world by one host delta
///
/// The delta is clamped by the session clock; nothing moves while the clock
/// is suspended. Events produced here stay queued on the world until the
/// host calls [`World::dispatch`] or [`World::drain_events`].
pub fn tick(world: &mut World, input: &TickInput, raw_dt: f32) {
    let dt = world.clock.advance(raw_dt);
    if dt <= 0.0 {
        return;
    }

    match world.phase {
        StagePhase::Active => {}
        StagePhase::StageCleared { remaining } => {
            advance_transition(world, remaining - dt);
            return;
        }
        StagePhase::Loading | StagePhase::GameOverWon | StagePhase::GameOverLost => return,
    }

    let elapsed = world.clock.elapsed();

    // Property animations
    let registries = &mut world.registries;
    world
        .animations
        .update(dt, |id, property, value| World::apply_animation(registries, id, property, value));

    // Player
    world.player.drive(input.movement, input.aim, dt);
    if input.fire {
        let target = Target::of(world.player.body());
        let mut ctx = world.bus.context(elapsed, target);
        world.player.shoot(&mut ctx);
    }
    world.player.restrict_movement(world.registries.obstacles.as_slice());
    world.player.step(dt);
    world.player.confine(&world.field);

    // Enemies
    let target = Target::of(world.player.body());
    {
        let mut ctx = world.bus.context(elapsed, target);
        let registries = &mut world.registries;
        for guard in registries.guards.iter_mut() {
            guard.update(dt, &mut ctx);
        }
        for pursuer in registries.pursuers.iter_mut() {
            pursuer.update(dt, &mut ctx);
        }
        for tower in registries.towers.iter_mut() {
            tower.update(dt, &mut ctx);
        }
    }

    step_projectiles(world, dt);
    world.register_spawned();

    separate(world);

    // Collisions
    {
        let mut ctx = world.bus.context(elapsed, target);
        collision::check_player(&mut world.player, &world.registries, &mut ctx);
        collision::check_player_projectiles(&mut world.registries, &mut ctx);
        collision::check_enemy_projectiles(&mut world.player, &mut world.registries, &mut ctx);
    }

    check_status(world, target);
}

/// Count down the stage-cleared pause, loading the next stage when it ends
fn advance_transition(world: &mut World, remaining: f32) {
    if remaining > 0.0 {
        world.phase = StagePhase::StageCleared { remaining };
        return;
    }

    let next = world.current_stage + 1;
    if let Err(err) = world.load_stage(next) {
        log::warn!("could not advance to stage {next}: {err}");
    }
}

/// Integrate every projectile and drop those that left the field
fn step_projectiles(world: &mut World, dt: f32) {
    let field = world.field;
    let events = &mut world.bus.events;
    let registries = &mut world.registries;

    for registry in [
        &mut registries.player_projectiles,
        &mut registries.enemy_projectiles,
        &mut registries.enemy_destructible_projectiles,
    ] {
        for index in (0..registry.len()).rev() {
            let projectile = registry.at_mut(index);
            projectile.step(dt);
            if projectile.is_outside(&field) {
                registry.remove_at(index, events);
            }
        }
    }
}

/// One non-penetration pass over guards, pursuers, towers and obstacles
fn separate(world: &mut World) {
    let registries = &mut world.registries;

    let mut discs: Vec<Disc> = Vec::with_capacity(
        registries.enemy_count() + registries.obstacles.len(),
    );
    discs.extend(
        registries
            .guards
            .iter()
            .map(|g| Disc::new(g.body().position, g.body().bounding_radius, true)),
    );
    discs.extend(
        registries
            .pursuers
            .iter()
            .map(|p| Disc::new(p.body().position, p.body().bounding_radius, true)),
    );
    discs.extend(
        registries
            .towers
            .iter()
            .map(|t| Disc::new(t.body().position, t.body().bounding_radius, false)),
    );
    discs.extend(
        registries
            .obstacles
            .iter()
            .map(|o| Disc::new(o.position(), o.bounding_radius(), false)),
    );

    if separation::resolve(&mut discs) == 0 {
        return;
    }

    let movable = registries
        .guards
        .iter_mut()
        .map(|g| g.body_mut())
        .chain(registries.pursuers.iter_mut().map(|p| p.body_mut()));
    for (body, disc) in movable.zip(&discs) {
        body.position = disc.position;
    }
}

/// Stage status check: defeat, protection, then stage clear
fn check_status(world: &mut World, target: Target) {
    if world.player.health.is_depleted() {
        world.phase = StagePhase::GameOverLost;
        world.player.detach_controls();
        world.bus.events.push(GameEvent::GameOver { won: false });
        log::info!("game over on stage {}", world.current_stage);
        return;
    }

    let registries = &mut world.registries;
    if world.guards_protected && registries.pursuers.is_empty() && registries.towers.is_empty() {
        world.guards_protected = false;
        let mut ctx = world.bus.context(world.clock.elapsed(), target);
        for guard in registries.guards.iter_mut() {
            guard.disable_protection(&mut ctx);
        }
        log::debug!("escorts down, guards exposed");
    }

    if !world.registries.guards.is_empty() {
        return;
    }

    let stage = world.current_stage;
    world.bus.events.push(GameEvent::StageCleared { stage });
    world.player.heal();

    if world.next_stage().is_some() {
        log::info!("stage {stage} cleared");
        world.phase = StagePhase::StageCleared {
            remaining: world.settings.stage_transition_pause,
        };
    } else {
        log::info!("final stage {stage} cleared");
        world.phase = StagePhase::GameOverWon;
        world.player.detach_controls();
        world.bus.events.push(GameEvent::GameOver { won: true });
    }
}
