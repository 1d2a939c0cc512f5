//! Collision detection between entity categories
//!
//! Each pair goes through a broad phase (squared center distance against the
//! squared radius sum) before the precise shape test. Projectile passes walk
//! their registry last to first because a hit removes the current element,
//! and every projectile resolves at most its first hit per tick.

use glam::Vec3;

use super::bounds::{Shape, Sphere, broad_phase};
use super::combatant::{Enemy, HitOutcome, Message, Player};
use super::fsm::BehaviorContext;
use super::obstacle::Obstacle;
use super::projectile::Projectile;
use super::registry::{Registered, Registry};
use super::world::Registries;

/// Player body against every enemy body; any contact is lethal
pub fn check_player(player: &mut Player, registries: &Registries, ctx: &mut BehaviorContext<'_>) {
    let shape = Shape::Obb(player.obb());
    let position = player.body().position;
    let radius = player.body().bounding_radius;

    let crashed = touches_any(&registries.guards, &shape, position, radius)
        || touches_any(&registries.pursuers, &shape, position, radius)
        || touches_any(&registries.towers, &shape, position, radius);

    if crashed {
        log::debug!("player crashed into an enemy");
        player.crash(ctx);
    }
}

fn touches_any<E>(registry: &Registry<E>, shape: &Shape, position: Vec3, radius: f32) -> bool
where
    E: Enemy + Registered,
{
    registry.iter().any(|enemy| {
        let sphere = enemy.sphere();
        broad_phase(position, radius, sphere.center, sphere.radius)
            && shape.intersects(&Shape::Sphere(sphere))
    })
}

/// Player projectiles against guards, pursuers, towers, then obstacles
pub fn check_player_projectiles(registries: &mut Registries, ctx: &mut BehaviorContext<'_>) {
    for index in (0..registries.player_projectiles.len()).rev() {
        check_player_projectile(registries, index, ctx);
    }
}

fn check_player_projectile(registries: &mut Registries, index: usize, ctx: &mut BehaviorContext<'_>) {
    let projectile = registries.player_projectiles.at(index);
    let shape = projectile.shape();
    let position = projectile.body.position;
    let radius = projectile.body.bounding_radius;

    let struck = strike(&mut registries.guards, &shape, position, radius, ctx)
        || strike(&mut registries.pursuers, &shape, position, radius, ctx)
        || strike(&mut registries.towers, &shape, position, radius, ctx)
        || registries.obstacles.iter().any(|obstacle| {
            broad_phase(position, radius, obstacle.position(), obstacle.bounding_radius())
                && shape.intersects(&Shape::Obb(*obstacle.obb()))
        });

    if struck {
        registries.player_projectiles.remove_at(index, ctx.events);
    }
}

/// Deliver a hit to the first enemy in `registry` that `shape` touches
///
/// A destroyed enemy is deregistered, then its behavior slots are exited.
fn strike<E>(
    registry: &mut Registry<E>,
    shape: &Shape,
    position: Vec3,
    radius: f32,
    ctx: &mut BehaviorContext<'_>,
) -> bool
where
    E: Enemy + Registered,
{
    let Some(index) = registry.iter().position(|enemy| {
        let sphere = enemy.sphere();
        broad_phase(position, radius, sphere.center, sphere.radius)
            && shape.intersects(&Shape::Sphere(sphere))
    }) else {
        return false;
    };

    let outcome = registry.at_mut(index).handle_message(&Message::Hit, ctx);
    if outcome == HitOutcome::Destroyed {
        let mut enemy = registry.remove_at(index, ctx.events);
        enemy.retire(ctx);
    }
    true
}

/// Enemy projectiles against obstacles, player projectiles (destructible
/// only) and the player. Plain projectiles are checked before destructible
/// ones.
pub fn check_enemy_projectiles(
    player: &mut Player,
    registries: &mut Registries,
    ctx: &mut BehaviorContext<'_>,
) {
    let Registries {
        obstacles,
        player_projectiles,
        enemy_projectiles,
        enemy_destructible_projectiles,
        ..
    } = registries;

    for registry in [enemy_projectiles, enemy_destructible_projectiles] {
        for index in (0..registry.len()).rev() {
            let projectile = registry.at(index);
            let sphere = Sphere::new(projectile.body.position, projectile.body.bounding_radius);

            match enemy_projectile_hit(projectile, &sphere, obstacles, player_projectiles, player) {
                None => {}
                Some(EnemyProjectileHit::Obstacle) => {
                    registry.remove_at(index, ctx.events);
                }
                Some(EnemyProjectileHit::PlayerProjectile(other)) => {
                    registry.remove_at(index, ctx.events);
                    player_projectiles.remove_at(other, ctx.events);
                }
                Some(EnemyProjectileHit::Player) => {
                    player.handle_message(&Message::Hit, ctx);
                    registry.remove_at(index, ctx.events);
                }
            }
        }
    }
}

enum EnemyProjectileHit {
    Obstacle,
    /// Index into the player projectile registry
    PlayerProjectile(usize),
    Player,
}

fn enemy_projectile_hit(
    projectile: &Projectile,
    sphere: &Sphere,
    obstacles: &Registry<Obstacle>,
    player_projectiles: &Registry<Projectile>,
    player: &Player,
) -> Option<EnemyProjectileHit> {
    let position = sphere.center;
    let radius = sphere.radius;

    let blocked = obstacles.iter().any(|obstacle| {
        broad_phase(position, radius, obstacle.position(), obstacle.bounding_radius())
            && obstacle.obb().intersects_sphere(sphere)
    });
    if blocked {
        return Some(EnemyProjectileHit::Obstacle);
    }

    if projectile.is_destructible() {
        let shot_down = (0..player_projectiles.len()).rev().find(|&i| {
            let other = player_projectiles.at(i);
            broad_phase(position, radius, other.body.position, other.body.bounding_radius)
                && other.shape().intersects(&Shape::Sphere(*sphere))
        });
        if let Some(other) = shot_down {
            return Some(EnemyProjectileHit::PlayerProjectile(other));
        }
    }

    let body = player.body();
    if broad_phase(position, radius, body.position, body.bounding_radius)
        && player.obb().intersects_sphere(sphere)
    {
        return Some(EnemyProjectileHit::Player);
    }

    None
}
