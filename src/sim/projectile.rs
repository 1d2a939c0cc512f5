//! Projectiles
//!
//! A projectile flies in a straight line at a fixed speed until it hits
//! something or leaves the field.

use glam::Vec3;

use super::bounds::{Field, Obb, Shape, Sphere};
use super::entity::{Body, EntityId, EntityKind};
use super::fsm::Actor;
use crate::consts::{
    ENEMY_PROJECTILE_HEIGHT, ENEMY_PROJECTILE_RADIUS, ENEMY_PROJECTILE_SPEED,
    PLAYER_PROJECTILE_HALF_SIZES, PLAYER_PROJECTILE_HEIGHT, PLAYER_PROJECTILE_RADIUS,
    PLAYER_PROJECTILE_SPEED,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Player,
    Enemy,
    EnemyDestructible,
}

impl ProjectileKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            ProjectileKind::Player => EntityKind::PlayerProjectile,
            ProjectileKind::Enemy => EntityKind::EnemyProjectile,
            ProjectileKind::EnemyDestructible => EntityKind::EnemyDestructibleProjectile,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    /// Assigned when the world registers the projectile
    pub id: EntityId,
    /// Combatant that fired it
    pub owner: EntityId,
    pub kind: ProjectileKind,
    pub body: Body,
}

impl Projectile {
    fn launch(
        owner: EntityId,
        kind: ProjectileKind,
        origin: Vec3,
        height: f32,
        radius: f32,
        speed: f32,
        direction: Vec3,
    ) -> Self {
        let direction = direction.normalize_or_zero();
        let mut body = Body::new(Vec3::new(origin.x, height, origin.z), radius, speed);
        body.velocity = direction * speed;
        body.update_orientation = false;
        body.look_at(body.position + direction);

        Self {
            id: EntityId::PENDING,
            owner,
            kind,
            body,
        }
    }

    pub fn player(owner: EntityId, origin: Vec3, direction: Vec3) -> Self {
        Self::launch(
            owner,
            ProjectileKind::Player,
            origin,
            PLAYER_PROJECTILE_HEIGHT,
            PLAYER_PROJECTILE_RADIUS,
            PLAYER_PROJECTILE_SPEED,
            direction,
        )
    }

    pub fn enemy(owner: &Actor, direction: Vec3, destructible: bool) -> Self {
        let kind = if destructible {
            ProjectileKind::EnemyDestructible
        } else {
            ProjectileKind::Enemy
        };
        Self::launch(
            owner.id,
            kind,
            owner.body.position,
            ENEMY_PROJECTILE_HEIGHT,
            ENEMY_PROJECTILE_RADIUS,
            ENEMY_PROJECTILE_SPEED,
            direction,
        )
    }

    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.kind == ProjectileKind::EnemyDestructible
    }

    #[inline]
    pub fn entity_kind(&self) -> EntityKind {
        self.kind.entity_kind()
    }

    pub fn step(&mut self, dt: f32) {
        self.body.step(dt);
    }

    pub fn is_outside(&self, field: &Field) -> bool {
        !field.contains(self.body.position)
    }

    /// Narrow-phase shape: a needle box for player shots, a sphere otherwise
    pub fn shape(&self) -> Shape {
        match self.kind {
            ProjectileKind::Player => Shape::Obb(Obb::new(
                self.body.position,
                PLAYER_PROJECTILE_HALF_SIZES,
                self.body.rotation,
            )),
            ProjectileKind::Enemy | ProjectileKind::EnemyDestructible => {
                Shape::Sphere(Sphere::new(self.body.position, self.body.bounding_radius))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_projectile_faces_travel_direction() {
        let p = Projectile::player(EntityId(1), Vec3::new(1.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -3.0));

        assert_eq!(p.body.position, Vec3::new(1.0, PLAYER_PROJECTILE_HEIGHT, 2.0));
        assert!((p.body.velocity - Vec3::new(0.0, 0.0, -PLAYER_PROJECTILE_SPEED)).length() < 1e-5);
        assert!((p.body.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!(matches!(p.shape(), Shape::Obb(_)));
    }

    #[test]
    fn test_enemy_projectile_kind_and_shape() {
        let owner = Actor::new(EntityId(4), Body::new(Vec3::new(0.0, 0.5, -3.0), 0.5, 1.0));
        let p = Projectile::enemy(&owner, Vec3::X, true);

        assert!(p.is_destructible());
        assert_eq!(p.entity_kind(), EntityKind::EnemyDestructibleProjectile);
        assert_eq!(p.owner, EntityId(4));
        assert_eq!(p.body.position.y, ENEMY_PROJECTILE_HEIGHT);
        assert!(matches!(p.shape(), Shape::Sphere(s) if s.radius == ENEMY_PROJECTILE_RADIUS));
    }

    #[test]
    fn test_leaves_field_on_either_axis() {
        let field = Field::new(Vec3::new(10.0, 1.0, 10.0));
        let mut p = Projectile::player(EntityId(1), Vec3::new(4.5, 0.0, 0.0), Vec3::X);
        assert!(!p.is_outside(&field));

        p.step(0.05);
        assert!(p.is_outside(&field));

        let mut q = Projectile::player(EntityId(1), Vec3::new(0.0, 0.0, -4.9), Vec3::NEG_Z);
        q.step(0.01);
        assert!(q.is_outside(&field));
    }
}
