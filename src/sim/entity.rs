//! Kinematic entities
//!
//! Every simulated object owns a [`Body`]: point-mass kinematics plus a
//! bounding radius for broad-phase tests. Bodies never touch registries;
//! the world decides when they live and die.

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::steering::{Pursuit, Target};
use crate::yaw_towards;

/// Stable handle for a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder for objects the world has not registered yet
    pub const PENDING: EntityId = EntityId(u32::MAX);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity categories, one per registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Guard,
    Pursuer,
    Tower,
    Obstacle,
    PlayerProjectile,
    EnemyProjectile,
    EnemyDestructibleProjectile,
}

/// Position and orientation handed to the render collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Point-mass kinematics shared by all moving objects
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw about +Y; local +Z is forward
    pub rotation: Quat,
    pub bounding_radius: f32,
    pub max_speed: f32,
    pub mass: f32,
    /// Face the velocity vector after each step
    pub update_orientation: bool,
    /// Attached steering behavior (pursuit movement only)
    pub steering: Option<Pursuit>,
}

impl Body {
    pub fn new(position: Vec3, bounding_radius: f32, max_speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            bounding_radius,
            max_speed,
            mass: 1.0,
            update_orientation: true,
            steering: None,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Unit vector the body is facing
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Turn to face `target` on the ground plane (no-op if coincident)
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(rotation) = yaw_towards(target - self.position) {
            self.rotation = rotation;
        }
    }

    /// Accumulate a force as acceleration for this step
    pub fn apply_force(&mut self, force: Vec3, dt: f32) {
        self.velocity += force / self.mass * dt;
    }

    /// Evaluate the attached steering behavior against `target`
    pub fn steer(&mut self, target: &Target, dt: f32) {
        if let Some(pursuit) = self.steering {
            let force = pursuit.force(self, target);
            self.apply_force(force, dt);
        }
    }

    /// Integrate velocity into position
    ///
    /// Speed is capped at `max_speed`. Zero velocity leaves position and
    /// orientation untouched.
    pub fn step(&mut self, dt: f32) {
        if self.velocity == Vec3::ZERO {
            return;
        }

        self.velocity = self.velocity.clamp_length_max(self.max_speed.max(0.0));
        self.position += self.velocity * dt;

        if self.update_orientation && self.velocity.length_squared() > 1e-8 {
            self.look_at(self.position + self.velocity);
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_zero_velocity_is_noop() {
        let mut body = Body::new(Vec3::new(1.0, 0.5, 2.0), 0.5, 3.0);
        body.rotation = Quat::from_rotation_y(0.3);
        let before = body.transform();

        body.step(0.5);

        assert_eq!(body.transform(), before);
    }

    #[test]
    fn test_step_integrates_and_faces_velocity() {
        let mut body = Body::new(Vec3::ZERO, 0.5, 10.0);
        body.velocity = Vec3::new(2.0, 0.0, 0.0);

        body.step(0.5);

        assert!((body.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((body.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_step_keeps_orientation_when_flag_cleared() {
        let mut body = Body::new(Vec3::ZERO, 0.5, 10.0);
        body.update_orientation = false;
        body.velocity = Vec3::new(0.0, 0.0, -1.0);

        body.step(1.0);

        assert!((body.forward() - Vec3::Z).length() < 1e-5);
        assert!((body.position.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_step_caps_speed() {
        let mut body = Body::new(Vec3::ZERO, 0.5, 2.0);
        body.velocity = Vec3::new(10.0, 0.0, 0.0);

        body.step(1.0);

        assert!((body.speed() - 2.0).abs() < 1e-5);
        assert!((body.position.x - 2.0).abs() < 1e-5);
    }
}
