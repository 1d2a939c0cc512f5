//! Arena Hack - simulation core of a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Real-time simulation (kinematics, behaviors, collisions, stages)
//! - `audio`: Audio collaborator interface (named effects per combatant)
//! - `render`: Render collaborator interface (spawn/despawn/transform sync)
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::{Quat, Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Host step (60 Hz) used by the headless runner
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default field extents (x, y, z). The field is centered on the origin.
    pub const DEFAULT_FIELD: Vec3 = Vec3::new(15.0, 1.0, 15.0);

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: u32 = 3;
    pub const PLAYER_MAX_SPEED: f32 = 6.0;
    pub const PLAYER_SHOTS_PER_SECOND: f32 = 10.0;
    pub const PLAYER_BRAKING_FORCE: f32 = 10.0;
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_HALF_SIZES: Vec3 = Vec3::new(0.1, 0.1, 0.5);
    pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.5, 5.0);

    /// Player projectile: fast needle with an oriented box
    pub const PLAYER_PROJECTILE_SPEED: f32 = 20.0;
    pub const PLAYER_PROJECTILE_RADIUS: f32 = 0.5;
    pub const PLAYER_PROJECTILE_HEIGHT: f32 = 0.5;
    pub const PLAYER_PROJECTILE_HALF_SIZES: Vec3 = Vec3::new(0.1, 0.1, 0.5);

    /// Enemy projectile: slower orb with a bounding sphere
    pub const ENEMY_PROJECTILE_SPEED: f32 = 10.0;
    pub const ENEMY_PROJECTILE_RADIUS: f32 = 0.4;
    pub const ENEMY_PROJECTILE_HEIGHT: f32 = 0.4;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 0.5;
    pub const ENEMY_MAX_SPEED: f32 = 1.0;
    pub const GUARD_MAX_HEALTH: u32 = 8;
    pub const PURSUER_MAX_HEALTH: u32 = 1;
    pub const TOWER_MAX_HEALTH: u32 = 8;

    /// Guard hit flash timings (seconds)
    pub const HIT_EFFECT_DURATION: f32 = 0.25;
    pub const HIT_EFFECT_MIN_DURATION: f32 = 0.15;

    /// Pursuit steering defaults
    pub const PURSUIT_MAX_SPEED: f32 = 2.0;
    pub const PURSUIT_PREDICTION: f32 = 1.0;

    /// Obstacles are unit cubes
    pub const OBSTACLE_SIZE: Vec3 = Vec3::ONE;
    pub const OBSTACLE_RADIUS: f32 = 0.5;

    /// Pause between a cleared stage and the next one (seconds)
    pub const STAGE_TRANSITION_PAUSE: f32 = 1.0;
    /// Upper bound for a single simulation delta (seconds)
    pub const MAX_DELTA: f32 = 0.1;
}

/// Rotation about +Y that turns local +Z toward `direction` (XZ plane only)
#[inline]
pub fn yaw_towards(direction: Vec3) -> Option<Quat> {
    let planar = Vec2::new(direction.x, direction.z);
    if planar.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(planar.x.atan2(planar.y)))
}

/// Lift a planar (x, z) vector into 3D on the ground plane
#[inline]
pub fn planar(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, v.y)
}
