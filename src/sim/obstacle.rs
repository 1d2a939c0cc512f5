//! Static obstacles
//!
//! Bounding volumes are only recomputed when the obstacle is flagged dirty;
//! the flag is consumed once during render sync.

use glam::{Quat, Vec3};

use super::bounds::{Aabb, Obb, Sphere};
use super::entity::{EntityId, Transform};
use crate::consts::{OBSTACLE_RADIUS, OBSTACLE_SIZE};

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    position: Vec3,
    size: Vec3,
    bounding_radius: f32,
    aabb: Aabb,
    obb: Obb,
    needs_update: bool,
}

impl Obstacle {
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            position,
            size: OBSTACLE_SIZE,
            bounding_radius: OBSTACLE_RADIUS,
            aabb: Aabb::from_center_and_size(position, OBSTACLE_SIZE),
            obb: Obb::axis_aligned(position, OBSTACLE_SIZE * 0.5),
            needs_update: true,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    #[inline]
    pub fn obb(&self) -> &Obb {
        &self.obb
    }

    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.position, self.bounding_radius)
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Move the obstacle; volumes follow at the next render sync
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.needs_update = true;
    }

    pub fn update_bounding_volumes(&mut self) {
        self.aabb = Aabb::from_center_and_size(self.position, self.size);
        self.obb = Obb::axis_aligned(self.position, self.size * 0.5);
    }

    /// Recompute volumes if dirty and clear the flag. Returns whether the
    /// obstacle was dirty.
    pub fn take_dirty(&mut self) -> bool {
        if !self.needs_update {
            return false;
        }
        self.update_bounding_volumes();
        self.needs_update = false;
        true
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: Quat::IDENTITY,
        }
    }
}
