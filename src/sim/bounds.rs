//! Bounding volumes and intersection tests
//!
//! Spheres for cheap checks, oriented boxes where orientation matters, and
//! axis-aligned boxes for obstacle sliding. All tests treat touching as
//! intersecting.

use glam::{Mat3, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Broad phase: squared center distance against squared radius sum
#[inline]
pub fn broad_phase(a: Vec3, radius_a: f32, b: Vec3, radius_b: f32) -> bool {
    let range = radius_a + radius_b;
    a.distance_squared(b) <= range * range
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        broad_phase(self.center, self.radius, other.center, other.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_and_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Grow every face outward by `amount`
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_sizes(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Outward normal of the face nearest to a point on the surface
    pub fn normal_from_surface_point(&self, point: Vec3) -> Vec3 {
        let center = self.center();
        let half = self.half_sizes();
        let offset = point - center;

        let mut normal = Vec3::ZERO;
        let mut min_distance = f32::INFINITY;

        for axis in 0..3 {
            let distance = (half[axis] - offset[axis].abs()).abs();
            if distance < min_distance {
                min_distance = distance;
                normal = Vec3::ZERO;
                normal[axis] = offset[axis].signum();
            }
        }

        normal
    }
}

/// Oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: Vec3,
    pub half_sizes: Vec3,
    /// Columns are the box's local axes
    pub rotation: Mat3,
}

impl Obb {
    pub fn new(center: Vec3, half_sizes: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_sizes,
            rotation: Mat3::from_quat(rotation),
        }
    }

    pub fn axis_aligned(center: Vec3, half_sizes: Vec3) -> Self {
        Self {
            center,
            half_sizes,
            rotation: Mat3::IDENTITY,
        }
    }

    /// Point on or inside the box nearest to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let d = point - self.center;
        let mut closest = self.center;

        for axis in 0..3 {
            let dir = self.rotation.col(axis);
            let extent = self.half_sizes[axis];
            let distance = d.dot(dir).clamp(-extent, extent);
            closest += dir * distance;
        }

        closest
    }

    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let closest = self.closest_point(sphere.center);
        closest.distance_squared(sphere.center) <= sphere.radius * sphere.radius
    }

    /// Separating axis test over the 15 candidate axes
    pub fn intersects_obb(&self, other: &Obb) -> bool {
        const EPSILON: f32 = 1e-6;

        let a = [self.rotation.col(0), self.rotation.col(1), self.rotation.col(2)];
        let b = [
            other.rotation.col(0),
            other.rotation.col(1),
            other.rotation.col(2),
        ];
        let ea = self.half_sizes;
        let eb = other.half_sizes;

        // Rotation expressing `other` in this box's frame
        let mut r = [[0.0f32; 3]; 3];
        let mut abs_r = [[0.0f32; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                r[i][j] = a[i].dot(b[j]);
                // Epsilon guards against near-parallel edges producing a null cross product
                abs_r[i][j] = r[i][j].abs() + EPSILON;
            }
        }

        let t_world = other.center - self.center;
        let t = [t_world.dot(a[0]), t_world.dot(a[1]), t_world.dot(a[2])];

        // Axes A0, A1, A2
        for i in 0..3 {
            let ra = ea[i];
            let rb = eb[0] * abs_r[i][0] + eb[1] * abs_r[i][1] + eb[2] * abs_r[i][2];
            if t[i].abs() > ra + rb {
                return false;
            }
        }

        // Axes B0, B1, B2
        for j in 0..3 {
            let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
            let rb = eb[j];
            let tj = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
            if tj.abs() > ra + rb {
                return false;
            }
        }

        // Axes Ai x Bj
        for i in 0..3 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;
            for j in 0..3 {
                let j1 = (j + 1) % 3;
                let j2 = (j + 2) % 3;

                let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
                let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
                let tl = t[i2] * r[i1][j] - t[i1] * r[i2][j];
                if tl.abs() > ra + rb {
                    return false;
                }
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the entry point, or the exit point when the origin
    /// is already inside the box.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<Vec3> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];

            if dir.abs() < f32::EPSILON {
                if origin < aabb.min[axis] || origin > aabb.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (aabb.min[axis] - origin) * inv;
            let mut t1 = (aabb.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }

        Some(self.at(if t_min >= 0.0 { t_min } else { t_max }))
    }
}

/// Precise narrow-phase shape of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Obb(Obb),
}

impl Shape {
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Sphere(a), Shape::Sphere(b)) => a.intersects_sphere(b),
            (Shape::Sphere(s), Shape::Obb(o)) | (Shape::Obb(o), Shape::Sphere(s)) => {
                o.intersects_sphere(s)
            }
            (Shape::Obb(a), Shape::Obb(b)) => a.intersects_obb(b),
        }
    }
}

/// Rectangular play field centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Full extents (x, y, z)
    pub size: Vec3,
}

impl Field {
    pub fn new(size: Vec3) -> Self {
        Self { size }
    }

    /// Half extents on the ground plane (x, z)
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.size.x * 0.5, self.size.z * 0.5)
    }

    /// Whether `position` lies inside the rectangle on both ground axes
    pub fn contains(&self, position: Vec3) -> bool {
        let half = self.half_extents();
        position.x.abs() <= half.x && position.z.abs() <= half.y
    }

    /// Clamp a position so a body of `radius` stays inside
    pub fn clamp(&self, position: Vec3, radius: f32) -> Vec3 {
        let half = (self.half_extents() - Vec2::splat(radius)).max(Vec2::ZERO);
        Vec3::new(
            position.x.clamp(-half.x, half.x),
            position.y,
            position.z.clamp(-half.y, half.y),
        )
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_broad_phase_touching_counts() {
        assert!(broad_phase(Vec3::ZERO, 0.5, Vec3::new(1.0, 0.0, 0.0), 0.5));
        assert!(!broad_phase(Vec3::ZERO, 0.5, Vec3::new(1.01, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_obb_sphere_respects_rotation() {
        // Needle along +Z, rotated 45 degrees about Y
        let obb = Obb::new(Vec3::ZERO, Vec3::new(0.1, 0.1, 1.0), Quat::from_rotation_y(FRAC_PI_4));
        let along = Vec3::new(0.6, 0.0, 0.6);
        let across = Vec3::new(0.6, 0.0, -0.6);

        assert!(obb.intersects_sphere(&Sphere::new(along, 0.1)));
        assert!(!obb.intersects_sphere(&Sphere::new(across, 0.1)));
    }

    #[test]
    fn test_obb_obb_separated_and_overlapping() {
        let a = Obb::axis_aligned(Vec3::ZERO, Vec3::splat(0.5));
        let b = Obb::axis_aligned(Vec3::new(0.9, 0.0, 0.0), Vec3::splat(0.5));
        let c = Obb::axis_aligned(Vec3::new(1.2, 0.0, 0.0), Vec3::splat(0.5));

        assert!(a.intersects_obb(&b));
        assert!(!a.intersects_obb(&c));
    }

    #[test]
    fn test_obb_obb_rotated_corner_reaches() {
        let a = Obb::axis_aligned(Vec3::ZERO, Vec3::splat(0.5));
        // Diamond whose corner pokes toward `a`
        let b = Obb::new(Vec3::new(1.15, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5), Quat::from_rotation_y(FRAC_PI_4));
        assert!(a.intersects_obb(&b));

        let far = Obb::new(Vec3::new(1.3, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5), Quat::from_rotation_y(FRAC_PI_4));
        assert!(!a.intersects_obb(&far));
    }

    #[test]
    fn test_ray_aabb_entry_and_miss() {
        let aabb = Aabb::from_center_and_size(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = ray.intersect_aabb(&aabb).unwrap();
        assert!((hit.z - 4.5).abs() < 1e-5);

        let away = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(away.intersect_aabb(&aabb).is_none());

        let aside = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::Z);
        assert!(aside.intersect_aabb(&aabb).is_none());
    }

    #[test]
    fn test_ray_from_inside_returns_exit() {
        let aabb = Aabb::from_center_and_size(Vec3::ZERO, Vec3::splat(2.0));
        let hit = Ray::new(Vec3::ZERO, Vec3::X).intersect_aabb(&aabb).unwrap();
        assert!((hit.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_surface_normal() {
        let aabb = Aabb::from_center_and_size(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(aabb.normal_from_surface_point(Vec3::new(0.2, 0.0, -1.0)), Vec3::NEG_Z);
        assert_eq!(aabb.normal_from_surface_point(Vec3::new(1.0, 0.3, 0.1)), Vec3::X);
    }

    #[test]
    fn test_field_contains_and_clamp() {
        let field = Field::new(Vec3::new(10.0, 1.0, 6.0));
        assert!(field.contains(Vec3::new(5.0, 9.0, -3.0)));
        assert!(!field.contains(Vec3::new(5.1, 0.0, 0.0)));
        assert!(!field.contains(Vec3::new(0.0, 0.0, -3.1)));

        let clamped = field.clamp(Vec3::new(20.0, 0.5, -20.0), 0.5);
        assert_eq!(clamped, Vec3::new(4.5, 0.5, -2.5));
    }

    proptest! {
        #[test]
        fn prop_shape_intersection_is_symmetric(
            ax in -3.0f32..3.0, az in -3.0f32..3.0, yaw_a in -3.2f32..3.2,
            bx in -3.0f32..3.0, bz in -3.0f32..3.0, yaw_b in -3.2f32..3.2,
            r in 0.1f32..1.0,
        ) {
            let a = Shape::Obb(Obb::new(Vec3::new(ax, 0.0, az), Vec3::new(0.1, 0.1, 0.5), Quat::from_rotation_y(yaw_a)));
            let b = Shape::Obb(Obb::new(Vec3::new(bx, 0.0, bz), Vec3::splat(0.5), Quat::from_rotation_y(yaw_b)));
            let s = Shape::Sphere(Sphere::new(Vec3::new(bx, 0.0, bz), r));

            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            prop_assert_eq!(a.intersects(&s), s.intersects(&a));
        }
    }
}
