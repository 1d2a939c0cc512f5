//! Non-penetration solver
//!
//! One pass over ordered pairs. For each pair (a, b) only `a` moves, pushed
//! out of `b` along the center line by the full overlap. Visiting both
//! orders approximates a symmetric solve.

use glam::Vec3;

/// A body taking part in the solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub position: Vec3,
    pub radius: f32,
    /// Static bodies (towers, obstacles) push but are never pushed
    pub movable: bool,
}

impl Disc {
    pub fn new(position: Vec3, radius: f32, movable: bool) -> Self {
        Self {
            position,
            radius,
            movable,
        }
    }
}

/// Push `position` out of `other`; returns whether the pair overlapped
///
/// Coincident centers use a divisor of 1, which leaves the zero separation
/// vector unchanged: no correction that tick.
pub fn separate(position: &mut Vec3, radius: f32, other: Vec3, other_radius: f32) -> bool {
    let to_self = *position - other;
    let distance = to_self.length();
    let overlap = (radius + other_radius) - distance;

    if overlap < 0.0 {
        return false;
    }

    let divisor = if distance == 0.0 { 1.0 } else { distance };
    *position += to_self / divisor * overlap;
    true
}

/// Run one solver pass in slice order; returns the number of corrections
pub fn resolve(discs: &mut [Disc]) -> usize {
    let mut corrections = 0;
    for i in 0..discs.len() {
        if !discs[i].movable {
            continue;
        }
        for j in 0..discs.len() {
            if i == j {
                continue;
            }
            let other = discs[j];
            let disc = &mut discs[i];
            if separate(&mut disc.position, disc.radius, other.position, other.radius) {
                corrections += 1;
            }
        }
    }
    corrections
}
