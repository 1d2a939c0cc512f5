//! Steering behaviors
//!
//! Only pursuit is needed: a vehicle chases the player's predicted position.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::Body;

/// Snapshot of the entity being pursued, taken once per tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Target {
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward: Vec3,
}

impl Target {
    pub fn of(body: &Body) -> Self {
        Self {
            position: body.position,
            velocity: body.velocity,
            forward: body.forward(),
        }
    }
}

/// Pursue a moving target with a prediction horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pursuit {
    /// Scales the look-ahead time
    pub prediction: f32,
}

impl Pursuit {
    pub fn new(prediction: f32) -> Self {
        Self { prediction }
    }

    /// Steering force pulling `body` toward where `target` will be
    pub fn force(&self, body: &Body, target: &Target) -> Vec3 {
        let to_target = target.position - body.position;
        let heading = body.forward();

        // Target ahead and coming head-on: just seek its current position
        if to_target.dot(heading) > 0.0 && heading.dot(target.forward) < -0.95 {
            return seek(body, target.position);
        }

        let closing_speed = body.max_speed + target.velocity.length();
        let look_ahead = if closing_speed > 0.0 {
            to_target.length() / closing_speed * self.prediction
        } else {
            0.0
        };

        seek(body, target.position + target.velocity * look_ahead)
    }
}

/// Force that turns current velocity into full-speed motion toward `target`
pub fn seek(body: &Body, target: Vec3) -> Vec3 {
    let desired = (target - body.position).normalize_or_zero() * body.max_speed;
    desired - body.velocity
}
