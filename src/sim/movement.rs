//! Movement patterns
//!
//! The three path patterns overwrite position from session time each tick
//! (they do not integrate). Pursuit instead attaches a steering behavior
//! that the body's normal velocity integration consumes.

use serde::{Deserialize, Serialize};

use super::fsm::{Actor, BehaviorContext, State};
use super::steering::Pursuit;
use crate::consts::{PURSUIT_MAX_SPEED, PURSUIT_PREDICTION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementPattern {
    LeftRight(LeftRight),
    Wavy(Wavy),
    Circle(Circle),
    Pursuit(PursuitMovement),
}

impl MovementPattern {
    pub fn name(&self) -> &'static str {
        match self {
            MovementPattern::LeftRight(_) => "left_right",
            MovementPattern::Wavy(_) => "wavy",
            MovementPattern::Circle(_) => "circle",
            MovementPattern::Pursuit(_) => "pursuit",
        }
    }
}

impl State for MovementPattern {
    fn enter(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if let MovementPattern::Pursuit(pursuit) = self {
            pursuit.enter(owner, ctx);
        }
    }

    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        match self {
            MovementPattern::LeftRight(p) => p.execute(owner, ctx),
            MovementPattern::Wavy(p) => p.execute(owner, ctx),
            MovementPattern::Circle(p) => p.execute(owner, ctx),
            // Steering does the work during integration
            MovementPattern::Pursuit(_) => {}
        }
    }

    fn exit(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if let MovementPattern::Pursuit(pursuit) = self {
            pursuit.exit(owner, ctx);
        }
    }
}

/// Swing along X: `x = cos(t * speed) * spread`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeftRight {
    pub speed: f32,
    pub spread: f32,
}

impl Default for LeftRight {
    fn default() -> Self {
        Self {
            speed: 1.5,
            spread: 4.0,
        }
    }
}

impl LeftRight {
    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        owner.body.position.x = (ctx.elapsed * self.speed).cos() * self.spread;
    }
}

/// Figure-eight around `offset` on Z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wavy {
    pub speed: f32,
    pub spread: f32,
    pub offset: f32,
}

impl Default for Wavy {
    fn default() -> Self {
        Self {
            speed: 1.5,
            spread: 4.0,
            offset: -3.0,
        }
    }
}

impl Wavy {
    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        let t = ctx.elapsed * self.speed;
        owner.body.position.x = t.cos() * self.spread;
        owner.body.position.z = self.offset + t.sin() * t.cos() * self.spread;
    }
}

/// Circle around the field center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Circle {
    pub speed: f32,
    pub spread: f32,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            speed: 1.5,
            spread: 3.0,
        }
    }
}

impl Circle {
    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        let t = ctx.elapsed * self.speed;
        owner.body.position.x = t.sin() * self.spread;
        owner.body.position.z = -t.cos() * self.spread;
    }
}

/// Chase the player
///
/// While attached, the owner's speed cap is raised to at least `max_speed`;
/// the previous cap is restored on exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitMovement {
    pub prediction: f32,
    pub max_speed: f32,
    #[serde(skip)]
    saved_max_speed: Option<f32>,
}

impl Default for PursuitMovement {
    fn default() -> Self {
        Self {
            prediction: PURSUIT_PREDICTION,
            max_speed: PURSUIT_MAX_SPEED,
            saved_max_speed: None,
        }
    }
}

impl PursuitMovement {
    fn enter(&mut self, owner: &mut Actor, _ctx: &mut BehaviorContext<'_>) {
        let body = &mut owner.body;
        if self.saved_max_speed.is_none() {
            self.saved_max_speed = Some(body.max_speed);
        }
        body.max_speed = body.max_speed.max(self.max_speed);
        body.steering = Some(Pursuit::new(self.prediction));
    }

    fn exit(&mut self, owner: &mut Actor, _ctx: &mut BehaviorContext<'_>) {
        let body = &mut owner.body;
        body.steering = None;
        if let Some(saved) = self.saved_max_speed.take() {
            body.max_speed = saved;
        }
    }
}
