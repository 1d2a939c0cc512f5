//! Combat patterns
//!
//! Every pattern fires when `elapsed - last_shot > 1 / shots_per_second`.
//! A pattern that has never fired is ready immediately after `enter`.
//! One `EnemyShot` sound is emitted per volley, however many projectiles
//! it contains. Each projectile is independently made destructible with
//! probability `destructible_projectiles`.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fsm::{Actor, BehaviorContext, State};
use super::projectile::Projectile;
use crate::audio::SoundEffect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatPattern {
    Default(DefaultPattern),
    Spread(SpreadPattern),
    Focus(FocusPattern),
}

impl CombatPattern {
    pub fn name(&self) -> &'static str {
        match self {
            CombatPattern::Default(_) => "default",
            CombatPattern::Spread(_) => "spread",
            CombatPattern::Focus(_) => "focus",
        }
    }

    pub fn shots_per_second(&self) -> f32 {
        match self {
            CombatPattern::Default(p) => p.shots_per_second,
            CombatPattern::Spread(p) => p.shots_per_second,
            CombatPattern::Focus(p) => p.shots_per_second,
        }
    }

    /// Used by property animations to ramp fire rate
    pub fn set_shots_per_second(&mut self, value: f32) {
        match self {
            CombatPattern::Default(p) => p.shots_per_second = value,
            CombatPattern::Spread(p) => p.shots_per_second = value,
            CombatPattern::Focus(p) => p.shots_per_second = value,
        }
    }

    pub fn destructible_fraction(&self) -> f32 {
        match self {
            CombatPattern::Default(p) => p.destructible_projectiles,
            CombatPattern::Spread(p) => p.destructible_projectiles,
            CombatPattern::Focus(p) => p.destructible_projectiles,
        }
    }
}

impl State for CombatPattern {
    fn enter(&mut self, _owner: &mut Actor, _ctx: &mut BehaviorContext<'_>) {
        match self {
            CombatPattern::Default(p) => p.last_shot_time = None,
            CombatPattern::Spread(p) => p.last_shot_time = None,
            CombatPattern::Focus(p) => p.reset(),
        }
    }

    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        match self {
            CombatPattern::Default(p) => p.execute(owner, ctx),
            CombatPattern::Spread(p) => p.execute(owner, ctx),
            CombatPattern::Focus(p) => p.execute(owner, ctx),
        }
    }
}

/// Whether enough time has passed since the last shot
fn ready(last_shot_time: Option<f32>, elapsed: f32, shots_per_second: f32) -> bool {
    if shots_per_second <= 0.0 {
        return false;
    }
    last_shot_time.is_none_or(|last| elapsed - last > 1.0 / shots_per_second)
}

/// Spawn one enemy projectile travelling along `direction`
///
/// A non-finite fraction counts as 0.
fn launch(owner: &Actor, direction: Vec3, destructible_fraction: f32, ctx: &mut BehaviorContext<'_>) {
    let fraction = if destructible_fraction.is_finite() {
        destructible_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let destructible = ctx.rng.random_bool(f64::from(fraction));
    ctx.fire(Projectile::enemy(owner, direction, destructible));
}

/// Direction for fan angle `s` relative to the owner's forward axis
#[inline]
fn fan_direction(owner: &Actor, s: f32) -> Vec3 {
    owner.body.rotation * Vec3::new(s.sin(), 0.0, s.cos())
}

/// Symmetric fan centered on the forward direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPattern {
    pub shots_per_second: f32,
    pub projectiles_per_shot: u32,
    /// Probability in [0, 1] that a projectile is destructible
    pub destructible_projectiles: f32,
    /// Angle between adjacent projectiles (radians)
    pub angular_step: f32,
    #[serde(skip)]
    last_shot_time: Option<f32>,
}

impl Default for DefaultPattern {
    fn default() -> Self {
        Self {
            shots_per_second: 0.5,
            projectiles_per_shot: 3,
            destructible_projectiles: 0.0,
            angular_step: std::f32::consts::PI * 0.167,
            last_shot_time: None,
        }
    }
}

impl DefaultPattern {
    pub fn last_shot_time(&self) -> Option<f32> {
        self.last_shot_time
    }

    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if self.projectiles_per_shot == 0
            || !ready(self.last_shot_time, ctx.elapsed, self.shots_per_second)
        {
            return;
        }
        self.last_shot_time = Some(ctx.elapsed);

        let half_angle = self.angular_step * (self.projectiles_per_shot - 1) as f32 / 2.0;
        for i in 0..self.projectiles_per_shot {
            let s = half_angle - self.angular_step * i as f32;
            launch(owner, fan_direction(owner, s), self.destructible_projectiles, ctx);
        }

        ctx.play(owner.id, SoundEffect::EnemyShot);
    }
}

/// Full ring of projectiles, optionally rotating over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadPattern {
    pub shots_per_second: f32,
    pub projectiles_per_shot: u32,
    pub destructible_projectiles: f32,
    pub enable_rotation: bool,
    /// Ring rotation in radians per second of session time
    pub rotation_speed: f32,
    #[serde(skip)]
    last_shot_time: Option<f32>,
}

impl Default for SpreadPattern {
    fn default() -> Self {
        Self {
            shots_per_second: 1.0,
            projectiles_per_shot: 6,
            destructible_projectiles: 0.0,
            enable_rotation: true,
            rotation_speed: 1.0,
            last_shot_time: None,
        }
    }
}

impl SpreadPattern {
    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        if self.projectiles_per_shot == 0
            || !ready(self.last_shot_time, ctx.elapsed, self.shots_per_second)
        {
            return;
        }
        self.last_shot_time = Some(ctx.elapsed);

        let count = self.projectiles_per_shot as f32;
        for i in 0..self.projectiles_per_shot {
            let mut s = TAU * (i as f32 / count);
            if self.enable_rotation {
                s += ctx.elapsed * self.rotation_speed;
            }
            launch(owner, fan_direction(owner, s), self.destructible_projectiles, ctx);
        }

        ctx.play(owner.id, SoundEffect::EnemyShot);
    }
}

/// Bursts of single forward shots separated by pauses
///
/// `next_pause_time` and `next_shot_time` are never both pending: whichever
/// phase is running owns the only finite deadline, the other is infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusPattern {
    pub shots_per_second: f32,
    pub destructible_projectiles: f32,
    /// Length of a shooting phase (seconds)
    pub shot_duration: f32,
    /// Length of a pause phase (seconds)
    pub pause_duration: f32,
    #[serde(skip)]
    shooting: bool,
    #[serde(skip)]
    last_shot_time: Option<f32>,
    #[serde(skip, default = "infinity")]
    next_pause_time: f32,
    #[serde(skip, default = "neg_infinity")]
    next_shot_time: f32,
}

fn infinity() -> f32 {
    f32::INFINITY
}

fn neg_infinity() -> f32 {
    f32::NEG_INFINITY
}

impl Default for FocusPattern {
    fn default() -> Self {
        Self {
            shots_per_second: 10.0,
            destructible_projectiles: 0.0,
            shot_duration: 1.0,
            pause_duration: 0.5,
            shooting: true,
            last_shot_time: None,
            next_pause_time: f32::INFINITY,
            next_shot_time: f32::NEG_INFINITY,
        }
    }
}

impl FocusPattern {
    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn next_pause_time(&self) -> f32 {
        self.next_pause_time
    }

    pub fn next_shot_time(&self) -> f32 {
        self.next_shot_time
    }

    fn reset(&mut self) {
        self.shooting = true;
        self.last_shot_time = None;
        self.next_pause_time = f32::INFINITY;
        self.next_shot_time = f32::NEG_INFINITY;
    }

    fn execute(&mut self, owner: &mut Actor, ctx: &mut BehaviorContext<'_>) {
        let elapsed = ctx.elapsed;

        // At most one phase transition per tick
        if elapsed >= self.next_pause_time {
            self.shooting = false;
            self.next_pause_time = f32::INFINITY;
            self.next_shot_time = elapsed + self.pause_duration;
        } else if elapsed >= self.next_shot_time {
            self.shooting = true;
            self.next_shot_time = f32::INFINITY;
            self.next_pause_time = elapsed + self.shot_duration;
        }

        if self.shooting && ready(self.last_shot_time, elapsed, self.shots_per_second) {
            self.last_shot_time = Some(elapsed);
            launch(owner, owner.body.forward(), self.destructible_projectiles, ctx);
            ctx.play(owner.id, SoundEffect::EnemyShot);
        }
    }
}
