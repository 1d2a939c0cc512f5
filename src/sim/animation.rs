//! Linear property animations
//!
//! Used by stage content to ramp an enemy's fire rate from zero to a target
//! over time.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Animatable properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatedProperty {
    /// `shots_per_second` of the current combat pattern
    ShotsPerSecond,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    pub target: EntityId,
    pub property: AnimatedProperty,
    pub target_value: f32,
    /// Seconds from start of ramp to full value
    pub duration: f32,
    /// Seconds before the ramp starts
    pub delay: f32,
    elapsed: f32,
}

impl PropertyAnimation {
    pub fn new(
        target: EntityId,
        property: AnimatedProperty,
        target_value: f32,
        duration: f32,
        delay: f32,
    ) -> Self {
        Self {
            target,
            property,
            target_value,
            duration,
            delay,
            elapsed: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration + self.delay
    }

    /// Ramp progress in [0, 1]
    fn progress(&self) -> f32 {
        let active = (self.elapsed - self.delay).max(0.0);
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        (active / self.duration).min(1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationSystem {
    animations: Vec<PropertyAnimation>,
}

impl AnimationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, animation: PropertyAnimation) {
        self.animations.push(animation);
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }

    /// Advance every animation and hand each current value to `apply`
    ///
    /// `apply` returns false when the target no longer exists; such
    /// animations are dropped. Finished animations apply their final value
    /// and are then dropped.
    pub fn update<F>(&mut self, dt: f32, mut apply: F)
    where
        F: FnMut(EntityId, AnimatedProperty, f32) -> bool,
    {
        self.animations.retain_mut(|animation| {
            animation.elapsed += dt;

            let t = animation.progress();
            if t > 0.0 && !apply(animation.target, animation.property, animation.target_value * t) {
                return false;
            }

            !animation.is_finished()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_is_linear_after_delay() {
        let mut system = AnimationSystem::new();
        system.add(PropertyAnimation::new(
            EntityId(1),
            AnimatedProperty::ShotsPerSecond,
            4.0,
            2.0,
            1.0,
        ));

        let mut applied = Vec::new();
        for _ in 0..4 {
            system.update(0.5, |_, _, value| {
                applied.push(value);
                true
            });
        }

        // Nothing during the delay, then 1/4 and 1/2 of the target
        assert_eq!(applied, vec![1.0, 2.0]);
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_finished_animation_applies_final_value() {
        let mut system = AnimationSystem::new();
        system.add(PropertyAnimation::new(
            EntityId(1),
            AnimatedProperty::ShotsPerSecond,
            3.0,
            1.0,
            0.0,
        ));

        let mut last = 0.0;
        system.update(1.5, |_, _, value| {
            last = value;
            true
        });

        assert_eq!(last, 3.0);
        assert!(system.is_empty());
    }

    #[test]
    fn test_missing_target_drops_animation() {
        let mut system = AnimationSystem::new();
        system.add(PropertyAnimation::new(
            EntityId(1),
            AnimatedProperty::ShotsPerSecond,
            3.0,
            10.0,
            0.0,
        ));

        system.update(0.1, |_, _, _| false);

        assert!(system.is_empty());
    }
}
