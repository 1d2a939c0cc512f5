//! Stage content
//!
//! A [`StageSource`] populates an emptied world for a given stage index using
//! only the public spawn API. [`StageCatalog`] is the data-driven source
//! shipped with the game; [`ScriptedStages`] wraps a closure for harnesses.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::animation::{AnimatedProperty, PropertyAnimation};
use super::combat::CombatPattern;
use super::entity::EntityId;
use super::movement::MovementPattern;
use super::world::World;

const BUILTIN_STAGES: &str = include_str!("../../assets/stages.json");

#[derive(Debug, Error)]
pub enum StageError {
    #[error("unknown stage {0}")]
    UnknownStage(u32),
    #[error("malformed stage data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("stage {stage}: {reason}")]
    InvalidPattern { stage: u32, reason: String },
    #[error("no enemy with id {0}")]
    UnknownEntity(EntityId),
}

/// Supplies the content of each stage, indexed from 1
pub trait StageSource {
    fn stage_count(&self) -> u32;

    /// Populate `world` for `stage`. The world has already been emptied.
    fn load(&self, stage: u32, world: &mut World) -> Result<(), StageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Guard,
    Pursuer,
    Tower,
}

/// Linear fire-rate ramp from zero to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampDef {
    pub target: f32,
    pub duration: f32,
    #[serde(default)]
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub kind: EnemyKind,
    pub position: Vec3,
    #[serde(default)]
    pub max_speed: Option<f32>,
    #[serde(default = "default_true")]
    pub update_orientation: bool,
    #[serde(default)]
    pub movement: Option<MovementPattern>,
    #[serde(default)]
    pub combat: Option<CombatPattern>,
    /// Overrides the combat pattern's fire rate with a draw from `[min, max)`
    #[serde(default)]
    pub shots_per_second_range: Option<[f32; 2]>,
    /// Guards only
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub ramp: Option<RampDef>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    /// Keeps the previous stage's field when absent
    #[serde(default)]
    pub field: Option<Vec3>,
    pub player_start: Vec3,
    #[serde(default)]
    pub guards_protected: bool,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub obstacles: Vec<Vec3>,
}

impl StageDef {
    fn validate(&self, stage: u32) -> Result<(), StageError> {
        let invalid = |reason: String| StageError::InvalidPattern { stage, reason };

        if let Some(field) = self.field {
            if field.x <= 0.0 || field.z <= 0.0 {
                return Err(invalid(format!("field must be positive, got {field}")));
            }
        }

        for (i, enemy) in self.enemies.iter().enumerate() {
            if let Some(combat) = &enemy.combat {
                let fraction = combat.destructible_fraction();
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(invalid(format!(
                        "enemy {i}: destructible_projectiles {fraction} outside [0, 1]"
                    )));
                }
                let rate = combat.shots_per_second();
                if !rate.is_finite() || rate < 0.0 {
                    return Err(invalid(format!("enemy {i}: bad shots_per_second {rate}")));
                }
            }
            if let Some([min, max]) = enemy.shots_per_second_range {
                if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
                    return Err(invalid(format!("enemy {i}: bad shots_per_second_range")));
                }
            }
            if enemy.kind == EnemyKind::Tower && enemy.movement.is_some() {
                return Err(invalid(format!("enemy {i}: towers cannot move")));
            }
            if enemy.protected && enemy.kind != EnemyKind::Guard {
                return Err(invalid(format!("enemy {i}: only guards can be protected")));
            }
        }
        Ok(())
    }

    /// Spawn everything this stage describes
    pub fn apply(&self, stage: u32, world: &mut World) -> Result<(), StageError> {
        self.validate(stage)?;

        if let Some(field) = self.field {
            world.set_field(field);
        }
        world.place_player(self.player_start);
        world.set_guards_protected(self.guards_protected);

        for enemy in &self.enemies {
            let id = match enemy.kind {
                EnemyKind::Guard => world.spawn_guard(enemy.position),
                EnemyKind::Pursuer => world.spawn_pursuer(enemy.position),
                EnemyKind::Tower => world.spawn_tower(enemy.position),
            };

            if let Some(body) = world.enemy_body_mut(id) {
                if let Some(max_speed) = enemy.max_speed {
                    body.max_speed = max_speed;
                }
                body.update_orientation = enemy.update_orientation;
            }

            if let Some(mut combat) = enemy.combat.clone() {
                if let Some([min, max]) = enemy.shots_per_second_range {
                    combat.set_shots_per_second(world.random_range(min, max));
                }
                world.set_combat_pattern(id, combat)?;
            }
            if let Some(movement) = enemy.movement.clone() {
                world.set_movement_pattern(id, movement)?;
            }
            if enemy.protected {
                world.protect_guard(id)?;
            }
            if let Some(ramp) = &enemy.ramp {
                world.add_animation(PropertyAnimation::new(
                    id,
                    AnimatedProperty::ShotsPerSecond,
                    ramp.target,
                    ramp.duration,
                    ramp.delay,
                ));
            }
        }

        for &position in &self.obstacles {
            world.add_obstacle(position);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    stages: Vec<StageDef>,
}

/// Data-driven stage list
#[derive(Debug, Clone)]
pub struct StageCatalog {
    stages: Vec<StageDef>,
}

impl StageCatalog {
    pub fn from_json(json: &str) -> Result<Self, StageError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for (i, stage) in file.stages.iter().enumerate() {
            stage.validate(i as u32 + 1)?;
        }
        Ok(Self { stages: file.stages })
    }

    /// The stages shipped with the game
    pub fn builtin() -> Result<Self, StageError> {
        Self::from_json(BUILTIN_STAGES)
    }

    pub fn stage(&self, stage: u32) -> Option<&StageDef> {
        let index = usize::try_from(stage).ok()?.checked_sub(1)?;
        self.stages.get(index)
    }
}

impl StageSource for StageCatalog {
    fn stage_count(&self) -> u32 {
        self.stages.len() as u32
    }

    fn load(&self, stage: u32, world: &mut World) -> Result<(), StageError> {
        self.stage(stage)
            .ok_or(StageError::UnknownStage(stage))?
            .apply(stage, world)
    }
}

/// Stage source backed by a closure
pub struct ScriptedStages<F> {
    count: u32,
    loader: F,
}

impl<F> ScriptedStages<F>
where
    F: Fn(u32, &mut World) -> Result<(), StageError>,
{
    pub fn new(count: u32, loader: F) -> Self {
        Self { count, loader }
    }
}

impl<F> StageSource for ScriptedStages<F>
where
    F: Fn(u32, &mut World) -> Result<(), StageError>,
{
    fn stage_count(&self) -> u32 {
        self.count
    }

    fn load(&self, stage: u32, world: &mut World) -> Result<(), StageError> {
        if stage == 0 || stage > self.count {
            return Err(StageError::UnknownStage(stage));
        }
        (self.loader)(stage, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = StageCatalog::builtin().unwrap();
        assert_eq!(catalog.stage_count(), 11);

        let first = catalog.stage(1).unwrap();
        assert_eq!(first.enemies.len(), 1);
        assert_eq!(first.enemies[0].kind, EnemyKind::Guard);
        assert!(matches!(first.enemies[0].movement, Some(MovementPattern::LeftRight(_))));

        assert!(catalog.stage(0).is_none());
        assert!(catalog.stage(12).is_none());
    }

    #[test]
    fn test_protected_stages_have_escorts() {
        let catalog = StageCatalog::builtin().unwrap();
        for index in 1..=catalog.stage_count() {
            let stage = catalog.stage(index).unwrap();
            if stage.guards_protected {
                assert!(
                    stage
                        .enemies
                        .iter()
                        .any(|e| matches!(e.kind, EnemyKind::Pursuer | EnemyKind::Tower)),
                    "stage {index} is protected without escorts"
                );
            }
        }
    }

    #[test]
    fn test_rejects_bad_destructible_fraction() {
        let json = r#"{ "stages": [ {
            "player_start": [0, 0.5, 5],
            "enemies": [ {
                "kind": "guard",
                "position": [0, 0.5, -4],
                "combat": { "type": "default", "destructible_projectiles": 1.5 }
            } ]
        } ] }"#;

        let err = StageCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, StageError::InvalidPattern { stage: 1, .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            StageCatalog::from_json("{ \"stages\": 3 }"),
            Err(StageError::Parse(_))
        ));
    }
}
