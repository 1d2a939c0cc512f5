//! Audio collaborator interface
//!
//! The core only names effects; loading, playback, restart-if-playing and
//! spatialization belong to whatever implements [`AudioSink`].

use serde::{Deserialize, Serialize};

use crate::sim::EntityId;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fires
    PlayerShot,
    /// Player takes a hit
    PlayerHit,
    /// Player destroyed
    PlayerExplode,
    /// Enemy volley (one per volley, not per projectile)
    EnemyShot,
    /// Enemy takes a hit
    EnemyHit,
    /// Pursuer or tower destroyed
    EnemyExplode,
    /// Guard destroyed
    CoreExplode,
    /// Hit absorbed by a guard's protection
    CoreShieldHit,
    /// Guard protection lifted
    CoreShieldDestroyed,
    /// Restart / continue confirmation
    ButtonClick,
}

impl SoundEffect {
    /// Symbolic name used to look up the asset
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::PlayerShot => "playerShot",
            SoundEffect::PlayerHit => "playerHit",
            SoundEffect::PlayerExplode => "playerExplode",
            SoundEffect::EnemyShot => "enemyShot",
            SoundEffect::EnemyHit => "enemyHit",
            SoundEffect::EnemyExplode => "enemyExplode",
            SoundEffect::CoreExplode => "coreExplode",
            SoundEffect::CoreShieldHit => "coreShieldHit",
            SoundEffect::CoreShieldDestroyed => "coreShieldDestroyed",
            SoundEffect::ButtonClick => "buttonClick",
        }
    }
}

/// Plays named effects on behalf of a combatant
pub trait AudioSink {
    /// `source` is the emitting entity (the world itself uses the player id
    /// for UI sounds)
    fn play(&mut self, source: EntityId, effect: SoundEffect);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _source: EntityId, _effect: SoundEffect) {}
}

/// Records every request in order
#[derive(Debug, Default)]
pub struct AudioLog {
    pub played: Vec<(EntityId, SoundEffect)>,
    muted: bool,
}

impl AudioLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute; muted requests are dropped
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of times `effect` was requested
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|(_, e)| *e == effect).count()
    }
}

impl AudioSink for AudioLog {
    fn play(&mut self, source: EntityId, effect: SoundEffect) {
        if self.muted {
            return;
        }
        log::trace!("audio {} for {}", effect.as_str(), source);
        self.played.push((source, effect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_log_counts_and_mutes() {
        let mut log = AudioLog::new();
        log.play(EntityId(1), SoundEffect::EnemyShot);
        log.play(EntityId(2), SoundEffect::EnemyShot);
        log.set_muted(true);
        log.play(EntityId(2), SoundEffect::EnemyShot);

        assert_eq!(log.count(SoundEffect::EnemyShot), 2);
        assert_eq!(log.count(SoundEffect::PlayerHit), 0);
    }
}
