//! Arena Hack headless runner
//!
//! Plays the built-in stages with a simple autopilot, logging stage
//! transitions. Usage: `arena-hack [settings.json]`

use std::error::Error;
use std::rc::Rc;

use glam::Vec2;

use arena_hack::audio::{AudioLog, SoundEffect};
use arena_hack::consts::{MAX_SUBSTEPS, SIM_DT};
use arena_hack::render::SceneMirror;
use arena_hack::sim::{Enemy, GameEvent, StageCatalog, TickInput, World};
use arena_hack::Settings;

/// Host frame length fed to the accumulator (30 fps display)
const FRAME_DT: f32 = 1.0 / 30.0;

/// Runner state
struct Game {
    world: World,
    audio: AudioLog,
    scene: SceneMirror,
    accumulator: f32,
    victories: u32,
    defeats: u32,
}

impl Game {
    fn new(settings: Settings) -> Result<Self, Box<dyn Error>> {
        let stages = StageCatalog::builtin()?;
        let mut world = World::new(settings, Rc::new(stages));
        world.start()?;

        Ok(Self {
            world,
            audio: AudioLog::new(),
            scene: SceneMirror::new(),
            accumulator: 0.0,
            victories: 0,
            defeats: 0,
        })
    }

    /// Run fixed-step updates for one host frame
    fn frame(&mut self, frame_dt: f32) -> Result<(), Box<dyn Error>> {
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot(&self.world);
            self.world.tick(&input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }

        self.world.dispatch(&mut self.audio, &mut self.scene);
        self.report()?;
        Ok(())
    }

    /// Log what happened this frame and restart after a game over
    fn report(&mut self) -> Result<(), Box<dyn Error>> {
        let mut game_over = false;
        for event in self.scene.notifications.drain(..) {
            match event {
                GameEvent::StageLoaded { stage } => log::info!("stage {stage} begins"),
                GameEvent::StageCleared { stage } => log::info!(
                    "stage {stage} cleared at {:.1}s ({} shots fired)",
                    self.world.elapsed(),
                    self.audio.count(SoundEffect::PlayerShot)
                ),
                GameEvent::GameOver { won } => {
                    if won {
                        self.victories += 1;
                    } else {
                        self.defeats += 1;
                    }
                    game_over = true;
                }
                _ => {}
            }
        }

        if game_over {
            log::info!(
                "game over on stage {} (won {}, lost {})",
                self.world.current_stage(),
                self.victories,
                self.defeats
            );
            self.world.restart()?;
        }
        Ok(())
    }
}

/// Aim at the nearest enemy, strafe, keep firing
fn autopilot(world: &World) -> TickInput {
    let player = world.player().body().position;
    let registries = world.registries();

    let nearest = registries
        .pursuers
        .iter()
        .map(|e| e.body().position)
        .chain(registries.towers.iter().map(|e| e.body().position))
        .chain(registries.guards.iter().map(|e| e.body().position))
        .min_by(|a, b| {
            a.distance_squared(player)
                .total_cmp(&b.distance_squared(player))
        });

    let Some(target) = nearest else {
        return TickInput::default();
    };

    let aim = Vec2::new(target.x - player.x, target.z - player.z);
    let strafe = Vec2::new((world.elapsed() * 0.7).sin(), 0.0);

    TickInput {
        movement: strafe,
        aim: Some(aim),
        fire: true,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading settings from {path}");
            Settings::load(&path)?
        }
        None => Settings::default(),
    };
    log::info!("Arena Hack (headless) starting with seed {:#x}", settings.seed);

    let frames = (settings.demo_seconds / FRAME_DT).ceil() as u32;
    let mut game = Game::new(settings)?;
    for _ in 0..frames {
        game.frame(FRAME_DT)?;
    }

    log::info!(
        "finished after {:.1}s on stage {} with {} entities in scene (won {}, lost {})",
        game.world.elapsed(),
        game.world.current_stage(),
        game.scene.entities.len(),
        game.victories,
        game.defeats
    );
    Ok(())
}
