use bevy::log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::game_logic::{
    CompletedLap, DriveInput, FIXED_TIMESTEP, MAX_FRAME_DELTA, RoadElement, TrackError, World,
    step,
};
use crate::settings::RaceSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RaceMode {
    /// Raster sheets not loaded yet; only a placeholder is drawn.
    #[default]
    Loading,
    Waiting,
    Playing,
}

/// Turns wall-clock frame deltas into a whole number of fixed simulation steps.
#[derive(Clone, Debug)]
pub struct FixedStepper {
    accumulated: f32,
    step: f32,
}

impl FixedStepper {
    pub fn new(step: f32) -> Self {
        Self {
            accumulated: 0.0,
            step,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Bank `frame_delta` (clamped to `MAX_FRAME_DELTA`) and return how many
    /// whole steps are now due.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        let delta = if frame_delta.is_finite() {
            frame_delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.accumulated += delta;
        let mut steps = 0;
        while self.accumulated >= self.step {
            self.accumulated -= self.step;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(FIXED_TIMESTEP)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub steps: u32,
    pub completed_laps: Vec<CompletedLap>,
}

/// Values the host shows around the game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudSnapshot {
    pub mode: RaceMode,
    pub speed: f32,
    pub current_lap_time: f32,
    pub last_lap_time: Option<f32>,
    pub best_lap_time: Option<f32>,
}

impl HudSnapshot {
    /// Speed as shown to the driver, rounded to 5 mph.
    pub fn speed_mph(&self) -> u32 {
        (5.0 * (self.speed / 500.0).round()) as u32
    }
}

/// What the renderer should draw this frame.
pub enum Scene<'a> {
    Loading { time: f32 },
    Idle { world: &'a World, time: f32 },
    Racing { world: &'a World },
}

/// The waiting -> playing -> waiting loop around a `World`.
///
/// Each start builds a fresh world; a reset throws it away. The best lap time
/// is the only thing carried from one race to the next.
pub struct RaceSession {
    mode: RaceMode,
    settings: RaceSettings,
    script: Vec<RoadElement>,
    stepper: FixedStepper,
    world: Option<World>,
    preview: World,
    best_lap_time: Option<f32>,
    seed: u64,
    builds: u64,
    clock: f32,
}

impl RaceSession {
    /// Builds the preview track straight away, so a bad script fails here.
    pub fn new(
        settings: RaceSettings,
        script: Vec<RoadElement>,
        best_lap_time: Option<f32>,
        seed: u64,
    ) -> Result<Self, TrackError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let preview = World::new(&script, &settings, best_lap_time, &mut rng)?;
        Ok(Self {
            mode: RaceMode::Loading,
            settings,
            script,
            stepper: FixedStepper::default(),
            world: None,
            preview,
            best_lap_time,
            seed,
            builds: 1,
            clock: 0.0,
        })
    }

    pub fn mode(&self) -> RaceMode {
        self.mode
    }

    pub fn best_lap_time(&self) -> Option<f32> {
        self.best_lap_time
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    fn build_world(&mut self) -> Result<World, TrackError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.builds));
        self.builds += 1;
        World::new(&self.script, &self.settings, self.best_lap_time, &mut rng)
    }

    /// Both raster sheets are in; leave the loading placeholder.
    pub fn assets_ready(&mut self) -> bool {
        if self.mode != RaceMode::Loading {
            return false;
        }
        self.mode = RaceMode::Waiting;
        info!("Assets ready, waiting for start");
        true
    }

    /// Start trigger. Only honoured while waiting.
    pub fn start(&mut self) -> Result<bool, TrackError> {
        if self.mode != RaceMode::Waiting {
            return Ok(false);
        }
        self.world = Some(self.build_world()?);
        self.stepper.reset();
        self.mode = RaceMode::Playing;
        info!("Race started");
        Ok(true)
    }

    /// Manual reset: drop the running world and go back to waiting.
    pub fn reset(&mut self) -> Result<bool, TrackError> {
        if self.mode != RaceMode::Playing {
            return Ok(false);
        }
        self.preview = self.build_world()?;
        self.world = None;
        self.mode = RaceMode::Waiting;
        info!("Race reset");
        Ok(true)
    }

    /// One display frame: bank the delta and run however many fixed steps are due.
    pub fn frame(&mut self, frame_delta: f32, input: &DriveInput) -> FrameReport {
        let mut report = FrameReport::default();
        if frame_delta.is_finite() {
            self.clock += frame_delta.clamp(0.0, MAX_FRAME_DELTA);
        }
        if self.mode != RaceMode::Playing {
            return report;
        }
        let Some(world) = self.world.as_mut() else {
            return report;
        };

        let dt = self.stepper.step();
        report.steps = self.stepper.advance(frame_delta);
        for _ in 0..report.steps {
            let outcome = step(world, input, dt);
            if let Some(lap) = outcome.completed_lap {
                if lap.new_best {
                    self.best_lap_time = Some(lap.time);
                }
                info!("Lap complete in {:.2}s (new best: {})", lap.time, lap.new_best);
                report.completed_laps.push(lap);
            }
        }
        report
    }

    pub fn scene(&self) -> Scene<'_> {
        match (self.mode, self.world.as_ref()) {
            (RaceMode::Loading, _) => Scene::Loading { time: self.clock },
            (RaceMode::Playing, Some(world)) => Scene::Racing { world },
            _ => Scene::Idle {
                world: &self.preview,
                time: self.clock,
            },
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let mut hud = HudSnapshot {
            mode: self.mode,
            best_lap_time: self.best_lap_time,
            ..Default::default()
        };
        if let Some(world) = &self.world {
            hud.speed = world.player.speed;
            hud.current_lap_time = world.lap_timer.current_lap_time;
            hud.last_lap_time = world.lap_timer.last_lap_time;
        }
        hud
    }
}
