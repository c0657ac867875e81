//! Seams to the host simulation. The policy drives these; it never reads
//! anything back from them.

use crate::geometry::Vec3;
use crate::reward::{RewardMode, RewardOutcome};

pub trait MovementEngine {
    fn move_agent(&mut self, direction: Vec3, rotation: Vec3);
}

pub trait ShootingMechanism {
    fn set_laser(&mut self, active: bool);
}

pub trait EpisodeController {
    fn add_reward(&mut self, delta: f64);
    fn set_reward(&mut self, value: f64);
    fn end_episode(&mut self);

    fn apply(&mut self, outcome: &RewardOutcome) {
        match outcome.mode {
            RewardMode::Add => self.add_reward(outcome.delta),
            RewardMode::Set => self.set_reward(outcome.delta),
        }
        if outcome.terminal {
            self.end_episode();
        }
    }
}

/// Everything the agent drives in one place.
pub trait ArenaHost: MovementEngine + ShootingMechanism + EpisodeController {}

impl<T: MovementEngine + ShootingMechanism + EpisodeController> ArenaHost for T {}

/// Host stand-in that records what the policy asked for. Step rewards follow
/// add/set semantics; `episode_reward` sums closed steps.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    pub direction: Vec3,
    pub rotation: Vec3,
    pub laser: bool,
    pub laser_ticks: u32,
    pub step_reward: f64,
    pub episode_reward: f64,
    pub episode_ended: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the current step reward into the episode total.
    pub fn close_step(&mut self) -> f64 {
        let step = self.step_reward;
        self.episode_reward += step;
        self.step_reward = 0.0;
        step
    }
}

impl MovementEngine for RecordingHost {
    fn move_agent(&mut self, direction: Vec3, rotation: Vec3) {
        self.direction = direction;
        self.rotation = rotation;
    }
}

impl ShootingMechanism for RecordingHost {
    fn set_laser(&mut self, active: bool) {
        self.laser = active;
        if active {
            self.laser_ticks += 1;
        }
    }
}

impl EpisodeController for RecordingHost {
    fn add_reward(&mut self, delta: f64) {
        self.step_reward += delta;
    }

    fn set_reward(&mut self, value: f64) {
        self.step_reward = value;
    }

    fn end_episode(&mut self) {
        self.episode_ended = true;
    }
}
