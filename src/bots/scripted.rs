//! Single-habit baselines.

use super::Policy;
use crate::counter::AgentState;
use crate::intent::{ActionRequest, Drive, Turn};
use crate::rng::SeededRng;
use crate::world::ArenaSnapshot;

pub const FORAGER_ID: &str = "forager";
pub const FORAGER_DESCRIPTION: &str = "Chases the nearest free ball every tick.";
pub const GUARDIAN_ID: &str = "guardian";
pub const GUARDIAN_DESCRIPTION: &str = "Holds position and fires the laser every tick.";
pub const IDLE_ID: &str = "idle";
pub const IDLE_DESCRIPTION: &str = "Requests nothing.";
pub const RANDOM_ID: &str = "random";
pub const RANDOM_DESCRIPTION: &str = "Uniformly random action slots from a seeded stream.";

pub struct ForagerBot;

impl Policy for ForagerBot {
    fn id(&self) -> &'static str {
        FORAGER_ID
    }
    fn description(&self) -> &'static str {
        FORAGER_DESCRIPTION
    }
    fn reset(&mut self, _seed: u32) {}
    fn next_action(&mut self, _world: &ArenaSnapshot, _state: AgentState) -> ActionRequest {
        ActionRequest {
            seek_target: true,
            ..ActionRequest::IDLE
        }
    }
}

pub struct GuardianBot;

impl Policy for GuardianBot {
    fn id(&self) -> &'static str {
        GUARDIAN_ID
    }
    fn description(&self) -> &'static str {
        GUARDIAN_DESCRIPTION
    }
    fn reset(&mut self, _seed: u32) {}
    fn next_action(&mut self, _world: &ArenaSnapshot, _state: AgentState) -> ActionRequest {
        ActionRequest {
            shoot: true,
            ..ActionRequest::IDLE
        }
    }
}

pub struct IdleBot;

impl Policy for IdleBot {
    fn id(&self) -> &'static str {
        IDLE_ID
    }
    fn description(&self) -> &'static str {
        IDLE_DESCRIPTION
    }
    fn reset(&mut self, _seed: u32) {}
    fn next_action(&mut self, _world: &ArenaSnapshot, _state: AgentState) -> ActionRequest {
        ActionRequest::IDLE
    }
}

pub struct RandomBot {
    rng: SeededRng,
}

impl RandomBot {
    pub fn new() -> Self {
        Self {
            rng: SeededRng::new(0),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomBot {
    fn id(&self) -> &'static str {
        RANDOM_ID
    }
    fn description(&self) -> &'static str {
        RANDOM_DESCRIPTION
    }
    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ 0x5EED_0B07);
    }
    fn next_action(&mut self, _world: &ArenaSnapshot, _state: AgentState) -> ActionRequest {
        let drive = match self.rng.next_int(3) {
            1 => Drive::Forward,
            2 => Drive::Backward,
            _ => Drive::Idle,
        };
        let turn = match self.rng.next_int(3) {
            1 => Turn::Clockwise,
            2 => Turn::CounterClockwise,
            _ => Turn::Idle,
        };
        ActionRequest {
            drive,
            turn,
            shoot: self.rng.chance(0.5),
            seek_target: self.rng.chance(0.5),
            seek_base: self.rng.chance(0.5),
        }
    }
}
