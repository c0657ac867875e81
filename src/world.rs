//! Read-only view of the host arena, rebuilt by the host every tick.

use crate::geometry::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub position: Vec3,
    #[serde(default)]
    pub carried: bool,
    #[serde(default)]
    pub bank_owner: Option<TeamId>,
}

impl Ball {
    pub fn is_banked_by(&self, team: TeamId) -> bool {
        self.bank_owner == Some(team)
    }

    /// Free to be collected by `team`: nobody holds it and it is not already home.
    pub fn is_claimable_by(&self, team: TeamId) -> bool {
        !self.carried && !self.is_banked_by(team)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for AgentPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::FORWARD,
        }
    }
}

/// Everything the policy may read from the host during one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: u32,
    #[serde(default)]
    pub pose: AgentPose,
    pub base_position: Vec3,
    #[serde(default)]
    pub balls: Vec<Ball>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub time_remaining: f32,
}

impl ArenaSnapshot {
    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|ball| ball.id == id)
    }
}
