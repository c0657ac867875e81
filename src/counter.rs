//! Carry/bank bookkeeping for one agent over one episode.

use crate::world::{Ball, TeamId};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupOutcome {
    Collected,
    AlreadyCarried,
    AlreadyBanked,
    Frozen,
}

impl PickupOutcome {
    pub fn collected(self) -> bool {
        matches!(self, Self::Collected)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AgentState {
    pub carried: u32,
    pub banked: u32,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Counts the ball if it is free, not already home, and the agent can move.
    /// No upper bound is enforced here; over-capacity is priced by the reward table.
    pub fn on_pickup(&mut self, ball: &Ball, team: TeamId, frozen: bool) -> PickupOutcome {
        if frozen {
            return PickupOutcome::Frozen;
        }
        if ball.carried {
            return PickupOutcome::AlreadyCarried;
        }
        if ball.is_banked_by(team) {
            return PickupOutcome::AlreadyBanked;
        }
        self.carried += 1;
        PickupOutcome::Collected
    }

    /// Frozen agents drop everything. Safe to call on every frozen tick.
    pub fn on_freeze(&mut self) {
        self.carried = 0;
    }

    /// Full rescan of the registry; other agents may have emptied our base.
    pub fn recompute_banked(&mut self, balls: &[Ball], team: TeamId) {
        self.banked = balls.iter().filter(|ball| ball.is_banked_by(team)).count() as u32;
    }

    /// Moves every carried ball into the bank count.
    pub fn bank_carried(&mut self) {
        self.banked += self.carried;
        self.carried = 0;
    }

    /// Drops carried balls without crediting them.
    pub fn discard_carried(&mut self) {
        self.carried = 0;
    }
}
