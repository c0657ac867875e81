//! Per-tick orchestration of the counters, reward table and intent selector.
//!
//! Host call order within one tick: `begin_tick`, then `act`, then any
//! `on_contact` calls. Once a terminal reward fires the agent ignores input
//! until `begin_episode`.

use crate::counter::AgentState;
use crate::host::ArenaHost;
use crate::intent::{select_intent, ActionRequest, Intent};
use crate::reward::{RewardEvent, RewardOutcome, RewardTable, Settlement};
use crate::world::{ArenaSnapshot, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Contact {
    Ball { id: u32 },
    Wall,
    Base { team: TeamId },
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ActionOutcome {
    pub intent: Intent,
    pub rewards: Vec<RewardOutcome>,
}

#[derive(Clone, Debug)]
pub struct ForagerAgent {
    team: TeamId,
    table: RewardTable,
    state: AgentState,
    was_frozen: bool,
    episode_over: bool,
}

impl ForagerAgent {
    pub fn new(team: TeamId, table: RewardTable) -> Self {
        Self {
            team,
            table,
            state: AgentState::new(),
            was_frozen: false,
            episode_over: false,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_episode_over(&self) -> bool {
        self.episode_over
    }

    pub fn begin_episode(&mut self) {
        self.state.reset();
        self.was_frozen = false;
        self.episode_over = false;
    }

    /// Freeze handling and the banked rescan. Must run before `act` and
    /// `on_contact` so they see this tick's counts.
    pub fn begin_tick(
        &mut self,
        world: &ArenaSnapshot,
        host: &mut dyn ArenaHost,
    ) -> Option<RewardOutcome> {
        if self.episode_over {
            return None;
        }

        let onset = world.frozen && !self.was_frozen;
        self.was_frozen = world.frozen;
        if world.frozen {
            self.state.on_freeze();
        }
        self.state.recompute_banked(&world.balls, self.team);

        onset.then(|| self.emit(RewardEvent::FreezeOnset, host))
    }

    /// Scores the request, then hands the resulting intent to the host. The
    /// request is always carried out; scoring never gates it.
    pub fn act(
        &mut self,
        request: ActionRequest,
        world: &ArenaSnapshot,
        host: &mut dyn ArenaHost,
    ) -> ActionOutcome {
        if self.episode_over {
            return ActionOutcome::default();
        }

        let mut rewards = Vec::new();
        for event in request.reward_events() {
            rewards.push(self.emit(event, host));
        }

        let intent = select_intent(request, world, self.team);
        host.set_laser(intent.laser);
        host.move_agent(intent.direction(&world.pose), intent.rotation());

        ActionOutcome { intent, rewards }
    }

    pub fn on_contact(
        &mut self,
        contact: Contact,
        world: &ArenaSnapshot,
        host: &mut dyn ArenaHost,
    ) -> Option<RewardOutcome> {
        if self.episode_over {
            return None;
        }

        match contact {
            Contact::Ball { id } => {
                let Some(ball) = world.ball(id) else {
                    tracing::warn!(tick = world.tick, ball = id, "contact with unknown ball");
                    return None;
                };
                // Ineligible pickups are scored too and come back as zero-delta outcomes.
                let pickup = self.state.on_pickup(ball, self.team, world.frozen);
                Some(self.emit(RewardEvent::Pickup(pickup), host))
            }
            Contact::Wall => Some(self.emit(RewardEvent::WallHit, host)),
            Contact::Base { team } if team == self.team => {
                Some(self.emit(RewardEvent::BaseArrival, host))
            }
            Contact::Base { .. } => None,
        }
    }

    fn emit(&mut self, event: RewardEvent, host: &mut dyn ArenaHost) -> RewardOutcome {
        let outcome = self.table.evaluate(self.state, event);
        match outcome.settlement {
            Settlement::Keep => {}
            Settlement::Bank => self.state.bank_carried(),
            Settlement::Discard => self.state.discard_carried(),
        }
        host.apply(&outcome);

        tracing::debug!(
            reason = outcome.reason,
            delta = outcome.delta,
            carried = self.state.carried,
            banked = self.state.banked,
            "reward"
        );

        if outcome.terminal {
            self.episode_over = true;
            tracing::info!(
                team = %self.team,
                reason = outcome.reason,
                banked = self.state.banked,
                "episode ended"
            );
        }
        outcome
    }
}
