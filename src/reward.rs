//! Reward shaping for the forage / bank / guard strategy.
//!
//! Every rule here is a pure function of the current counts and one event.
//! Counts outside the expected range fall through to the penalty rows.

use crate::constants::{has_majority, CARRY_CAP, MAJORITY_THRESHOLD};
use crate::counter::{AgentState, PickupOutcome};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEvent {
    FreezeOnset,
    Pickup(PickupOutcome),
    WallHit,
    BaseArrival,
    Shoot,
    SeekTarget,
    SeekBase,
}

/// Whether the delta accumulates into the step reward or replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    Add,
    Set,
}

/// What to do with carried balls when the agent reaches home.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    Keep,
    Bank,
    Discard,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RewardOutcome {
    pub event: RewardEvent,
    pub delta: f64,
    pub mode: RewardMode,
    pub terminal: bool,
    pub settlement: Settlement,
    pub reason: &'static str,
    /// Counts the rule was evaluated against.
    pub scored_at: AgentState,
}

impl RewardOutcome {
    fn add(event: RewardEvent, delta: f64, reason: &'static str) -> Self {
        Self {
            event,
            delta,
            mode: RewardMode::Add,
            terminal: false,
            settlement: Settlement::Keep,
            reason,
            scored_at: AgentState::default(),
        }
    }

    fn terminal(delta: f64, settlement: Settlement, reason: &'static str) -> Self {
        Self {
            event: RewardEvent::BaseArrival,
            delta,
            mode: RewardMode::Set,
            terminal: true,
            settlement,
            reason,
            scored_at: AgentState::default(),
        }
    }

    pub fn none(event: RewardEvent, reason: &'static str) -> Self {
        Self::add(event, 0.0, reason)
    }
}

/// Reward magnitudes. Each field is the positive value of a rule; the
/// penalty side of a rule uses the negated value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    pub freeze_penalty: f64,
    pub pickup: f64,
    pub wall_penalty: f64,
    pub base_arrival: f64,
    pub shoot: f64,
    pub seek_target: f64,
    pub seek_base: f64,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            freeze_penalty: 0.3,
            pickup: 0.5,
            wall_penalty: 0.7,
            base_arrival: 1.0,
            shoot: 0.5,
            seek_target: 0.2,
            seek_base: 0.2,
        }
    }
}

impl RewardTable {
    pub fn evaluate(&self, state: AgentState, event: RewardEvent) -> RewardOutcome {
        let AgentState { carried, banked } = state;
        let outcome = match event {
            RewardEvent::FreezeOnset => RewardOutcome::add(event, -self.freeze_penalty, "frozen"),
            RewardEvent::Pickup(outcome) if !outcome.collected() => {
                RewardOutcome::none(event, "pickup_ineligible")
            }
            RewardEvent::Pickup(_) => {
                // `carried` already includes the ball just collected.
                if carried <= CARRY_CAP && !has_majority(banked) {
                    RewardOutcome::add(event, self.pickup, "pickup_useful")
                } else {
                    RewardOutcome::add(event, -self.pickup, "pickup_greedy")
                }
            }
            RewardEvent::WallHit => RewardOutcome::add(event, -self.wall_penalty, "wall"),
            RewardEvent::BaseArrival => self.base_arrival(carried, banked),
            RewardEvent::Shoot => {
                if has_majority(banked) {
                    RewardOutcome::add(event, self.shoot, "guard_shot")
                } else {
                    RewardOutcome::add(event, -self.shoot, "premature_shot")
                }
            }
            RewardEvent::SeekTarget => {
                if should_forage(carried, banked) {
                    RewardOutcome::add(event, self.seek_target, "forage")
                } else {
                    RewardOutcome::add(event, -self.seek_target, "needless_forage")
                }
            }
            RewardEvent::SeekBase => {
                if should_return(carried, banked) {
                    RewardOutcome::add(event, self.seek_base, "return")
                } else {
                    RewardOutcome::add(event, -self.seek_base, "needless_return")
                }
            }
        };
        RewardOutcome {
            scored_at: state,
            ..outcome
        }
    }

    fn base_arrival(&self, carried: u32, banked: u32) -> RewardOutcome {
        if has_majority(banked) {
            if carried == 0 {
                RewardOutcome::terminal(self.base_arrival, Settlement::Keep, "guard_home")
            } else {
                RewardOutcome::terminal(-self.base_arrival, Settlement::Bank, "overcollected")
            }
        } else if carried == CARRY_CAP || tops_off_majority(carried, banked) {
            RewardOutcome::terminal(self.base_arrival, Settlement::Bank, "delivered")
        } else {
            RewardOutcome::terminal(-self.base_arrival, Settlement::Discard, "wasted_trip")
        }
    }
}

/// One more ball reaches the majority.
fn tops_off_majority(carried: u32, banked: u32) -> bool {
    carried == 1 && banked == MAJORITY_THRESHOLD
}

/// Foraging is correct while short of both the carry cap and the majority,
/// or empty-handed one ball away from it.
pub fn should_forage(carried: u32, banked: u32) -> bool {
    (carried < CARRY_CAP && banked < MAJORITY_THRESHOLD)
        || (carried == 0 && banked == MAJORITY_THRESHOLD)
}

/// Heading home is correct with a full load before the majority, or with the
/// single ball that completes it.
pub fn should_return(carried: u32, banked: u32) -> bool {
    (carried == CARRY_CAP && !has_majority(banked)) || tops_off_majority(carried, banked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(carried: u32, banked: u32, event: RewardEvent) -> RewardOutcome {
        RewardTable::default().evaluate(AgentState { carried, banked }, event)
    }

    const COLLECTED: RewardEvent = RewardEvent::Pickup(PickupOutcome::Collected);

    #[test]
    fn freeze_and_wall_are_flat_penalties() {
        for (carried, banked) in [(0, 0), (2, 3), (5, 9)] {
            let frozen = eval(carried, banked, RewardEvent::FreezeOnset);
            assert_eq!(frozen.delta, -0.3);
            assert!(!frozen.terminal);
            assert_eq!(eval(carried, banked, RewardEvent::WallHit).delta, -0.7);
        }
    }

    #[test]
    fn pickup_rewards_up_to_the_carry_cap() {
        assert_eq!(eval(1, 0, COLLECTED).delta, 0.5);
        assert_eq!(eval(2, 4, COLLECTED).delta, 0.5);
        assert_eq!(eval(3, 0, COLLECTED).delta, -0.5);
        assert_eq!(eval(1, 5, COLLECTED).delta, -0.5);
    }

    #[test]
    fn ineligible_pickup_is_neutral() {
        for outcome in [
            PickupOutcome::AlreadyCarried,
            PickupOutcome::AlreadyBanked,
            PickupOutcome::Frozen,
        ] {
            let result = eval(0, 0, RewardEvent::Pickup(outcome));
            assert_eq!(result.delta, 0.0);
            assert!(!result.terminal);
        }
    }

    #[test]
    fn base_arrival_with_majority() {
        let empty = eval(0, 5, RewardEvent::BaseArrival);
        assert_eq!(empty.delta, 1.0);
        assert_eq!(empty.settlement, Settlement::Keep);
        assert!(empty.terminal);
        assert_eq!(empty.mode, RewardMode::Set);

        for carried in 1..4 {
            let loaded = eval(carried, 6, RewardEvent::BaseArrival);
            assert_eq!(loaded.delta, -1.0);
            assert_eq!(loaded.settlement, Settlement::Bank);
            assert!(loaded.terminal);
        }
    }

    #[test]
    fn base_arrival_without_majority() {
        for banked in 0..=4 {
            let full = eval(2, banked, RewardEvent::BaseArrival);
            assert_eq!(full.delta, 1.0);
            assert_eq!(full.settlement, Settlement::Bank);

            let empty = eval(0, banked, RewardEvent::BaseArrival);
            assert_eq!(empty.delta, -1.0);
            assert_eq!(empty.settlement, Settlement::Discard);

            let greedy = eval(3, banked, RewardEvent::BaseArrival);
            assert_eq!(greedy.delta, -1.0);
            assert_eq!(greedy.settlement, Settlement::Discard);
        }

        let topping_off = eval(1, 4, RewardEvent::BaseArrival);
        assert_eq!(topping_off.delta, 1.0);
        assert_eq!(topping_off.settlement, Settlement::Bank);

        let half_load = eval(1, 3, RewardEvent::BaseArrival);
        assert_eq!(half_load.delta, -1.0);
        assert_eq!(half_load.settlement, Settlement::Discard);
    }

    #[test]
    fn shooting_depends_on_banked_only() {
        for carried in 0..4 {
            assert_eq!(eval(carried, 5, RewardEvent::Shoot).delta, 0.5);
            assert_eq!(eval(carried, 4, RewardEvent::Shoot).delta, -0.5);
        }
    }

    #[test]
    fn seek_target_rows() {
        assert_eq!(eval(0, 0, RewardEvent::SeekTarget).delta, 0.2);
        assert_eq!(eval(1, 3, RewardEvent::SeekTarget).delta, 0.2);
        assert_eq!(eval(0, 4, RewardEvent::SeekTarget).delta, 0.2);
        assert_eq!(eval(1, 4, RewardEvent::SeekTarget).delta, -0.2);
        assert_eq!(eval(2, 0, RewardEvent::SeekTarget).delta, -0.2);
        assert_eq!(eval(0, 5, RewardEvent::SeekTarget).delta, -0.2);
    }

    #[test]
    fn seek_base_rows() {
        assert_eq!(eval(2, 0, RewardEvent::SeekBase).delta, 0.2);
        assert_eq!(eval(2, 4, RewardEvent::SeekBase).delta, 0.2);
        assert_eq!(eval(1, 4, RewardEvent::SeekBase).delta, 0.2);
        assert_eq!(eval(0, 0, RewardEvent::SeekBase).delta, -0.2);
        assert_eq!(eval(2, 5, RewardEvent::SeekBase).delta, -0.2);
        assert_eq!(eval(3, 1, RewardEvent::SeekBase).delta, -0.2);
    }

    #[test]
    fn outcome_records_the_counts_it_was_scored_against() {
        let state = AgentState { carried: 2, banked: 3 };
        let outcome = RewardTable::default().evaluate(state, RewardEvent::BaseArrival);
        assert_eq!(outcome.scored_at, state);
        assert_eq!(outcome.reason, "delivered");
    }

    #[test]
    fn partial_table_falls_back_to_defaults() {
        let table: RewardTable = serde_json::from_str(r#"{"wall_penalty": 2.0}"#).unwrap();
        assert_eq!(table.wall_penalty, 2.0);
        assert_eq!(table.pickup, 0.5);
        assert_eq!(
            table.evaluate(AgentState::default(), RewardEvent::WallHit).delta,
            -2.0
        );
    }
}
