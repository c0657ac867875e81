//! Turns a requested high-level action into a physical intent for the
//! movement engine. Nothing here grants reward; see `reward` for scoring.

use crate::constants::{ACTION_SLOTS, HEADING_DEAD_BAND_DEG, NEAREST_SEARCH_RADIUS};
use crate::error::ScriptError;
use crate::geometry::{heading_delta_deg, Vec3};
use crate::reward::RewardEvent;
use crate::world::{AgentPose, ArenaSnapshot, Ball, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    #[default]
    Idle,
    Forward,
    Backward,
}

/// Rotation about the up axis as seen from above. Clockwise turns right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    #[default]
    Idle,
    Clockwise,
    CounterClockwise,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub drive: Drive,
    pub turn: Turn,
    pub shoot: bool,
    pub seek_target: bool,
    pub seek_base: bool,
}

impl ActionRequest {
    pub const IDLE: Self = Self {
        drive: Drive::Idle,
        turn: Turn::Idle,
        shoot: false,
        seek_target: false,
        seek_base: false,
    };

    /// Decodes `[move, rotate, shoot, seek_target, seek_base]`. Slots are
    /// truncated toward zero; unrecognised values mean "nothing".
    pub fn decode(act: &[f32]) -> Result<Self, ScriptError> {
        if act.len() != ACTION_SLOTS {
            return Err(ScriptError::ActionSlotCount {
                expected: ACTION_SLOTS,
                actual: act.len(),
            });
        }
        let slot = |i: usize| act[i] as i32;
        Ok(Self {
            drive: match slot(0) {
                1 => Drive::Forward,
                2 => Drive::Backward,
                _ => Drive::Idle,
            },
            turn: match slot(1) {
                1 => Turn::Clockwise,
                2 => Turn::CounterClockwise,
                _ => Turn::Idle,
            },
            shoot: slot(2) == 1,
            seek_target: slot(3) == 1,
            seek_base: slot(4) == 1,
        })
    }

    pub fn encode(self) -> [f32; ACTION_SLOTS] {
        let drive = match self.drive {
            Drive::Idle => 0.0,
            Drive::Forward => 1.0,
            Drive::Backward => 2.0,
        };
        let turn = match self.turn {
            Turn::Idle => 0.0,
            Turn::Clockwise => 1.0,
            Turn::CounterClockwise => 2.0,
        };
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        [
            drive,
            turn,
            flag(self.shoot),
            flag(self.seek_target),
            flag(self.seek_base),
        ]
    }

    /// Scored requests in the order they are applied.
    pub fn reward_events(self) -> impl Iterator<Item = RewardEvent> {
        [
            (self.shoot, RewardEvent::Shoot),
            (self.seek_target, RewardEvent::SeekTarget),
            (self.seek_base, RewardEvent::SeekBase),
        ]
        .into_iter()
        .filter_map(|(requested, event)| requested.then_some(event))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum SeekGoal {
    Ball(u32),
    Base,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Intent {
    pub drive: Drive,
    pub turn: Turn,
    pub laser: bool,
    pub goal: Option<SeekGoal>,
}

impl Intent {
    pub fn direction(&self, pose: &AgentPose) -> Vec3 {
        match self.drive {
            Drive::Idle => Vec3::ZERO,
            Drive::Forward => pose.forward,
            Drive::Backward => -pose.forward,
        }
    }

    pub fn rotation(&self) -> Vec3 {
        match self.turn {
            Turn::Idle => Vec3::ZERO,
            Turn::Clockwise => Vec3::UP,
            Turn::CounterClockwise => -Vec3::UP,
        }
    }

    fn steer(&mut self, steer: Steer) {
        match steer {
            Steer::Turn(turn) => self.turn = turn,
            Steer::Drive => self.drive = Drive::Forward,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    Turn(Turn),
    Drive,
}

/// Turn toward the target until it is inside the dead-band, then drive.
/// Both band edges count as aligned.
pub fn turn_and_go(heading_deg: f32) -> Steer {
    if heading_deg < -HEADING_DEAD_BAND_DEG {
        Steer::Turn(Turn::Clockwise)
    } else if heading_deg > HEADING_DEAD_BAND_DEG {
        Steer::Turn(Turn::CounterClockwise)
    } else {
        Steer::Drive
    }
}

/// Closest claimable ball inside the search radius. Ties keep the earliest
/// ball in registry order.
pub fn nearest_ball<'a>(pose: &AgentPose, balls: &'a [Ball], team: TeamId) -> Option<&'a Ball> {
    let mut best = None;
    let mut best_distance = NEAREST_SEARCH_RADIUS;
    for ball in balls {
        let distance = ball.position.distance(pose.position);
        if distance < best_distance && ball.is_claimable_by(team) {
            best_distance = distance;
            best = Some(ball);
        }
    }
    best
}

pub fn select_intent(request: ActionRequest, world: &ArenaSnapshot, team: TeamId) -> Intent {
    let pose = &world.pose;
    let mut intent = Intent {
        drive: request.drive,
        turn: request.turn,
        laser: request.shoot,
        goal: None,
    };

    if request.seek_target {
        if let Some(ball) = nearest_ball(pose, &world.balls, team) {
            intent.steer(turn_and_go(heading_delta_deg(
                pose.position,
                pose.forward,
                ball.position,
            )));
            intent.goal = Some(SeekGoal::Ball(ball.id));
        }
    }

    if request.seek_base {
        intent.steer(turn_and_go(heading_delta_deg(
            pose.position,
            pose.forward,
            world.base_position,
        )));
        intent.goal = Some(SeekGoal::Base);
    }

    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: TeamId = TeamId(0);

    fn ball_at(id: u32, x: f32, z: f32) -> Ball {
        Ball {
            id,
            position: Vec3::new(x, 0.0, z),
            carried: false,
            bank_owner: None,
        }
    }

    fn world(balls: Vec<Ball>, base: Vec3) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: 0,
            pose: AgentPose::default(),
            base_position: base,
            balls,
            frozen: false,
            time_remaining: 60.0,
        }
    }

    #[test]
    fn dead_band_edges_drive_forward() {
        assert_eq!(turn_and_go(5.0), Steer::Drive);
        assert_eq!(turn_and_go(-5.0), Steer::Drive);
        assert_eq!(turn_and_go(0.0), Steer::Drive);
        assert_eq!(turn_and_go(5.01), Steer::Turn(Turn::CounterClockwise));
        assert_eq!(turn_and_go(-5.01), Steer::Turn(Turn::Clockwise));
    }

    #[test]
    fn decode_truncates_and_ignores_unknown_values() {
        let request = ActionRequest::decode(&[1.9, 2.0, 1.0, 0.0, 7.0]).unwrap();
        assert_eq!(request.drive, Drive::Forward);
        assert_eq!(request.turn, Turn::CounterClockwise);
        assert!(request.shoot);
        assert!(!request.seek_target);
        assert!(!request.seek_base);

        let idle = ActionRequest::decode(&[3.0, -1.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(idle, ActionRequest::IDLE);
    }

    #[test]
    fn decode_rejects_wrong_slot_count() {
        assert_eq!(
            ActionRequest::decode(&[0.0; 4]),
            Err(ScriptError::ActionSlotCount {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn encode_decode_agree_for_mixed_request() {
        let request = ActionRequest {
            drive: Drive::Backward,
            turn: Turn::Clockwise,
            shoot: false,
            seek_target: true,
            seek_base: true,
        };
        assert_eq!(ActionRequest::decode(&request.encode()).unwrap(), request);
    }

    #[test]
    fn nearest_ball_skips_claimed_and_distant_balls() {
        let mut carried = ball_at(0, 0.0, 1.0);
        carried.carried = true;
        let mut home = ball_at(1, 0.0, 2.0);
        home.bank_owner = Some(BLUE);
        let far = ball_at(2, 0.0, 250.0);
        let free = ball_at(3, 0.0, 30.0);
        let balls = vec![carried, home, far, free];
        let found = nearest_ball(&AgentPose::default(), &balls, BLUE).map(|b| b.id);
        assert_eq!(found, Some(3));
    }

    #[test]
    fn nearest_ball_ties_keep_scan_order() {
        let balls = vec![ball_at(7, 10.0, 0.0), ball_at(8, -10.0, 0.0)];
        let found = nearest_ball(&AgentPose::default(), &balls, BLUE).map(|b| b.id);
        assert_eq!(found, Some(7));
    }

    #[test]
    fn seek_target_without_candidates_keeps_manual_axes() {
        let request = ActionRequest {
            seek_target: true,
            turn: Turn::Clockwise,
            ..ActionRequest::IDLE
        };
        let intent = select_intent(request, &world(vec![], Vec3::new(0.0, 0.0, -50.0)), BLUE);
        assert_eq!(intent.drive, Drive::Idle);
        assert_eq!(intent.turn, Turn::Clockwise);
        assert_eq!(intent.goal, None);
    }

    #[test]
    fn seek_target_turns_toward_ball_on_the_right() {
        let request = ActionRequest {
            seek_target: true,
            ..ActionRequest::IDLE
        };
        let intent = select_intent(request, &world(vec![ball_at(4, 20.0, 0.0)], Vec3::ZERO), BLUE);
        assert_eq!(intent.turn, Turn::Clockwise);
        assert_eq!(intent.drive, Drive::Idle);
        assert_eq!(intent.goal, Some(SeekGoal::Ball(4)));
    }

    #[test]
    fn seek_target_turns_toward_ball_on_the_left() {
        let request = ActionRequest {
            seek_target: true,
            ..ActionRequest::IDLE
        };
        let intent = select_intent(request, &world(vec![ball_at(2, -20.0, 0.0)], Vec3::ZERO), BLUE);
        assert_eq!(intent.turn, Turn::CounterClockwise);
        assert_eq!(intent.drive, Drive::Idle);
    }

    #[test]
    fn seek_turn_keeps_manual_drive() {
        let request = ActionRequest {
            drive: Drive::Backward,
            seek_target: true,
            ..ActionRequest::IDLE
        };
        let intent = select_intent(request, &world(vec![ball_at(1, 20.0, 0.0)], Vec3::ZERO), BLUE);
        assert_eq!(intent.drive, Drive::Backward);
        assert_eq!(intent.turn, Turn::Clockwise);
        assert_eq!(intent.direction(&AgentPose::default()), -Vec3::FORWARD);
    }

    #[test]
    fn seek_base_composes_with_seek_target_turn() {
        // Ball on the right sets the turn; the base dead ahead sets the drive.
        let request = ActionRequest {
            seek_target: true,
            seek_base: true,
            ..ActionRequest::IDLE
        };
        let world = world(vec![ball_at(5, 20.0, 0.0)], Vec3::new(0.0, 0.0, 40.0));
        let intent = select_intent(request, &world, BLUE);
        assert_eq!(intent.turn, Turn::Clockwise);
        assert_eq!(intent.drive, Drive::Forward);
        assert_eq!(intent.goal, Some(SeekGoal::Base));
    }

    #[test]
    fn rotation_maps_clockwise_to_up_axis() {
        let rotation = |turn| Intent { turn, ..Intent::default() }.rotation();
        assert_eq!(rotation(Turn::Clockwise), Vec3::UP);
        assert_eq!(rotation(Turn::CounterClockwise), -Vec3::UP);
        assert_eq!(rotation(Turn::Idle), Vec3::ZERO);
    }

    #[test]
    fn seek_base_drives_when_aligned() {
        let request = ActionRequest {
            seek_base: true,
            shoot: true,
            ..ActionRequest::IDLE
        };
        let intent = select_intent(request, &world(vec![], Vec3::new(1.0, 0.0, 40.0)), BLUE);
        assert_eq!(intent.drive, Drive::Forward);
        assert_eq!(intent.turn, Turn::Idle);
        assert!(intent.laser);
        assert_eq!(intent.goal, Some(SeekGoal::Base));
        assert_eq!(intent.direction(&AgentPose::default()), Vec3::FORWARD);
    }

    #[test]
    fn reward_events_follow_application_order() {
        let request = ActionRequest {
            shoot: true,
            seek_target: true,
            seek_base: true,
            ..ActionRequest::IDLE
        };
        let events: Vec<_> = request.reward_events().collect();
        assert_eq!(
            events,
            vec![
                RewardEvent::Shoot,
                RewardEvent::SeekTarget,
                RewardEvent::SeekBase
            ]
        );
    }
}
