//! Recorded episodes: the host-side world per tick, the contacts the physics
//! layer reported, and optionally the action the model chose.

use crate::agent::Contact;
use crate::constants::ACTION_SLOTS;
use crate::error::ScriptError;
use crate::geometry::Vec3;
use crate::rng::SeededRng;
use crate::world::{AgentPose, ArenaSnapshot, Ball, TeamId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptTick {
    #[serde(flatten)]
    pub world: ArenaSnapshot,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Raw action vector; absent means "ask the policy".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Vec<f32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpisodeScript {
    pub team: TeamId,
    #[serde(default)]
    pub seed: u32,
    pub ticks: Vec<ScriptTick>,
}

impl EpisodeScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw =
            fs::read(path).with_context(|| format!("failed reading script {}", path.display()))?;
        let script: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("failed parsing script {}", path.display()))?;
        script
            .validate()
            .with_context(|| format!("invalid script {}", path.display()))?;
        Ok(script)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
        let encoded = serde_json::to_vec_pretty(self)?;
        fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.ticks.is_empty() {
            return Err(ScriptError::EmptyScript);
        }

        let mut previous: Option<u32> = None;
        for (index, tick) in self.ticks.iter().enumerate() {
            let world = &tick.world;
            if let Some(previous) = previous {
                if world.tick <= previous {
                    return Err(ScriptError::TickOutOfOrder {
                        index,
                        tick: world.tick,
                        previous,
                    });
                }
            }
            previous = Some(world.tick);

            let finite = world.pose.position.is_finite()
                && world.pose.forward.is_finite()
                && world.base_position.is_finite()
                && world.balls.iter().all(|ball| ball.position.is_finite());
            if !finite {
                return Err(ScriptError::NonFiniteCoordinate { tick: world.tick });
            }

            let mut ids = BTreeSet::new();
            for ball in &world.balls {
                if !ids.insert(ball.id) {
                    return Err(ScriptError::DuplicateBallId {
                        tick: world.tick,
                        id: ball.id,
                    });
                }
            }

            for contact in &tick.contacts {
                if let Contact::Ball { id } = contact {
                    if !ids.contains(id) {
                        return Err(ScriptError::UnknownBall {
                            tick: world.tick,
                            id: *id,
                        });
                    }
                }
            }

            if let Some(action) = &tick.action {
                if action.len() != ACTION_SLOTS {
                    return Err(ScriptError::ActionSlotCount {
                        expected: ACTION_SLOTS,
                        actual: action.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ── Synthetic episodes ──────────────────────────────────────────────

const ARENA_HALF_EXTENT: f32 = 60.0;
const BALL_COUNT: u32 = 10;
const HOME_TEAM: TeamId = TeamId(0);
const AWAY_TEAM: TeamId = TeamId(1);
const TICK_SECONDS: f32 = 0.02;
const FREEZE_TICKS: u32 = 25;

// Per-tick event probabilities.
const P_WALL: f32 = 0.01;
const P_PICKUP: f32 = 0.03;
const P_FREEZE: f32 = 0.004;
const P_STEAL: f32 = 0.003;
const P_AWAY_BANK: f32 = 0.004;
const P_ARRIVE: f32 = 0.05;

/// Builds a plausible episode for the home team. The world evolves without
/// regard to actions, so every policy sees the same contacts.
pub fn generate_episode(seed: u32, max_ticks: u32) -> EpisodeScript {
    let mut rng = SeededRng::new(seed);
    let home_base = Vec3::new(0.0, 0.0, -ARENA_HALF_EXTENT + 10.0);
    let away_base = Vec3::new(0.0, 0.0, ARENA_HALF_EXTENT - 10.0);

    let prebanked = rng.next_int(7);
    let mut balls: Vec<Ball> = (0..BALL_COUNT)
        .map(|id| Ball {
            id,
            position: random_point(&mut rng),
            carried: false,
            bank_owner: (id < prebanked).then_some(HOME_TEAM),
        })
        .collect();

    let mut pose = AgentPose {
        position: home_base,
        forward: Vec3::FORWARD,
    };
    let mut heading = 0.0f32;
    let mut held: Vec<u32> = Vec::new();
    let mut frozen_for = 0u32;
    let mut ticks = Vec::new();

    for tick in 0..max_ticks.max(1) {
        heading += rng.next_range_f32(-0.2, 0.2);
        pose.forward = Vec3::new(heading.sin(), 0.0, heading.cos());
        let step = pose.position + pose.forward * 0.8;
        pose.position = Vec3::new(
            step.x.clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
            0.0,
            step.z.clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
        );

        let mut contacts = Vec::new();
        let mut arrived = false;

        if frozen_for > 0 {
            frozen_for -= 1;
        } else if rng.chance(P_FREEZE) {
            frozen_for = FREEZE_TICKS;
            for id in held.drain(..) {
                let ball = &mut balls[id as usize];
                ball.carried = false;
                ball.position = pose.position;
            }
        }
        let frozen = frozen_for > 0;

        if rng.chance(P_WALL) {
            contacts.push(Contact::Wall);
        }

        if !frozen && rng.chance(P_PICKUP) {
            let free: Vec<u32> = balls
                .iter()
                .filter(|ball| ball.is_claimable_by(HOME_TEAM))
                .map(|ball| ball.id)
                .collect();
            if !free.is_empty() {
                let id = free[rng.next_int(free.len() as u32) as usize];
                contacts.push(Contact::Ball { id });
            }
        }

        if rng.chance(P_STEAL) {
            if let Some(ball) = balls.iter_mut().find(|ball| ball.is_banked_by(HOME_TEAM)) {
                ball.bank_owner = Some(AWAY_TEAM);
                ball.position = away_base;
            }
        }
        if rng.chance(P_AWAY_BANK) {
            if let Some(ball) = balls
                .iter_mut()
                .find(|ball| !ball.carried && ball.bank_owner.is_none())
            {
                ball.bank_owner = Some(AWAY_TEAM);
                ball.position = away_base;
            }
        }

        // Going home is only worth scripting once something is on board or
        // the team already leads.
        let leads = balls.iter().filter(|ball| ball.is_banked_by(HOME_TEAM)).count() > 4;
        if !frozen && (held.len() >= 2 || leads) && rng.chance(P_ARRIVE) {
            contacts.push(Contact::Base { team: HOME_TEAM });
            arrived = true;
        }

        for ball in balls.iter_mut().filter(|ball| ball.carried) {
            ball.position = pose.position;
        }

        ticks.push(ScriptTick {
            world: ArenaSnapshot {
                tick,
                pose,
                base_position: home_base,
                balls: balls.clone(),
                frozen,
                time_remaining: max_ticks.saturating_sub(tick) as f32 * TICK_SECONDS,
            },
            contacts: contacts.clone(),
            action: None,
        });

        // The host updates its registry after reporting the contact.
        for contact in &contacts {
            if let Contact::Ball { id } = contact {
                let ball = &mut balls[*id as usize];
                ball.carried = true;
                ball.bank_owner = None;
                held.push(*id);
            }
        }
        if arrived {
            break;
        }
    }

    EpisodeScript {
        team: HOME_TEAM,
        seed,
        ticks,
    }
}

fn random_point(rng: &mut SeededRng) -> Vec3 {
    Vec3::new(
        rng.next_range_f32(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
        0.0,
        rng.next_range_f32(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_episodes_are_valid_and_deterministic() {
        for seed in [1, 0xDEAD_BEEF, 0x1234_5678] {
            let a = generate_episode(seed, 400);
            let b = generate_episode(seed, 400);
            a.validate().unwrap();
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
            assert!(!a.ticks.is_empty() && a.ticks.len() <= 400);
        }
    }

    #[test]
    fn validate_rejects_unknown_ball_contact() {
        let mut script = generate_episode(7, 10);
        script.ticks[0].contacts.push(Contact::Ball { id: 999 });
        assert_eq!(
            script.validate(),
            Err(ScriptError::UnknownBall { tick: 0, id: 999 })
        );
    }

    #[test]
    fn validate_rejects_out_of_order_ticks() {
        let mut script = generate_episode(7, 10);
        if script.ticks.len() < 2 {
            script.ticks.push(script.ticks[0].clone());
        }
        script.ticks[1].world.tick = script.ticks[0].world.tick;
        assert!(matches!(
            script.validate(),
            Err(ScriptError::TickOutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_and_bad_actions() {
        let mut script = generate_episode(3, 5);
        script.ticks[0].action = Some(vec![0.0; 3]);
        assert_eq!(
            script.validate(),
            Err(ScriptError::ActionSlotCount {
                expected: 5,
                actual: 3
            })
        );
        script.ticks.clear();
        assert_eq!(script.validate(), Err(ScriptError::EmptyScript));
    }
}
