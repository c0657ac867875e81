use crate::agent::ForagerAgent;
use crate::bots::{create_bot, Policy};
use crate::host::RecordingHost;
use crate::intent::ActionRequest;
use crate::reward::{RewardEvent, RewardMode, RewardOutcome, RewardTable};
use crate::script::EpisodeScript;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub seed: u32,
    pub tick_count: u32,
    pub total_reward: f64,
    pub terminal: bool,
    pub end_reason: Option<String>,
    pub final_carried: u32,
    pub final_banked: u32,
    pub pickups: u32,
    pub ineligible_pickups: u32,
    pub wall_hits: u32,
    pub freezes: u32,
    pub shoot_requests: u32,
    pub seek_target_requests: u32,
    pub seek_base_requests: u32,
    pub penalties: u32,
    pub laser_ticks: u32,
    pub scripted_actions: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct LedgerEntry {
    pub tick: u32,
    pub event: RewardEvent,
    pub delta: f64,
    pub mode: RewardMode,
    pub reason: &'static str,
    pub carried: u32,
    pub banked: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub ledger: Vec<LedgerEntry>,
}

pub fn run_script(script: &EpisodeScript, bot_id: &str, table: &RewardTable) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_script_with_policy(script, bot.as_mut(), table)
}

/// Replays `script` through a fresh agent. Recorded actions win over the
/// policy; the policy is consulted only on ticks without one.
pub fn run_script_with_policy(
    script: &EpisodeScript,
    policy: &mut dyn Policy,
    table: &RewardTable,
) -> Result<RunArtifact> {
    script.validate().context("refusing to run invalid script")?;

    policy.reset(script.seed);
    let mut agent = ForagerAgent::new(script.team, table.clone());
    agent.begin_episode();
    let mut host = RecordingHost::new();

    let mut metrics = RunMetrics {
        bot_id: policy.id().to_string(),
        seed: script.seed,
        ..RunMetrics::default()
    };
    let mut ledger = Vec::new();

    for step in &script.ticks {
        let world = &step.world;
        let mut outcomes: Vec<RewardOutcome> = Vec::new();

        outcomes.extend(agent.begin_tick(world, &mut host));

        let request = match &step.action {
            Some(raw) => {
                metrics.scripted_actions += 1;
                ActionRequest::decode(raw)
                    .with_context(|| format!("bad action at tick {}", world.tick))?
            }
            None => policy.next_action(world, agent.state()),
        };
        outcomes.extend(agent.act(request, world, &mut host).rewards);

        for contact in &step.contacts {
            outcomes.extend(agent.on_contact(*contact, world, &mut host));
        }

        for outcome in outcomes {
            tally(&mut metrics, &outcome);
            ledger.push(LedgerEntry {
                tick: world.tick,
                event: outcome.event,
                delta: outcome.delta,
                mode: outcome.mode,
                reason: outcome.reason,
                carried: outcome.scored_at.carried,
                banked: outcome.scored_at.banked,
            });
            if outcome.terminal {
                metrics.end_reason = Some(outcome.reason.to_string());
            }
        }

        host.close_step();
        metrics.tick_count += 1;
        if agent.is_episode_over() {
            break;
        }
    }

    let state = agent.state();
    metrics.total_reward = host.episode_reward;
    metrics.terminal = agent.is_episode_over();
    metrics.final_carried = state.carried;
    metrics.final_banked = state.banked;
    metrics.laser_ticks = host.laser_ticks;

    tracing::debug!(
        bot = %metrics.bot_id,
        seed = metrics.seed,
        ticks = metrics.tick_count,
        reward = metrics.total_reward,
        "run finished"
    );

    Ok(RunArtifact { metrics, ledger })
}

fn tally(metrics: &mut RunMetrics, outcome: &RewardOutcome) {
    match outcome.event {
        RewardEvent::FreezeOnset => metrics.freezes += 1,
        RewardEvent::Pickup(pickup) if pickup.collected() => metrics.pickups += 1,
        RewardEvent::Pickup(_) => metrics.ineligible_pickups += 1,
        RewardEvent::WallHit => metrics.wall_hits += 1,
        RewardEvent::BaseArrival => {}
        RewardEvent::Shoot => metrics.shoot_requests += 1,
        RewardEvent::SeekTarget => metrics.seek_target_requests += 1,
        RewardEvent::SeekBase => metrics.seek_base_requests += 1,
    }
    if outcome.delta < 0.0 {
        metrics.penalties += 1;
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
