use crate::bots::bot_ids;
use crate::reward::RewardTable;
use crate::runner::{run_script, write_json, LedgerEntry, RunMetrics};
use crate::script::generate_episode;
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub table: RewardTable,
    pub out_dir: PathBuf,
    pub save_top: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub tick_count: u32,
    pub total_reward: f64,
    pub terminal: bool,
    pub end_reason: Option<String>,
    pub final_banked: u32,
    pub pickups: u32,
    pub wall_hits: u32,
    pub freezes: u32,
    pub penalties: u32,
    pub laser_ticks: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub runs: usize,
    pub avg_reward: f64,
    pub max_reward: f64,
    pub min_reward: f64,
    pub avg_ticks: f64,
    pub terminal_rate: f64,
    pub positive_finish_rate: f64,
    pub avg_pickups: f64,
    pub avg_penalties: f64,
    pub avg_laser_ticks: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedLedgerRecord {
    pub rank: usize,
    pub bot_id: String,
    pub seed: u32,
    pub seed_hex: String,
    pub total_reward: f64,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u32,
    pub jobs: Option<usize>,
    pub reward_table: RewardTable,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
    pub saved_ledgers: Vec<SavedLedgerRecord>,
}

#[derive(Clone, Debug)]
struct InternalRun {
    metrics: RunMetrics,
    ledger: Vec<LedgerEntry>,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let mut bots = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                bots.push(token.to_string());
            }
            if bots.is_empty() {
                return Err(anyhow!("--bots resolved to empty list"));
            }
            Ok(bots)
        }
    }
}

/// Every bot plays the same synthetic episode per seed, so rankings compare
/// policies on identical contact sequences.
pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<InternalRun> {
        let script = generate_episode(*seed, config.max_ticks);
        let artifact = run_script(&script, bot_id, &config.table)
            .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))?;
        Ok(InternalRun {
            metrics: artifact.metrics,
            ledger: artifact.ledger,
        })
    };

    let run_results: Vec<Result<InternalRun>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let mut grouped: HashMap<String, Vec<&InternalRun>> = HashMap::new();
    for run in &runs {
        grouped
            .entry(run.metrics.bot_id.clone())
            .or_default()
            .push(run);
    }

    let mut rankings = Vec::new();
    for (bot_id, bot_runs) in grouped {
        let runs_count = bot_runs.len();
        let rewards = bot_runs.iter().map(|r| r.metrics.total_reward);
        let max_reward = rewards.clone().fold(f64::NEG_INFINITY, f64::max);
        let min_reward = rewards.fold(f64::INFINITY, f64::min);
        let positive_finishes = bot_runs
            .iter()
            .filter(|r| {
                r.metrics.terminal
                    && r.ledger
                        .last()
                        .map(|entry| entry.delta > 0.0)
                        .unwrap_or(false)
            })
            .count();

        rankings.push(BotAggregate {
            bot_id,
            runs: runs_count,
            avg_reward: mean(&bot_runs, |m| m.total_reward),
            max_reward,
            min_reward,
            avg_ticks: mean(&bot_runs, |m| m.tick_count as f64),
            terminal_rate: mean(&bot_runs, |m| if m.terminal { 1.0 } else { 0.0 }),
            positive_finish_rate: positive_finishes as f64 / runs_count as f64,
            avg_pickups: mean(&bot_runs, |m| m.pickups as f64),
            avg_penalties: mean(&bot_runs, |m| m.penalties as f64),
            avg_laser_ticks: mean(&bot_runs, |m| m.laser_ticks as f64),
        });
    }

    rankings.sort_by(|a, b| {
        b.avg_reward
            .total_cmp(&a.avg_reward)
            .then_with(|| b.positive_finish_rate.total_cmp(&a.positive_finish_rate))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });

    let mut run_records: Vec<RunRecord> = runs
        .iter()
        .map(|run| RunRecord {
            bot_id: run.metrics.bot_id.clone(),
            seed: run.metrics.seed,
            seed_hex: seed_to_hex(run.metrics.seed),
            tick_count: run.metrics.tick_count,
            total_reward: run.metrics.total_reward,
            terminal: run.metrics.terminal,
            end_reason: run.metrics.end_reason.clone(),
            final_banked: run.metrics.final_banked,
            pickups: run.metrics.pickups,
            wall_hits: run.metrics.wall_hits,
            freezes: run.metrics.freezes,
            penalties: run.metrics.penalties,
            laser_ticks: run.metrics.laser_ticks,
        })
        .collect();

    run_records.sort_by(|a, b| {
        b.total_reward
            .total_cmp(&a.total_reward)
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let mut saved_ledgers = Vec::new();
    if config.save_top > 0 {
        save_top_ledgers(&config.out_dir, &runs, config.save_top, &mut saved_ledgers)?;
    }

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        reward_table: config.table,
        bots: config.bots,
        seeds: config.seeds,
        run_count: run_records.len(),
        bot_rankings: rankings,
        runs: run_records,
        saved_ledgers,
    };

    write_json(&config.out_dir.join("summary.json"), &report)?;

    tracing::info!(
        runs = report.run_count,
        leader = report
            .bot_rankings
            .first()
            .map(|r| r.bot_id.as_str())
            .unwrap_or("none"),
        "benchmark complete"
    );

    Ok(report)
}

fn mean(runs: &[&InternalRun], metric: impl Fn(&RunMetrics) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|run| metric(&run.metrics)).sum::<f64>() / runs.len() as f64
}

fn save_top_ledgers(
    out_dir: &Path,
    runs: &[InternalRun],
    count: usize,
    saved: &mut Vec<SavedLedgerRecord>,
) -> Result<()> {
    let mut order: Vec<&InternalRun> = runs.iter().collect();
    order.sort_by(|a, b| {
        b.metrics
            .total_reward
            .total_cmp(&a.metrics.total_reward)
            .then_with(|| a.metrics.bot_id.cmp(&b.metrics.bot_id))
            .then_with(|| a.metrics.seed.cmp(&b.metrics.seed))
    });

    let save_dir = out_dir.join("top-reward");
    for (idx, run) in order.into_iter().take(count).enumerate() {
        let rank = idx + 1;
        let path = save_dir.join(format!(
            "rank{rank:02}-{}-seed{:08x}.json",
            run.metrics.bot_id, run.metrics.seed
        ));
        let body = serde_json::json!({
            "rank": rank,
            "metrics": run.metrics,
            "ledger": run.ledger,
        });
        write_json(&path, &body)?;

        saved.push(SavedLedgerRecord {
            rank,
            bot_id: run.metrics.bot_id.clone(),
            seed: run.metrics.seed,
            seed_hex: seed_to_hex(run.metrics.seed),
            total_reward: run.metrics.total_reward,
            path: path.to_string_lossy().into_owned(),
        });
    }
    Ok(())
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,seed_hex,seed,tick_count,total_reward,terminal,end_reason,final_banked,pickups,wall_hits,freezes,penalties,laser_ticks\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{:.4},{},{},{},{},{},{},{},{}\n",
            row.bot_id,
            row.seed_hex,
            row.seed,
            row.tick_count,
            row.total_reward,
            row.terminal,
            row.end_reason.as_deref().unwrap_or(""),
            row.final_banked,
            row.pickups,
            row.wall_hits,
            row.freezes,
            row.penalties,
            row.laser_ticks
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,runs,avg_reward,max_reward,min_reward,avg_ticks,terminal_rate,positive_finish_rate,avg_pickups,avg_penalties,avg_laser_ticks\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.4},{:.4},{:.4},{:.2},{:.4},{:.4},{:.2},{:.2},{:.2}\n",
            idx + 1,
            row.bot_id,
            row.runs,
            row.avg_reward,
            row.max_reward,
            row.min_reward,
            row.avg_ticks,
            row.terminal_rate,
            row.positive_finish_rate,
            row.avg_pickups,
            row.avg_penalties,
            row.avg_laser_ticks
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
