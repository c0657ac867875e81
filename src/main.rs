use anyhow::{anyhow, Result};
use arena_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig};
use arena_autopilot::bots::{bot_ids, create_bot, describe_bots};
use arena_autopilot::config::RunDefaults;
use arena_autopilot::reward::RewardTable;
use arena_autopilot::runner::{run_script, write_json};
use arena_autopilot::script::{generate_episode, EpisodeScript};
use arena_autopilot::telemetry::init_tracing;
use arena_autopilot::util::{parse_seed, parse_seed_csv, parse_seed_file, seed_range, seed_to_hex};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "arena-autopilot")]
#[command(about = "Reward shaping and intent policy lab for the ball-collection arena agent")]
struct Cli {
    /// JSON reward table; omitted fields keep their defaults
    #[arg(long, global = true)]
    reward_config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots,
    /// Print the effective reward table as JSON
    RewardTable,
    /// Write a synthetic episode script
    Generate {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        max_ticks: Option<u32>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay one script with one bot and print its reward summary
    Run {
        #[arg(long)]
        script: PathBuf,
        #[arg(long, default_value = "strategist")]
        bot: String,
        /// Where to write the per-event reward ledger
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Run every bot over the same synthetic episodes and rank them
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long)]
        max_ticks: Option<u32>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let Cli {
        reward_config,
        command,
    } = Cli::parse();
    let table = RewardTable::load(reward_config.as_deref())?;
    let defaults = RunDefaults::from_env();

    match command {
        Commands::ListBots => {
            for (id, description) in describe_bots() {
                println!("{id:12} {description}");
            }
        }
        Commands::RewardTable => {
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Generate {
            seed,
            max_ticks,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let max_ticks = max_ticks.unwrap_or(defaults.max_ticks);
            let script = generate_episode(seed, max_ticks);
            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "scripts/{}-ticks{}.json",
                    seed_to_hex(seed).replace("0x", "seed"),
                    script.ticks.len()
                ))
            });
            script.to_file(&output)?;
            println!("seed={}", seed_to_hex(seed));
            println!("ticks={}", script.ticks.len());
            println!("output={}", output.display());
        }
        Commands::Run {
            script,
            bot,
            ledger,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let episode = EpisodeScript::from_file(&script)?;
            let artifact = run_script(&episode, &bot, &table)?;
            let metrics = &artifact.metrics;

            println!("bot={}", metrics.bot_id);
            println!("seed={}", seed_to_hex(metrics.seed));
            println!("ticks={}", metrics.tick_count);
            println!("reward={:.4}", metrics.total_reward);
            println!("terminal={}", metrics.terminal);
            println!("end_reason={}", metrics.end_reason.as_deref().unwrap_or("-"));
            println!("carried={}", metrics.final_carried);
            println!("banked={}", metrics.final_banked);
            println!("pickups={}", metrics.pickups);
            println!("ineligible_pickups={}", metrics.ineligible_pickups);
            println!("penalties={}", metrics.penalties);
            if let Some(path) = ledger {
                write_json(&path, &artifact.ledger)?;
                println!("ledger={}", path.display());
            }
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            out_dir,
            save_top,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            for bot in &bots {
                if create_bot(bot).is_none() {
                    return Err(anyhow!("unknown bot '{bot}'"));
                }
            }
            let seeds = resolve_seeds(seeds, seed_file, seed_start, seed_count)?;
            let out_dir = out_dir.unwrap_or_else(|| {
                PathBuf::from(format!("benchmarks/run-{}", timestamp_suffix()))
            });

            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                max_ticks: max_ticks.unwrap_or(defaults.max_ticks),
                table,
                out_dir: out_dir.clone(),
                save_top,
                jobs: jobs.or(defaults.jobs),
            })?;

            println!("runs={}", report.run_count);
            for (idx, row) in report.bot_rankings.iter().enumerate() {
                println!(
                    "#{:02} {:12} avg_reward={:.4} positive_finish={:.2} terminal={:.2} avg_ticks={:.1}",
                    idx + 1,
                    row.bot_id,
                    row.avg_reward,
                    row.positive_finish_rate,
                    row.terminal_rate,
                    row.avg_ticks
                );
            }
            println!("out_dir={}", out_dir.display());
        }
    }

    Ok(())
}

fn resolve_seeds(
    seeds: Option<String>,
    seed_file: Option<PathBuf>,
    seed_start: Option<String>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(raw) = seeds {
        return parse_seed_csv(&raw);
    }
    if let Some(path) = seed_file {
        return parse_seed_file(&path);
    }
    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be > 0"));
    }
    let start = match seed_start {
        Some(raw) => parse_seed(&raw)?,
        None => 0xA11C_E000,
    };
    Ok(seed_range(start, seed_count))
}

fn timestamp_suffix() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
