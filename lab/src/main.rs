use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use playerbot_core::bot::IdentityOverrides;
use playerbot_core::{BotDecisionState, ControlledPlayer};
use playerbot_lab::arena::ArenaSettings;
use playerbot_lab::profiles::{
    config_fingerprint, describe_profiles, load_config_file, profile_fingerprint,
    profile_manifest_entries,
};
use playerbot_lab::replay::{evaluate_snapshot, replay};
use playerbot_lab::scenario::Scenario;
use playerbot_lab::settings::{default_jobs, default_sweep_ticks, resolve_config};
use playerbot_lab::sweep::{resolve_profiles, run_sweep, SweepConfig};
use playerbot_lab::util::{
    parse_seed, parse_seed_csv, parse_seed_file, seed_sequence, seed_to_hex, write_json,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "playerbot-lab")]
#[command(about = "Replay, inspect and benchmark the player bot decision core")]
struct Cli {
    /// Server settings JSON (camelCase keys); overrides --profile
    #[arg(long, global = true, env = "PLAYERBOT_CONFIG")]
    config: Option<PathBuf>,
    /// Named server settings profile
    #[arg(long, global = true)]
    profile: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available server settings profiles
    ListProfiles,
    /// Export every profile with its settings fingerprint
    ProfileManifest {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a server settings file
    CheckConfig {
        #[arg(long)]
        input: PathBuf,
    },
    /// Run one decision tick against a player snapshot
    Decide {
        #[arg(long)]
        snapshot: PathBuf,
        /// Decision state carried in from a previous tick
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long, default_value = "1")]
        seed: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        skin: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay a scripted scenario tick by tick
    Replay {
        #[arg(long)]
        scenario: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print every tick record
        #[arg(long)]
        verbose: bool,
    },
    /// Run profiles across seeds in a synthetic arena
    Sweep {
        #[arg(long)]
        profiles: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 8)]
        seed_count: u32,
        #[arg(long)]
        ticks: Option<u32>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config;
    let profile = cli.profile;

    match cli.command {
        Commands::ListProfiles => {
            for (id, description) in describe_profiles() {
                let fingerprint = profile_fingerprint(id).unwrap_or_else(|| "-".to_string());
                println!("{id:<12} {fingerprint}  {description}");
            }
        }
        Commands::ProfileManifest { output } => {
            let entries = profile_manifest_entries();
            if let Some(path) = output {
                write_json(&path, &entries)?;
                println!("profiles={}", entries.len());
                println!("output={}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Commands::CheckConfig { input } => {
            let config = load_config_file(&input)?;
            println!("input={}", input.display());
            println!("config_hash={}", config_fingerprint(&config));
            println!("max_cells={}", config.player_max_cells);
            println!("names={}", config.world_player_bot_names.len());
            println!("skins={}", config.world_player_bot_skins.len());
        }
        Commands::Decide {
            snapshot,
            state,
            seed,
            name,
            skin,
            output,
        } => {
            let config = resolve_config(config_path.as_deref(), profile.as_deref())?;
            let player: ControlledPlayer = read_json(&snapshot)?;
            let state: BotDecisionState = match state {
                Some(path) => read_json(&path)?,
                None => BotDecisionState::default(),
            };
            let seed = parse_seed(&seed)?;
            let overrides = IdentityOverrides::new(name, skin);
            let result = evaluate_snapshot(&player, state, &config, &overrides, seed);

            if let Some(path) = output {
                write_json(&path, &result)?;
                println!("seed={}", seed_to_hex(seed));
                println!(
                    "mode={}",
                    result
                        .outcome
                        .decision
                        .map(|decision| decision.mode.as_str())
                        .unwrap_or("idle")
                );
                println!("output={}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Commands::Replay {
            scenario,
            output,
            verbose,
        } => {
            let mut loaded = Scenario::load(&scenario)?;
            if config_path.is_some() || profile.is_some() {
                loaded.config = Some(resolve_config(config_path.as_deref(), profile.as_deref())?);
            }
            let artifact = replay(&loaded)?;

            if verbose {
                for record in &artifact.records {
                    println!(
                        "  tick={:04} mode={:<12} aim=({:.1},{:.1}) split={} target={} cooldown={} attempts={}",
                        record.tick,
                        record.mode.map(|mode| mode.as_str()).unwrap_or("idle"),
                        record.aim_x,
                        record.aim_y,
                        record.split_requested,
                        record
                            .target
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        record.cooldown,
                        record.split_attempts,
                    );
                }
            }

            let summary = &artifact.summary;
            println!("scenario={}", summary.scenario);
            println!("seed={}", seed_to_hex(summary.seed));
            println!("ticks={}", summary.ticks);
            println!("spawn_requests={}", summary.spawn_requests);
            println!("split_commits={}", summary.split_commits);
            println!("pursuit_ticks={}", summary.pursuit_ticks);
            println!("field_ticks={}", summary.field_ticks);
            println!("wander_ticks={}", summary.wander_ticks);
            println!("idle_ticks={}", summary.idle_ticks);
            println!("obstacle_ticks={}", summary.obstacle_ticks);
            println!("closed_early={}", summary.closed_early);
            if let Some(path) = output {
                write_json(&path, &artifact)?;
                println!("output={}", path.display());
            }
        }
        Commands::Sweep {
            profiles,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            ticks,
            out_dir,
            jobs,
        } => {
            let profiles = resolve_profiles(profiles.as_deref())?;
            let seeds = resolve_seeds(
                seeds.as_deref(),
                seed_file.as_deref(),
                seed_start.as_deref(),
                seed_count,
            )?;
            let ticks = ticks.unwrap_or_else(default_sweep_ticks);
            let jobs = jobs.or_else(default_jobs);
            let out_dir = out_dir
                .unwrap_or_else(|| PathBuf::from(format!("sweeps/{}", timestamp_suffix())));

            let report = run_sweep(SweepConfig {
                profiles,
                seeds,
                ticks,
                arena: ArenaSettings::default(),
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("runs={}", report.run_count);
            println!("ticks={}", report.ticks);
            println!(
                "jobs={}",
                report
                    .jobs
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            println!("out_dir={}", out_dir.display());
            println!("profiles:");
            for (idx, profile) in report.profile_rankings.iter().enumerate() {
                println!(
                    "  {}. {}  avg_max_size={:.1} best={:.1} kills={:.2} deaths={:.2} commits/1k={:.2} wander={:.1}% obstacle={:.1}% viewport_violations={}",
                    idx + 1,
                    profile.profile_id,
                    profile.avg_max_size,
                    profile.best_max_size,
                    profile.avg_kills,
                    profile.avg_deaths,
                    profile.commit_rate,
                    profile.wander_share * 100.0,
                    profile.obstacle_share * 100.0,
                    profile.viewport_violations,
                );
            }
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("invalid json in {}", path.display()))
}

fn resolve_seeds(
    seeds: Option<&str>,
    seed_file: Option<&Path>,
    seed_start: Option<&str>,
    seed_count: u32,
) -> Result<Vec<u32>> {
    if let Some(path) = seed_file {
        return parse_seed_file(path);
    }

    if let Some(csv) = seeds {
        return parse_seed_csv(csv);
    }

    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    let start = if let Some(start) = seed_start {
        parse_seed(start)?
    } else {
        0xB07_0001
    };
    Ok(seed_sequence(start, seed_count))
}

fn timestamp_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{now}")
}
