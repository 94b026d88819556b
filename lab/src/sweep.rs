use crate::arena::ArenaSettings;
use crate::profiles::profile_ids;
use crate::runner::{run_profile, RunMetrics};
use crate::util::{seed_to_hex, write_json};
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub profiles: Vec<String>,
    pub seeds: Vec<u32>,
    pub ticks: u32,
    pub arena: ArenaSettings,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub profile_id: String,
    pub profile_fingerprint: String,
    pub seed: u32,
    pub seed_hex: String,
    pub ticks: u32,
    pub split_commits: u32,
    pub pursuit_ticks: u32,
    pub wander_ticks: u32,
    pub obstacle_ticks: u32,
    pub viewport_violations: u32,
    pub food_eaten: u32,
    pub kills: u32,
    pub deaths: u32,
    pub final_size: f64,
    pub max_size: f64,
}

impl From<&RunMetrics> for RunRecord {
    fn from(metrics: &RunMetrics) -> Self {
        Self {
            profile_id: metrics.profile_id.clone(),
            profile_fingerprint: metrics.profile_fingerprint.clone(),
            seed: metrics.seed,
            seed_hex: seed_to_hex(metrics.seed),
            ticks: metrics.ticks,
            split_commits: metrics.split_commits,
            pursuit_ticks: metrics.pursuit_ticks,
            wander_ticks: metrics.wander_ticks,
            obstacle_ticks: metrics.obstacle_ticks,
            viewport_violations: metrics.viewport_violations,
            food_eaten: metrics.food_eaten,
            kills: metrics.kills,
            deaths: metrics.deaths,
            final_size: metrics.final_size,
            max_size: metrics.max_size,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileAggregate {
    pub profile_id: String,
    pub profile_fingerprint: String,
    pub runs: usize,
    pub avg_max_size: f64,
    pub best_max_size: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    /// Split-kill commits per 1000 ticks.
    pub commit_rate: f64,
    pub wander_share: f64,
    pub obstacle_share: f64,
    pub viewport_violations: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    pub generated_unix_s: u64,
    pub ticks: u32,
    pub jobs: Option<usize>,
    pub profiles: Vec<String>,
    pub seeds: Vec<u32>,
    pub arena: ArenaSettings,
    pub run_count: usize,
    pub profile_rankings: Vec<ProfileAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_profiles(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(profile_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let mut profiles = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                profiles.push(token.to_string());
            }
            if profiles.is_empty() {
                return Err(anyhow!("--profiles resolved to empty list"));
            }
            Ok(profiles)
        }
    }
}

pub fn run_sweep(config: SweepConfig) -> Result<SweepReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("sweep requires at least one seed"));
    }
    if config.profiles.is_empty() {
        return Err(anyhow!("sweep requires at least one profile"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("sweep --jobs must be >= 1 when provided"));
        }
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .profiles
        .iter()
        .flat_map(|profile| config.seeds.iter().map(move |seed| (profile.clone(), *seed)))
        .collect();

    tracing::info!(
        runs = run_jobs.len(),
        ticks = config.ticks,
        "starting sweep"
    );

    let run_one = |(profile_id, seed): &(String, u32)| -> Result<RunMetrics> {
        run_profile(profile_id, *seed, config.ticks, &config.arena)
            .with_context(|| format!("sweep run failed for profile={profile_id} seed={seed:#x}"))
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
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

    let mut grouped: HashMap<String, Vec<&RunMetrics>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.profile_id.clone()).or_default().push(run);
    }

    let mut rankings = Vec::new();
    for (profile_id, profile_runs) in grouped {
        let count = profile_runs.len() as f64;
        let total_ticks: u64 = profile_runs.iter().map(|r| r.ticks as u64).sum();
        let per_tick = |value: u64| {
            if total_ticks == 0 {
                0.0
            } else {
                value as f64 / total_ticks as f64
            }
        };
        let sum_commits: u64 = profile_runs.iter().map(|r| r.split_commits as u64).sum();
        let sum_wander: u64 = profile_runs.iter().map(|r| r.wander_ticks as u64).sum();
        let sum_obstacle: u64 = profile_runs.iter().map(|r| r.obstacle_ticks as u64).sum();

        rankings.push(ProfileAggregate {
            profile_fingerprint: profile_runs
                .first()
                .map(|r| r.profile_fingerprint.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            runs: profile_runs.len(),
            avg_max_size: profile_runs.iter().map(|r| r.max_size).sum::<f64>() / count,
            best_max_size: profile_runs
                .iter()
                .map(|r| r.max_size)
                .fold(0.0, f64::max),
            avg_kills: profile_runs.iter().map(|r| r.kills as f64).sum::<f64>() / count,
            avg_deaths: profile_runs.iter().map(|r| r.deaths as f64).sum::<f64>() / count,
            commit_rate: per_tick(sum_commits) * 1_000.0,
            wander_share: per_tick(sum_wander),
            obstacle_share: per_tick(sum_obstacle),
            viewport_violations: profile_runs.iter().map(|r| r.viewport_violations).sum(),
            profile_id,
        });
    }

    rankings.sort_by(|a, b| {
        b.avg_max_size
            .total_cmp(&a.avg_max_size)
            .then_with(|| a.avg_deaths.total_cmp(&b.avg_deaths))
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });

    let mut run_records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
    run_records.sort_by(|a, b| {
        b.max_size
            .total_cmp(&a.max_size)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("profiles.csv"), &rankings)?;

    let report = SweepReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        ticks: config.ticks,
        jobs: config.jobs,
        profiles: config.profiles,
        seeds: config.seeds,
        arena: config.arena,
        run_count: run_records.len(),
        profile_rankings: rankings,
        runs: run_records,
    };
    write_json(&config.out_dir.join("summary.json"), &report)?;

    Ok(report)
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "profile_id,profile_fingerprint,seed_hex,seed,ticks,split_commits,pursuit_ticks,wander_ticks,obstacle_ticks,viewport_violations,food_eaten,kills,deaths,final_size,max_size\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{:.2},{:.2}\n",
            row.profile_id,
            row.profile_fingerprint,
            row.seed_hex,
            row.seed,
            row.ticks,
            row.split_commits,
            row.pursuit_ticks,
            row.wander_ticks,
            row.obstacle_ticks,
            row.viewport_violations,
            row.food_eaten,
            row.kills,
            row.deaths,
            row.final_size,
            row.max_size
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[ProfileAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,profile_id,profile_fingerprint,runs,avg_max_size,best_max_size,avg_kills,avg_deaths,commit_rate,wander_share,obstacle_share,viewport_violations\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.3},{:.4},{:.4},{}\n",
            idx + 1,
            row.profile_id,
            row.profile_fingerprint,
            row.runs,
            row.avg_max_size,
            row.best_max_size,
            row.avg_kills,
            row.avg_deaths,
            row.commit_rate,
            row.wander_share,
            row.obstacle_share,
            row.viewport_violations
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
