use crate::arena::{Arena, ArenaSettings};
use crate::profiles::{config_fingerprint, create_profile, profile_ids};
use anyhow::{anyhow, Result};
use playerbot_core::{PlayerBot, PlayerState, SteeringMode};
use serde::{Deserialize, Serialize};

/// Keeps the bot's random stream apart from the arena's.
const BOT_SEED_MIX: u32 = 0x9E37_79B9;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub profile_id: String,
    pub profile_fingerprint: String,
    pub seed: u32,
    pub ticks: u32,
    pub spawn_requests: u32,
    pub split_commits: u32,
    pub pursuit_ticks: u32,
    pub field_ticks: u32,
    pub wander_ticks: u32,
    pub idle_ticks: u32,
    pub obstacle_ticks: u32,
    pub viewport_violations: u32,
    pub food_eaten: u32,
    pub kills: u32,
    pub deaths: u32,
    pub splits: u32,
    pub final_size: f64,
    pub max_size: f64,
}

pub fn run_profile(
    profile_id: &str,
    seed: u32,
    ticks: u32,
    settings: &ArenaSettings,
) -> Result<RunMetrics> {
    if ticks == 0 {
        return Err(anyhow!("ticks must be > 0"));
    }
    let config = create_profile(profile_id).ok_or_else(|| {
        let available = profile_ids().join(", ");
        anyhow!("unknown profile '{profile_id}'. available: {available}")
    })?;
    config
        .validate()
        .map_err(|err| anyhow!("profile '{profile_id}' is invalid: {err}"))?;

    let mut arena = Arena::new(seed, settings.clone());
    let mut bot = PlayerBot::new(None, None, seed ^ BOT_SEED_MIX);
    let mut metrics = RunMetrics {
        profile_id: profile_id.to_string(),
        profile_fingerprint: config_fingerprint(&config),
        seed,
        ticks,
        ..RunMetrics::default()
    };

    for _ in 0..ticks {
        arena.refresh_view();
        let body = arena.player.largest_cell().copied();

        let mut spawn_requested = false;
        let outcome = bot.update(&mut arena.player, &config, &mut |_: &str| {
            spawn_requested = true;
        });
        if spawn_requested {
            metrics.spawn_requests += 1;
        }

        let (aim, split) = match (outcome.decision, body) {
            (Some(decision), Some(body)) => {
                match decision.mode {
                    SteeringMode::Pursuit => metrics.pursuit_ticks += 1,
                    SteeringMode::SplitCommit => metrics.split_commits += 1,
                    SteeringMode::Field => metrics.field_ticks += 1,
                    SteeringMode::Wander => metrics.wander_ticks += 1,
                }
                if decision.field.is_some_and(|field| field.obstacle_nearby) {
                    metrics.obstacle_ticks += 1;
                }
                if matches!(decision.mode, SteeringMode::Field | SteeringMode::Wander) {
                    let view = arena.player.view_area;
                    if (decision.aim.x - body.x).abs() > view.w + 1e-6
                        || (decision.aim.y - body.y).abs() > view.h + 1e-6
                    {
                        metrics.viewport_violations += 1;
                    }
                }
                (Some(decision.aim), decision.split_requested)
            }
            _ => {
                metrics.idle_ticks += 1;
                (None, false)
            }
        };

        let events = arena.advance(aim, split, &config);
        metrics.food_eaten += events.food_eaten;
        metrics.kills += events.kills;
        metrics.deaths += events.deaths;
        metrics.splits += events.splits;

        if arena.player.state == PlayerState::Unspawned && arena.player.owned_cells.is_empty() {
            if spawn_requested {
                arena.respawn();
            }
        } else if let Some(cell) = arena.player.largest_cell() {
            metrics.max_size = metrics.max_size.max(cell.size);
        }
    }

    metrics.final_size = arena
        .player
        .owned_cells
        .iter()
        .map(|cell| cell.square_size())
        .sum::<f64>()
        .sqrt();

    tracing::debug!(
        profile = profile_id,
        seed,
        kills = metrics.kills,
        deaths = metrics.deaths,
        commits = metrics.split_commits,
        "arena run finished"
    );
    Ok(metrics)
}
