use crate::scenario::Scenario;
use anyhow::{anyhow, Result};
use playerbot_core::bot::{should_close, IdentityEvent, IdentityOverrides};
use playerbot_core::{
    decide, BotConfig, BotDecisionState, ControlledPlayer, EntityId, PlayerBot, PlayerState,
    SeededRng, SteeringMode, TickOutcome,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    pub mode: Option<SteeringMode>,
    pub aim_x: f64,
    pub aim_y: f64,
    pub split_requested: bool,
    pub target: Option<EntityId>,
    pub obstacle_nearby: bool,
    pub cooldown: u32,
    pub split_attempts: u32,
    pub identity: Option<IdentityEvent>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub scenario: String,
    pub seed: u32,
    pub ticks: u64,
    pub spawn_requests: u32,
    pub split_commits: u32,
    pub pursuit_ticks: u32,
    pub field_ticks: u32,
    pub wander_ticks: u32,
    pub idle_ticks: u32,
    pub obstacle_ticks: u32,
    pub closed_early: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayArtifact {
    pub summary: ReplaySummary,
    pub records: Vec<TickRecord>,
    pub final_state: BotDecisionState,
    pub final_player: ControlledPlayer,
}

pub fn replay(scenario: &Scenario) -> Result<ReplayArtifact> {
    if scenario.frames.is_empty() {
        return Err(anyhow!("scenario '{}' has no frames", scenario.name));
    }
    let config = scenario.resolve_config()?;
    let mut bot = PlayerBot::new(
        scenario.bot.name.clone(),
        scenario.bot.skin.clone(),
        scenario.bot.seed,
    );
    let mut player = scenario.player.clone();
    let mut records = Vec::with_capacity(scenario.tick_count() as usize);
    let mut summary = ReplaySummary {
        scenario: scenario.name.clone(),
        seed: scenario.bot.seed,
        ..ReplaySummary::default()
    };

    'frames: for frame in &scenario.frames {
        frame.apply(&mut player);
        for _ in 0..frame.repeat {
            if should_close(Some(&player)) {
                tracing::info!(tick = summary.ticks, "player gone, closing bot");
                summary.closed_early = true;
                break 'frames;
            }

            let mut spawn_names: Vec<String> = Vec::new();
            let outcome = bot.update(&mut player, &config, &mut |name: &str| {
                spawn_names.push(name.to_string())
            });
            if !spawn_names.is_empty() {
                summary.spawn_requests += spawn_names.len() as u32;
                // The server honours spawn requests before the next tick.
                player.state = PlayerState::Playing;
            }

            let mut record = TickRecord {
                tick: summary.ticks,
                mode: None,
                aim_x: bot.mouse().x,
                aim_y: bot.mouse().y,
                split_requested: false,
                target: bot.state.target,
                obstacle_nearby: false,
                cooldown: bot.state.split_cooldown_ticks,
                split_attempts: bot.split_attempts(),
                identity: outcome.identity,
            };
            match outcome.decision {
                Some(decision) => {
                    record.mode = Some(decision.mode);
                    record.split_requested = decision.split_requested;
                    record.obstacle_nearby = decision
                        .field
                        .map(|field| field.obstacle_nearby)
                        .unwrap_or(false);
                    match decision.mode {
                        SteeringMode::Pursuit => summary.pursuit_ticks += 1,
                        SteeringMode::SplitCommit => summary.split_commits += 1,
                        SteeringMode::Field => summary.field_ticks += 1,
                        SteeringMode::Wander => summary.wander_ticks += 1,
                    }
                    if record.obstacle_nearby {
                        summary.obstacle_ticks += 1;
                    }
                }
                None => summary.idle_ticks += 1,
            }

            records.push(record);
            summary.ticks += 1;
        }
    }

    tracing::info!(
        scenario = %summary.scenario,
        ticks = summary.ticks,
        commits = summary.split_commits,
        "replay finished"
    );

    Ok(ReplayArtifact {
        summary,
        records,
        final_state: bot.state.clone(),
        final_player: player,
    })
}

/// Result of a single decision against one snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct SnapshotDecision {
    pub outcome: TickOutcome,
    pub spawn_requests: Vec<String>,
    pub state: BotDecisionState,
    pub leaderboard_name: String,
    pub cell_skin: String,
}

pub fn evaluate_snapshot(
    player: &ControlledPlayer,
    state: BotDecisionState,
    config: &BotConfig,
    overrides: &IdentityOverrides,
    seed: u32,
) -> SnapshotDecision {
    let mut player = player.clone();
    let mut state = state;
    let mut rng = SeededRng::new(seed);
    let mut spawn_requests = Vec::new();
    let outcome = decide(
        &mut state,
        &mut player,
        config,
        overrides,
        &mut rng,
        &mut |name: &str| spawn_requests.push(name.to_string()),
    );
    SnapshotDecision {
        outcome,
        spawn_requests,
        state,
        leaderboard_name: player.leaderboard_name,
        cell_skin: player.cell_skin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioFrame;
    use playerbot_core::{BodySegment, VisibleEntity};
    use std::collections::BTreeMap;

    fn hunting_player() -> ControlledPlayer {
        let mut player = ControlledPlayer::new(1);
        player.state = PlayerState::Playing;
        player.owned_cells = vec![BodySegment::new(0.0, 0.0, 200.0)];
        player
            .visible_cells
            .insert(3, VisibleEntity::player_cell(300.0, 0.0, 120.0, 2, None));
        player
    }

    fn scenario_with(frames: Vec<ScenarioFrame>) -> Scenario {
        Scenario {
            name: "inline".to_string(),
            config: Some(BotConfig::default()),
            settings_file: None,
            profile: None,
            bot: Default::default(),
            player: hunting_player(),
            frames,
            base_dir: None,
        }
    }

    #[test]
    fn snapshot_commits_on_prey() {
        let result = evaluate_snapshot(
            &hunting_player(),
            BotDecisionState::default(),
            &BotConfig::default(),
            &IdentityOverrides::default(),
            7,
        );
        let decision = result.outcome.decision.expect("decision");
        assert_eq!(decision.mode, SteeringMode::SplitCommit);
        assert_eq!(result.state.target, Some(3));
        assert_eq!(result.state.split_cooldown_ticks, 15);
        assert!(result.spawn_requests.is_empty());
    }

    #[test]
    fn snapshot_reports_spawn_for_unspawned_player() {
        let player = ControlledPlayer::new(9);
        let overrides = IdentityOverrides::new(Some("alpha".to_string()), None);
        let result = evaluate_snapshot(
            &player,
            BotDecisionState::default(),
            &BotConfig::default(),
            &overrides,
            1,
        );
        assert_eq!(result.spawn_requests, vec!["alpha".to_string()]);
        assert_eq!(result.leaderboard_name, "alpha");
        assert!(result.outcome.decision.is_none());
    }

    #[test]
    fn replay_counts_commit_then_pursuit() {
        let scenario = scenario_with(vec![ScenarioFrame {
            repeat: 5,
            ..ScenarioFrame::default()
        }]);
        let artifact = replay(&scenario).unwrap();
        assert_eq!(artifact.summary.ticks, 5);
        assert_eq!(artifact.summary.split_commits, 1);
        assert_eq!(artifact.summary.pursuit_ticks, 4);
        assert_eq!(artifact.records[0].mode, Some(SteeringMode::SplitCommit));
        assert_eq!(artifact.final_state.split_attempts, 1);
    }

    #[test]
    fn replay_stops_when_player_detaches() {
        let scenario = scenario_with(vec![
            ScenarioFrame {
                repeat: 2,
                ..ScenarioFrame::default()
            },
            ScenarioFrame {
                repeat: 3,
                has_world: Some(false),
                visible_cells: Some(BTreeMap::new()),
                ..ScenarioFrame::default()
            },
        ]);
        let artifact = replay(&scenario).unwrap();
        assert!(artifact.summary.closed_early);
        assert_eq!(artifact.summary.ticks, 2);
    }

    #[test]
    fn replay_rejects_empty_scenarios() {
        assert!(replay(&scenario_with(Vec::new())).is_err());
    }
}
