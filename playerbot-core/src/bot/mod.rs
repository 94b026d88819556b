//! Per-tick decision engine for a player bot.
//!
//! A tick runs in a fixed order: cooldown decay, identity/spawn handling,
//! pursuit of a held split-kill target, then the influence field with either a
//! new split-kill commit or field steering.

mod identity;
mod influence;
mod pursuit;

pub use identity::{IdentityEvent, IdentityOverrides, SpawnHook};
pub use influence::{classify, evaluate_field, Classification, FieldSummary, PreyCandidate};

use crate::config::BotConfig;
use crate::constants::BOT_KIND;
use crate::rng::{RandomSource, SeededRng};
use crate::world::{ControlledPlayer, EntityId, Vec2};
use serde::{Deserialize, Serialize};

/// Everything a bot carries from one tick to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BotDecisionState {
    pub split_cooldown_ticks: u32,
    /// Split-kill target, looked up again in every snapshot.
    pub target: Option<EntityId>,
    pub last_move_direction: Vec2,
    pub identity_set: bool,
    pub split_attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    /// Chasing a held split-kill target; the field was skipped.
    Pursuit,
    /// Committed to a new split-kill this tick.
    SplitCommit,
    Field,
    Wander,
}

impl SteeringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pursuit => "pursuit",
            Self::SplitCommit => "split_commit",
            Self::Field => "field",
            Self::Wander => "wander",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TickDecision {
    pub mode: SteeringMode,
    pub aim: Vec2,
    /// The server should perform a split this tick.
    pub split_requested: bool,
    pub target: Option<EntityId>,
    /// `None` on pursuit ticks, which skip the field.
    pub field: Option<FieldSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TickOutcome {
    pub identity: Option<IdentityEvent>,
    /// `None` when the player owns no cells.
    pub decision: Option<TickDecision>,
}

/// Player bots are spread across teams like human players.
pub const SEPARATE_IN_TEAMS: bool = true;

/// The bot should be dropped once its player is gone or detached.
pub fn should_close(player: Option<&ControlledPlayer>) -> bool {
    match player {
        Some(player) => !player.exists || !player.has_world,
        None => true,
    }
}

/// Runs one decision tick against the current snapshot.
pub fn decide<R, H>(
    state: &mut BotDecisionState,
    player: &mut ControlledPlayer,
    config: &BotConfig,
    overrides: &IdentityOverrides,
    rng: &mut R,
    hook: &mut H,
) -> TickOutcome
where
    R: RandomSource + ?Sized,
    H: SpawnHook + ?Sized,
{
    pursuit::decay_cooldown(state);

    let identity = identity::ensure_identity(
        &mut state.identity_set,
        player,
        config,
        overrides,
        rng,
        hook,
    );

    let Some(cell) = player.largest_cell().copied() else {
        return TickOutcome {
            identity,
            decision: None,
        };
    };

    if let Some(aim) = pursuit::follow_target(state, player, config, &cell) {
        return TickOutcome {
            identity,
            decision: Some(TickDecision {
                mode: SteeringMode::Pursuit,
                aim,
                split_requested: false,
                target: state.target,
                field: None,
            }),
        };
    }

    let at_max_cells = player.owned_cells.len() >= config.player_max_cells;
    let field = influence::evaluate_field(config, player, &cell, at_max_cells);

    let decision = if let Some(prey) = pursuit::try_commit(state, player, &cell, &field) {
        TickDecision {
            mode: SteeringMode::SplitCommit,
            aim: Vec2::new(prey.x, prey.y),
            split_requested: true,
            target: Some(prey.id),
            field: Some(field),
        }
    } else {
        let (aim, wandered) =
            pursuit::steer_by_field(state, &cell, player.view_area, field.vector, rng);
        TickDecision {
            mode: if wandered {
                SteeringMode::Wander
            } else {
                SteeringMode::Field
            },
            aim,
            split_requested: false,
            target: None,
            field: Some(field),
        }
    };

    TickOutcome {
        identity,
        decision: Some(decision),
    }
}

/// A bot bound to one controlled player.
///
/// Holds the cross-tick state, the fixed identity overrides, its random source
/// and the last aim point it emitted.
#[derive(Clone, Debug)]
pub struct PlayerBot<R = SeededRng> {
    pub state: BotDecisionState,
    overrides: IdentityOverrides,
    rng: R,
    mouse: Vec2,
}

impl PlayerBot<SeededRng> {
    pub fn new(name: Option<String>, skin: Option<String>, seed: u32) -> Self {
        Self::with_rng(name, skin, SeededRng::new(seed))
    }
}

impl<R: RandomSource> PlayerBot<R> {
    pub fn with_rng(name: Option<String>, skin: Option<String>, rng: R) -> Self {
        Self {
            state: BotDecisionState::default(),
            overrides: IdentityOverrides::new(name, skin),
            rng,
            mouse: Vec2::ZERO,
        }
    }

    pub fn kind(&self) -> &'static str {
        BOT_KIND
    }

    pub fn overrides(&self) -> &IdentityOverrides {
        &self.overrides
    }

    /// Last emitted aim point. Unchanged on ticks without owned cells.
    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    pub fn split_attempts(&self) -> u32 {
        self.state.split_attempts
    }

    pub fn update<H>(
        &mut self,
        player: &mut ControlledPlayer,
        config: &BotConfig,
        hook: &mut H,
    ) -> TickOutcome
    where
        H: SpawnHook + ?Sized,
    {
        let outcome = decide(
            &mut self.state,
            player,
            config,
            &self.overrides,
            &mut self.rng,
            hook,
        );
        if let Some(decision) = &outcome.decision {
            self.mouse = decision.aim;
        }
        outcome
    }
}
