use super::influence::{FieldSummary, PreyCandidate};
use super::BotDecisionState;
use crate::config::BotConfig;
use crate::constants::{MAX_CELLS_WILLING_TO_SPLIT, SPLIT_COOLDOWN_TICKS};
use crate::rng::RandomSource;
use crate::world::{BodySegment, ControlledPlayer, Vec2, ViewArea};

/// Runs once at the top of every tick. The target only survives while the
/// cooldown was still running when the tick started.
pub(super) fn decay_cooldown(state: &mut BotDecisionState) {
    if state.split_cooldown_ticks > 0 {
        state.split_cooldown_ticks -= 1;
    } else {
        state.target = None;
    }
}

/// Aim point for a held target that is still visible and eatable.
pub(super) fn follow_target(
    state: &mut BotDecisionState,
    player: &ControlledPlayer,
    config: &BotConfig,
    cell: &BodySegment,
) -> Option<Vec2> {
    let id = state.target?;
    match player.visible_cells.get(&id) {
        Some(target) if config.can_eat(cell.size, target.size) => Some(target.position()),
        Some(_) => {
            tracing::debug!(player = player.id, target = id, "pursuit target outgrew the bot");
            state.target = None;
            None
        }
        None => {
            tracing::debug!(player = player.id, target = id, "pursuit target vanished");
            state.target = None;
            None
        }
    }
}

pub(super) fn try_commit(
    state: &mut BotDecisionState,
    player: &ControlledPlayer,
    cell: &BodySegment,
    field: &FieldSummary,
) -> Option<PreyCandidate> {
    let willing_to_split = player.owned_cells.len() <= MAX_CELLS_WILLING_TO_SPLIT;
    if !willing_to_split || field.obstacle_nearby || state.split_cooldown_ticks > 0 {
        return None;
    }
    let prey = field.best_prey?;
    if prey.size * 2.0 <= cell.size {
        return None;
    }

    state.target = Some(prey.id);
    state.split_attempts += 1;
    state.split_cooldown_ticks = SPLIT_COOLDOWN_TICKS;
    tracing::debug!(
        player = player.id,
        target = prey.id,
        prey_size = prey.size,
        body_size = cell.size,
        attempts = state.split_attempts,
        "committed to split-kill"
    );
    Some(prey)
}

/// Aim point from the field vector. An exactly neutral field draws a fresh
/// `last_move_direction` and steers along it. Returns the aim and whether the
/// fallback was used.
pub(super) fn steer_by_field<R>(
    state: &mut BotDecisionState,
    cell: &BodySegment,
    view_area: ViewArea,
    vector: Vec2,
    rng: &mut R,
) -> (Vec2, bool)
where
    R: RandomSource + ?Sized,
{
    let mut steer = vector;
    let wandering = steer.is_zero();
    if wandering {
        state.last_move_direction = Vec2::new(rng.next_signed(), rng.next_signed());
        steer = state.last_move_direction;
    }

    let d = steer.length().max(1.0);
    let aim = Vec2::new(
        cell.x + steer.x / d * view_area.w,
        cell.y + steer.y / d * view_area.h,
    );
    (aim, wandering)
}
