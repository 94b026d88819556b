//! Potential-field scoring of everything the bot can see.
//!
//! Every visible entity pulls or pushes the decision body with a signed
//! influence. Direction weight falls off with the square of the surface gap and
//! the influence itself with the gap, so nearby entities dominate.

use crate::config::BotConfig;
use crate::world::{BodySegment, ControlledPlayer, EntityId, EntityKind, Vec2, VisibleEntity};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Classification {
    pub influence: f64,
    /// Splitting this tick would be unsafe because of this entity.
    pub dangerous: bool,
    /// The entity is a split-kill candidate.
    pub split_candidate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PreyCandidate {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FieldSummary {
    pub vector: Vec2,
    pub best_prey: Option<PreyCandidate>,
    pub obstacle_nearby: bool,
    /// Entities that contributed a non-zero influence.
    pub contributors: usize,
}

/// Scores one visible entity against the decision body.
///
/// `d_split` is the centre distance floored at 1; `visible_count` scales the
/// strong repulsions and ejected-mass attraction.
pub fn classify(
    config: &BotConfig,
    player: &ControlledPlayer,
    cell: &BodySegment,
    check: &VisibleEntity,
    d_split: f64,
    at_max_cells: bool,
    visible_count: usize,
) -> Classification {
    let truncated_influence = cell.square_size().log10();
    let count = visible_count as f64;
    let mut out = Classification::default();

    match check.kind {
        EntityKind::PlayerCell { owner } => {
            if player.owns(&owner) || player.is_teammate(&owner) {
                return out;
            }
            if config.can_eat(cell.size, check.size) {
                out.influence = truncated_influence;
                out.split_candidate = config.can_splitkill(cell.size, check.size, d_split);
            } else {
                out.influence = if config.can_eat(check.size, cell.size) {
                    -truncated_influence * count
                } else {
                    -1.0
                };
                out.dangerous = true;
            }
        }
        EntityKind::Food => out.influence = 1.0,
        EntityKind::Virus => {
            if at_max_cells {
                out.influence = truncated_influence;
            } else if config.can_eat(cell.size, check.size) {
                out.influence = -count;
                out.dangerous = config.can_splitkill(cell.size, check.size, d_split);
            }
        }
        EntityKind::EjectedMass => {
            if config.can_eat(cell.size, check.size) {
                out.influence = truncated_influence * count;
            }
        }
        EntityKind::MotherCell => {
            if config.can_eat(check.size, cell.size) {
                out.influence = -1.0;
            } else if config.can_eat(cell.size, check.size) {
                out.influence = if at_max_cells {
                    truncated_influence * count
                } else {
                    -1.0
                };
            }
        }
    }

    out
}

/// Accumulates the steering vector over the whole visible set.
pub fn evaluate_field(
    config: &BotConfig,
    player: &ControlledPlayer,
    cell: &BodySegment,
    at_max_cells: bool,
) -> FieldSummary {
    let visible_count = player.visible_cells.len();
    let mut summary = FieldSummary::default();

    for (&id, check) in &player.visible_cells {
        let mut dx = check.x - cell.x;
        let mut dy = check.y - cell.y;
        let d_split = (dx * dx + dy * dy).sqrt().max(1.0);
        let mut d = (d_split - cell.size - check.size).max(1.0);

        let class = classify(
            config,
            player,
            cell,
            check,
            d_split,
            at_max_cells,
            visible_count,
        );
        if class.dangerous {
            summary.obstacle_nearby = true;
        }
        if class.split_candidate
            && summary
                .best_prey
                .map_or(true, |best| check.size > best.size)
        {
            summary.best_prey = Some(PreyCandidate {
                id,
                x: check.x,
                y: check.y,
                size: check.size,
            });
        }

        if class.influence == 0.0 {
            continue;
        }
        if d == 0.0 {
            d = 1.0;
        }
        dx /= d;
        dy /= d;
        summary.vector.x += dx * class.influence / d;
        summary.vector.y += dy * class.influence / d;
        summary.contributors += 1;
    }

    tracing::trace!(
        player = player.id,
        visible = visible_count,
        contributors = summary.contributors,
        x = summary.vector.x,
        y = summary.vector.y,
        obstacle = summary.obstacle_nearby,
        "influence field evaluated"
    );
    summary
}
