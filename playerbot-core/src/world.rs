//! Read-side view of the game world handed to the bot each tick.
//!
//! These snapshots are owned by the surrounding server; the bot only writes
//! `cell_skin` and `leaderboard_name` back onto [`ControlledPlayer`].

use crate::constants::{DEFAULT_VIEW_HALF_HEIGHT, DEFAULT_VIEW_HALF_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type EntityId = u32;
pub type PlayerId = u32;
pub type TeamId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    #[default]
    Unspawned,
    Playing,
    Spectating,
    Roaming,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewArea {
    pub w: f64,
    pub h: f64,
}

impl Default for ViewArea {
    fn default() -> Self {
        Self {
            w: DEFAULT_VIEW_HALF_WIDTH,
            h: DEFAULT_VIEW_HALF_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySegment {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl BodySegment {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    pub fn square_size(&self) -> f64 {
        self.size * self.size
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOwner {
    pub id: PlayerId,
    #[serde(default)]
    pub team: Option<TeamId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    PlayerCell { owner: CellOwner },
    Food,
    Virus,
    EjectedMass,
    MotherCell,
}

impl EntityKind {
    /// Numeric type code used on the wire by the game server.
    pub fn type_code(&self) -> u8 {
        match self {
            Self::PlayerCell { .. } => 0,
            Self::Food => 1,
            Self::Virus => 2,
            Self::EjectedMass => 3,
            Self::MotherCell => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibleEntity {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl VisibleEntity {
    pub fn new(x: f64, y: f64, size: f64, kind: EntityKind) -> Self {
        Self { x, y, size, kind }
    }

    pub fn player_cell(x: f64, y: f64, size: f64, owner: PlayerId, team: Option<TeamId>) -> Self {
        Self::new(
            x,
            y,
            size,
            EntityKind::PlayerCell {
                owner: CellOwner { id: owner, team },
            },
        )
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The bot's own player record.
///
/// `visible_cells` is keyed by entity id and iterated in ascending id order,
/// which keeps the field accumulation order stable between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlledPlayer {
    pub id: PlayerId,
    pub state: PlayerState,
    pub team: Option<TeamId>,
    pub owned_cells: Vec<BodySegment>,
    pub visible_cells: BTreeMap<EntityId, VisibleEntity>,
    pub view_area: ViewArea,
    pub cell_skin: String,
    pub leaderboard_name: String,
    pub exists: bool,
    pub has_world: bool,
}

impl Default for ControlledPlayer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ControlledPlayer {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            state: PlayerState::Unspawned,
            team: None,
            owned_cells: Vec::new(),
            visible_cells: BTreeMap::new(),
            view_area: ViewArea::default(),
            cell_skin: String::new(),
            leaderboard_name: String::new(),
            exists: true,
            has_world: true,
        }
    }

    /// Largest owned segment; ties keep the earliest one.
    pub fn largest_cell(&self) -> Option<&BodySegment> {
        let mut best: Option<&BodySegment> = None;
        for cell in &self.owned_cells {
            if best.map_or(true, |b| cell.size > b.size) {
                best = Some(cell);
            }
        }
        best
    }

    pub fn owns(&self, owner: &CellOwner) -> bool {
        owner.id == self.id
    }

    pub fn is_teammate(&self, owner: &CellOwner) -> bool {
        self.team.is_some() && self.team == owner.team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_cell_prefers_first_on_ties() {
        let mut player = ControlledPlayer::new(1);
        assert!(player.largest_cell().is_none());

        player.owned_cells = vec![
            BodySegment::new(0.0, 0.0, 40.0),
            BodySegment::new(10.0, 0.0, 90.0),
            BodySegment::new(20.0, 0.0, 90.0),
        ];
        let largest = player.largest_cell().expect("cell");
        assert_eq!(largest.x, 10.0);
    }

    #[test]
    fn teammate_requires_player_team() {
        let mut player = ControlledPlayer::new(1);
        let loner = CellOwner { id: 2, team: None };
        assert!(!player.is_teammate(&loner));

        player.team = Some(3);
        assert!(player.is_teammate(&CellOwner { id: 2, team: Some(3) }));
        assert!(!player.is_teammate(&CellOwner { id: 2, team: Some(4) }));
        assert!(!player.is_teammate(&loner));
    }

    #[test]
    fn entity_json_uses_flat_type_tag() {
        let raw = r#"{"x":1,"y":2,"size":30,"type":"player_cell","owner":{"id":9,"team":1}}"#;
        let entity: VisibleEntity = serde_json::from_str(raw).expect("entity should parse");
        assert_eq!(entity.kind.type_code(), 0);
        assert_eq!(entity, VisibleEntity::player_cell(1.0, 2.0, 30.0, 9, Some(1)));

        let food: VisibleEntity =
            serde_json::from_str(r#"{"x":0,"y":0,"size":10,"type":"food"}"#).expect("food");
        assert_eq!(food.kind, EntityKind::Food);
    }

    #[test]
    fn player_defaults_to_live_unspawned() {
        let player: ControlledPlayer = serde_json::from_str(r#"{"id":5}"#).expect("player");
        assert_eq!(player.state, PlayerState::Unspawned);
        assert!(player.exists);
        assert!(player.has_world);
        assert_eq!(player.view_area, ViewArea::default());
    }
}
