//! Throwaway arena for sweeping the bot across seeds.
//!
//! Bodies move straight at the aim point, eating is an overlap test and a split
//! drops half the mass toward the aim. Good enough to drive every decision
//! branch; not a model of the real server.

use playerbot_core::{
    BodySegment, BotConfig, CellOwner, ControlledPlayer, EntityId, EntityKind, PlayerId,
    PlayerState, SeededRng, Vec2, VisibleEntity,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BOT_PLAYER_ID: PlayerId = 1;
const OWN_CELL_ID_BASE: EntityId = 1_000_000;
const RIVAL_MIN_SIZE: f64 = 30.0;
const RIVAL_MAX_SIZE: f64 = 650.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaSettings {
    pub half_extent: f64,
    pub food: usize,
    pub rivals: usize,
    pub viruses: usize,
    pub ejected: usize,
    pub mothers: usize,
    pub start_size: f64,
    pub merge_ticks: u32,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            half_extent: 3_000.0,
            food: 320,
            rivals: 14,
            viruses: 12,
            ejected: 20,
            mothers: 2,
            start_size: 40.0,
            merge_ticks: 30,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ArenaEvents {
    pub food_eaten: u32,
    pub kills: u32,
    pub deaths: u32,
    pub splits: u32,
    pub merges: u32,
}

#[derive(Clone, Copy, Debug)]
struct Roamer {
    entity: VisibleEntity,
    vx: f64,
    vy: f64,
}

pub struct Arena {
    settings: ArenaSettings,
    rng: SeededRng,
    roamers: BTreeMap<EntityId, Roamer>,
    next_id: EntityId,
    next_rival_owner: PlayerId,
    split_age: u32,
    pub player: ControlledPlayer,
}

fn move_speed(size: f64) -> f64 {
    88.0 * size.powf(-0.439_675_4)
}

fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

fn merged_size(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

impl Arena {
    pub fn new(seed: u32, settings: ArenaSettings) -> Self {
        let mut arena = Self {
            settings,
            rng: SeededRng::new(seed),
            roamers: BTreeMap::new(),
            next_id: 1,
            next_rival_owner: 100,
            split_age: 0,
            player: ControlledPlayer::new(BOT_PLAYER_ID),
        };
        let s = arena.settings.clone();
        for _ in 0..s.food {
            arena.spawn(EntityKind::Food);
        }
        for _ in 0..s.rivals {
            arena.spawn_rival();
        }
        for _ in 0..s.viruses {
            arena.spawn(EntityKind::Virus);
        }
        for _ in 0..s.ejected {
            arena.spawn(EntityKind::EjectedMass);
        }
        for _ in 0..s.mothers {
            arena.spawn(EntityKind::MotherCell);
        }
        arena
    }

    fn random_coord(&mut self) -> f64 {
        let e = self.settings.half_extent;
        self.rng.next_range_f64(-e, e)
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(-self.settings.half_extent, self.settings.half_extent)
    }

    fn spawn(&mut self, kind: EntityKind) {
        let size = match kind {
            EntityKind::Food => self.rng.next_range_f64(10.0, 17.0),
            EntityKind::Virus => 100.0,
            EntityKind::EjectedMass => 38.0,
            EntityKind::MotherCell => 149.0,
            EntityKind::PlayerCell { .. } => self.rng.next_range_f64(RIVAL_MIN_SIZE, 260.0),
        };
        let (x, y) = (self.random_coord(), self.random_coord());
        let (vx, vy) = match kind {
            EntityKind::PlayerCell { .. } => {
                (self.rng.next_range_f64(-6.0, 6.0), self.rng.next_range_f64(-6.0, 6.0))
            }
            _ => (0.0, 0.0),
        };
        let id = self.next_id;
        self.next_id += 1;
        self.roamers.insert(
            id,
            Roamer {
                entity: VisibleEntity::new(x, y, size, kind),
                vx,
                vy,
            },
        );
    }

    fn spawn_rival(&mut self) {
        let owner = CellOwner {
            id: self.next_rival_owner,
            team: None,
        };
        self.next_rival_owner += 1;
        self.spawn(EntityKind::PlayerCell { owner });
    }

    fn respawn_like(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::PlayerCell { .. } => self.spawn_rival(),
            other => self.spawn(other),
        }
    }

    /// Places a fresh body for the bot once its spawn request is honoured.
    pub fn respawn(&mut self) {
        let (x, y) = (self.random_coord(), self.random_coord());
        self.player.owned_cells = vec![BodySegment::new(x, y, self.settings.start_size)];
        self.player.state = PlayerState::Playing;
        self.split_age = 0;
    }

    /// Rebuilds the bot's visible set around its largest cell.
    pub fn refresh_view(&mut self) {
        let mut visible = BTreeMap::new();
        if let Some(center) = self.player.largest_cell().copied() {
            let view = self.player.view_area;
            for (&id, roamer) in &self.roamers {
                let e = &roamer.entity;
                if (e.x - center.x).abs() <= view.w + e.size
                    && (e.y - center.y).abs() <= view.h + e.size
                {
                    visible.insert(id, *e);
                }
            }
            for (idx, cell) in self.player.owned_cells.iter().enumerate() {
                visible.insert(
                    OWN_CELL_ID_BASE + idx as EntityId,
                    VisibleEntity::player_cell(cell.x, cell.y, cell.size, BOT_PLAYER_ID, None),
                );
            }
        }
        self.player.visible_cells = visible;
    }

    pub fn advance(&mut self, aim: Option<Vec2>, split: bool, config: &BotConfig) -> ArenaEvents {
        let mut events = ArenaEvents::default();

        if let Some(aim) = aim {
            if split {
                self.split_toward(aim, config, &mut events);
            }
            self.steer_cells(aim);
        }
        self.merge_cells(&mut events);
        self.drift_rivals();
        self.bot_eats(config, &mut events);
        self.rivals_eat(config, &mut events);

        events
    }

    fn split_toward(&mut self, aim: Vec2, config: &BotConfig, events: &mut ArenaEvents) {
        if self.player.owned_cells.len() >= config.player_max_cells {
            return;
        }
        let Some(idx) = self.largest_index() else {
            return;
        };
        let cell = self.player.owned_cells[idx];
        let half = cell.size / std::f64::consts::SQRT_2;
        let dx = aim.x - cell.x;
        let dy = aim.y - cell.y;
        let dist = (dx * dx + dy * dy).sqrt().max(1.0);
        let reach = (cell.size / config.player_split_size_div)
            .max(config.player_split_boost)
            .min(dist);

        self.player.owned_cells[idx].size = half;
        self.player.owned_cells.push(BodySegment::new(
            self.clamp(cell.x + dx / dist * reach),
            self.clamp(cell.y + dy / dist * reach),
            half,
        ));
        self.split_age = 0;
        events.splits += 1;
    }

    fn largest_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, cell) in self.player.owned_cells.iter().enumerate() {
            if best.map_or(true, |b| cell.size > self.player.owned_cells[b].size) {
                best = Some(idx);
            }
        }
        best
    }

    fn steer_cells(&mut self, aim: Vec2) {
        let extent = self.settings.half_extent;
        for cell in &mut self.player.owned_cells {
            let dx = aim.x - cell.x;
            let dy = aim.y - cell.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < 1.0 {
                continue;
            }
            let step = move_speed(cell.size).min(dist);
            cell.x = (cell.x + dx / dist * step).clamp(-extent, extent);
            cell.y = (cell.y + dy / dist * step).clamp(-extent, extent);
        }
    }

    fn merge_cells(&mut self, events: &mut ArenaEvents) {
        if self.player.owned_cells.len() < 2 {
            return;
        }
        self.split_age += 1;
        if self.split_age < self.settings.merge_ticks {
            return;
        }
        let Some(idx) = self.largest_index() else {
            return;
        };
        let mut merged = self.player.owned_cells[idx];
        merged.size = self
            .player
            .owned_cells
            .iter()
            .map(|cell| cell.square_size())
            .sum::<f64>()
            .sqrt();
        self.player.owned_cells = vec![merged];
        self.split_age = 0;
        events.merges += 1;
    }

    fn drift_rivals(&mut self) {
        let extent = self.settings.half_extent;
        let ids: Vec<EntityId> = self.roamers.keys().copied().collect();
        for id in ids {
            let turn = self.rng.next_int(40) == 0;
            let (nvx, nvy) = (self.rng.next_range_f64(-6.0, 6.0), self.rng.next_range_f64(-6.0, 6.0));
            let Some(roamer) = self.roamers.get_mut(&id) else {
                continue;
            };
            if !matches!(roamer.entity.kind, EntityKind::PlayerCell { .. }) {
                continue;
            }
            if turn {
                roamer.vx = nvx;
                roamer.vy = nvy;
            }
            roamer.entity.x += roamer.vx;
            roamer.entity.y += roamer.vy;
            if roamer.entity.x.abs() > extent {
                roamer.vx = -roamer.vx;
                roamer.entity.x = roamer.entity.x.clamp(-extent, extent);
            }
            if roamer.entity.y.abs() > extent {
                roamer.vy = -roamer.vy;
                roamer.entity.y = roamer.entity.y.clamp(-extent, extent);
            }
            roamer.entity.size = (roamer.entity.size * 0.9995).clamp(RIVAL_MIN_SIZE, RIVAL_MAX_SIZE);
        }
    }

    fn bot_eats(&mut self, config: &BotConfig, events: &mut ArenaEvents) {
        let mut eaten: Vec<(EntityId, EntityKind)> = Vec::new();
        let mut popped = false;
        for cell in &mut self.player.owned_cells {
            for (&id, roamer) in &self.roamers {
                let e = &roamer.entity;
                if eaten.iter().any(|(taken, _)| *taken == id) || !config.can_eat(cell.size, e.size) {
                    continue;
                }
                if distance(cell.x, cell.y, e.x, e.y) >= cell.size - e.size / config.world_eat_overlap_div {
                    continue;
                }
                cell.size = merged_size(cell.size, e.size);
                eaten.push((id, e.kind));
                match e.kind {
                    EntityKind::Food => events.food_eaten += 1,
                    EntityKind::PlayerCell { .. } => events.kills += 1,
                    EntityKind::Virus => popped = true,
                    EntityKind::EjectedMass | EntityKind::MotherCell => {}
                }
            }
        }
        for (id, kind) in eaten {
            self.roamers.remove(&id);
            self.respawn_like(kind);
        }
        if popped {
            self.pop_largest(config, events);
        }
    }

    /// Eating a virus bursts the body while there is room for more cells.
    fn pop_largest(&mut self, config: &BotConfig, events: &mut ArenaEvents) {
        let room = config
            .player_max_cells
            .saturating_sub(self.player.owned_cells.len())
            .min(4);
        let Some(idx) = self.largest_index() else {
            return;
        };
        if room == 0 {
            return;
        }
        let cell = self.player.owned_cells[idx];
        let pieces = room + 1;
        let piece = cell.size / (pieces as f64).sqrt();
        self.player.owned_cells[idx].size = piece;
        for n in 0..room {
            let angle = n as f64 / room as f64 * std::f64::consts::TAU;
            let x = self.clamp(cell.x + angle.cos() * cell.size);
            let y = self.clamp(cell.y + angle.sin() * cell.size);
            self.player.owned_cells.push(BodySegment::new(x, y, piece));
        }
        self.split_age = 0;
        events.splits += 1;
    }

    fn rivals_eat(&mut self, config: &BotConfig, events: &mut ArenaEvents) {
        if self.player.owned_cells.is_empty() {
            return;
        }
        let mut survivors = Vec::with_capacity(self.player.owned_cells.len());
        for cell in self.player.owned_cells.drain(..) {
            let predator = self.roamers.values_mut().find(|roamer| {
                matches!(roamer.entity.kind, EntityKind::PlayerCell { .. })
                    && config.can_eat(roamer.entity.size, cell.size)
                    && distance(roamer.entity.x, roamer.entity.y, cell.x, cell.y)
                        < roamer.entity.size - cell.size / config.world_eat_overlap_div
            });
            match predator {
                Some(roamer) => {
                    roamer.entity.size =
                        merged_size(roamer.entity.size, cell.size).min(RIVAL_MAX_SIZE);
                }
                None => survivors.push(cell),
            }
        }
        self.player.owned_cells = survivors;
        if self.player.owned_cells.is_empty() {
            self.player.state = PlayerState::Unspawned;
            self.player.visible_cells.clear();
            events.deaths += 1;
        }
    }
}
