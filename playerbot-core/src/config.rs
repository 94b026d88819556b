use crate::constants::{
    DEFAULT_PLAYER_MAX_CELLS, DEFAULT_PLAYER_SPLIT_BOOST, DEFAULT_PLAYER_SPLIT_SIZE_DIV,
    DEFAULT_WORLD_EAT_MULT, DEFAULT_WORLD_EAT_OVERLAP_DIV,
};
use crate::error::{ConfigError, ConfigField};
use serde::{Deserialize, Serialize};

/// Server settings the bot reads every tick.
///
/// Field names serialize with the game server's setting keys so an existing
/// settings file can be fed straight in; unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    pub world_eat_mult: f64,
    pub world_eat_overlap_div: f64,
    pub player_split_size_div: f64,
    pub player_split_boost: f64,
    pub player_max_cells: usize,
    pub world_player_bot_names: Vec<String>,
    pub world_player_bot_skins: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            world_eat_mult: DEFAULT_WORLD_EAT_MULT,
            world_eat_overlap_div: DEFAULT_WORLD_EAT_OVERLAP_DIV,
            player_split_size_div: DEFAULT_PLAYER_SPLIT_SIZE_DIV,
            player_split_boost: DEFAULT_PLAYER_SPLIT_BOOST,
            player_max_cells: DEFAULT_PLAYER_MAX_CELLS,
            world_player_bot_names: Vec::new(),
            world_player_bot_skins: Vec::new(),
        }
    }
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(ConfigField::WorldEatMult, self.world_eat_mult)?;
        positive(ConfigField::WorldEatOverlapDiv, self.world_eat_overlap_div)?;
        positive(ConfigField::PlayerSplitSizeDiv, self.player_split_size_div)?;

        if !self.player_split_boost.is_finite() {
            return Err(ConfigError::NonFinite {
                field: ConfigField::PlayerSplitBoost,
            });
        }
        if self.player_split_boost < 0.0 {
            return Err(ConfigError::Negative {
                field: ConfigField::PlayerSplitBoost,
                value: self.player_split_boost,
            });
        }
        if self.player_max_cells == 0 {
            return Err(ConfigError::ZeroMaxCells);
        }
        Ok(())
    }

    /// `a` is large enough to swallow `b`.
    pub fn can_eat(&self, a_size: f64, b_size: f64) -> bool {
        a_size > b_size * self.world_eat_mult
    }

    /// A body of size `a` can split onto a target of size `b` that sits `d` away.
    ///
    /// The split half has to be able to eat the target on its own, and the target
    /// must lie inside the split launch range, widened by the overlap allowance.
    pub fn can_splitkill(&self, a_size: f64, b_size: f64, d: f64) -> bool {
        let split_distance = (2.0 * a_size / self.player_split_size_div / 2.0)
            .max(self.player_split_boost);
        a_size / self.player_split_size_div > b_size * self.world_eat_mult
            && d - split_distance <= a_size - b_size / self.world_eat_overlap_div
    }
}

fn positive(field: ConfigField, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
