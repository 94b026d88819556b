// Stock server settings.
pub const DEFAULT_WORLD_EAT_MULT: f64 = 1.140_175_425_099_138;
pub const DEFAULT_WORLD_EAT_OVERLAP_DIV: f64 = 3.0;
pub const DEFAULT_PLAYER_SPLIT_SIZE_DIV: f64 = 1.414_213_562_373_095;
pub const DEFAULT_PLAYER_SPLIT_BOOST: f64 = 780.0;
pub const DEFAULT_PLAYER_MAX_CELLS: usize = 16;

pub const DEFAULT_VIEW_HALF_WIDTH: f64 = 1920.0 / 2.0;
pub const DEFAULT_VIEW_HALF_HEIGHT: f64 = 1080.0 / 2.0;

/// Ticks a split-kill pursuit stays locked after a commit.
pub const SPLIT_COOLDOWN_TICKS: u32 = 15;
/// Bots only consider splitting while they own at most this many cells.
pub const MAX_CELLS_WILLING_TO_SPLIT: usize = 2;

pub const DEFAULT_BOT_NAME: &str = "Player bot";
pub const DEFAULT_BOT_SKIN: &str = "";

pub const BOT_KIND: &str = "playerbot";
