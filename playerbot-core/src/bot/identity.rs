use crate::config::BotConfig;
use crate::constants::{DEFAULT_BOT_NAME, DEFAULT_BOT_SKIN};
use crate::rng::RandomSource;
use crate::world::{ControlledPlayer, PlayerState};
use serde::{Deserialize, Serialize};

/// Fire-and-forget hook into the server's spawn subsystem.
pub trait SpawnHook {
    fn request_spawn(&mut self, name: &str);
}

impl<F> SpawnHook for F
where
    F: FnMut(&str),
{
    fn request_spawn(&mut self, name: &str) {
        self(name)
    }
}

/// Fixed name/skin a bot was created with. Empty strings count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityOverrides {
    pub name: Option<String>,
    pub skin: Option<String>,
}

impl IdentityOverrides {
    pub fn new(name: Option<String>, skin: Option<String>) -> Self {
        Self {
            name: name.filter(|value| !value.is_empty()),
            skin: skin.filter(|value| !value.is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IdentityEvent {
    SpawnRequested { name: String, skin: String },
    Reskinned { skin: String },
}

pub(super) fn ensure_identity<R, H>(
    identity_set: &mut bool,
    player: &mut ControlledPlayer,
    config: &BotConfig,
    overrides: &IdentityOverrides,
    rng: &mut R,
    hook: &mut H,
) -> Option<IdentityEvent>
where
    R: RandomSource + ?Sized,
    H: SpawnHook + ?Sized,
{
    match player.state {
        PlayerState::Unspawned => {
            let skin = match &overrides.skin {
                Some(skin) => skin.clone(),
                None => pick(&config.world_player_bot_skins, rng, DEFAULT_BOT_SKIN),
            };
            let name = match &overrides.name {
                Some(name) => name.clone(),
                None => pick(&config.world_player_bot_names, rng, DEFAULT_BOT_NAME),
            };

            player.cell_skin = skin.clone();
            player.leaderboard_name = name.clone();
            hook.request_spawn(&name);
            *identity_set = true;

            tracing::debug!(player = player.id, %name, %skin, "bot requested spawn");
            Some(IdentityEvent::SpawnRequested { name, skin })
        }
        PlayerState::Playing if !*identity_set => {
            let skin = pick(&config.world_player_bot_skins, rng, DEFAULT_BOT_SKIN);
            player.cell_skin = skin.clone();
            *identity_set = true;

            tracing::debug!(player = player.id, %skin, "bot took over a live player");
            Some(IdentityEvent::Reskinned { skin })
        }
        _ => None,
    }
}

fn pick<R>(pool: &[String], rng: &mut R, fallback: &str) -> String
where
    R: RandomSource + ?Sized,
{
    rng.pick_index(pool.len())
        .map(|idx| pool[idx].as_str())
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
