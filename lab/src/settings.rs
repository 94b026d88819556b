use crate::profiles::{create_profile, load_config_file, profile_ids, DEFAULT_PROFILE};
use anyhow::{anyhow, Result};
use playerbot_core::BotConfig;
use std::env;
use std::path::Path;

pub const JOBS_ENV: &str = "PLAYERBOT_JOBS";
pub const CONFIG_ENV: &str = "PLAYERBOT_CONFIG";
pub const TICKS_ENV: &str = "PLAYERBOT_TICKS";
pub const DEFAULT_SWEEP_TICKS: u32 = 3_000;

/// Sweep length, overridable through `PLAYERBOT_TICKS`.
pub fn default_sweep_ticks() -> u32 {
    read_env_u32(TICKS_ENV, DEFAULT_SWEEP_TICKS)
}

/// Server settings for a command: an explicit file wins over a named profile,
/// which wins over the stock profile.
pub fn resolve_config(config_path: Option<&Path>, profile: Option<&str>) -> Result<BotConfig> {
    if let Some(path) = config_path {
        tracing::info!("loading server settings from {}", path.display());
        return load_config_file(path);
    }

    let id = profile.unwrap_or(DEFAULT_PROFILE);
    let config = create_profile(id).ok_or_else(|| {
        let available = profile_ids().join(", ");
        anyhow!("unknown profile '{id}'. available: {available}")
    })?;
    config
        .validate()
        .map_err(|err| anyhow!("profile '{id}' is invalid: {err}"))?;
    Ok(config)
}

/// Worker count for parallel sweeps; `None` lets rayon decide.
pub fn default_jobs() -> Option<usize> {
    read_env_optional_usize(JOBS_ENV)
}

pub fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
